// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/geometry.rs - Coordinate types shared by library and instance data.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::fmt;

use rust_decimal::Decimal;

use crate::fields::{Binding, FieldTable, field_table};

/// A coordinate pair, in file units (usually mils).
///
/// Two points compare equal when both coordinates are within 1e-8 of each
/// other.
#[derive(Debug, Default, Clone, Copy)]
pub struct Point {
    pub x: Decimal,
    pub y: Decimal,
}

impl Point {
    pub fn new(x: Decimal, y: Decimal) -> Self {
        Self { x, y }
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        let tolerance = Decimal::new(1, 8);
        (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X:{} Y:{}", self.x, self.y)
    }
}

/// A rectangular area given by two corners.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Region {
    pub lower_left: Point,
    pub upper_right: Point,
}

field_table!(Region, || {
    FieldTable::new("Region")
        .field("LowerLeft", Binding::point(|r: &mut Region, p| r.lower_left = p))
        .alias("LL")
        .field("UpperRight", Binding::point(|r: &mut Region, p| r.upper_right = p))
        .alias("UR")
});
