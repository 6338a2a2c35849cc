// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/interpreter.rs - Interpret parsed BXL data into footprint pads.
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

/*!
 * # `interpreter` Module
 *
 * This module provides functionality to interpret parsed BXL files into
 * per-footprint pad lists in millimeters.
 *
 * ## Usage Example
 *
 * ```no_run
 * use bxl::decoder::FileType;
 * use bxl::interpreter::InterpretedBxlFile;
 * use bxl::parser::ParsedBxlFile;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     // Decode and parse the file
 *     let parsed = ParsedBxlFile::from_filename("example.bxl", FileType::FromExtension, None)?;
 *
 *     // Interpret the parsed file
 *     let interpreted = InterpretedBxlFile::from_parsed(&parsed);
 *
 *     // Access interpreted footprints
 *     for (name, info) in &interpreted.footprints {
 *         println!("Footprint: {}", name);
 *         for pad in &info.pads {
 *             println!("  Pad: {} at ({}, {})", pad.number, pad.x_mm, pad.y_mm);
 *         }
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

use std::collections::HashMap;

use log::debug;
use rust_decimal::Decimal;

use crate::library::LibItem;
use crate::parser::ParsedBxlFile;

/// Represents a pad in a footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct Pad {
    /// The number of the pad.
    pub number: i32,
    /// The name of the pin this pad belongs to.
    pub pin_name: String,
    /// The name of the pad stack giving the pad its shape.
    pub pad_stack: String,
    /// The X-coordinate in millimeters, relative to the footprint origin.
    pub x_mm: Decimal,
    /// The Y-coordinate in millimeters, relative to the footprint origin.
    pub y_mm: Decimal,
    /// Rotation in degrees.
    pub rotate: Decimal,
    /// The drill diameter in millimeters, if the pad stack is known.
    pub hole_diam_mm: Option<Decimal>,
}

/// Information about a footprint, including its pads.
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintInfo {
    /// List of pads in the footprint.
    pub pads: Vec<Pad>,
}

/// An interpreted BXL file, containing footprint data.
#[derive(Debug)]
pub struct InterpretedBxlFile {
    /// A map of footprint names to their associated pad information.
    pub footprints: HashMap<String, FootprintInfo>,
}

impl InterpretedBxlFile {
    /// Converts a parsed BXL file into an interpreted format.
    ///
    /// BXL coordinates are in mils. Pads are converted to millimeters and
    /// moved so the footprint's origin point is at (0, 0).
    pub fn from_parsed(parsed: &ParsedBxlFile) -> Self {
        let mm_per_mil: Decimal = Decimal::new(254, 4);

        let document = &parsed.document;

        let mut footprints = HashMap::new();

        for pattern in &document.footprints {
            let origin = pattern.origin_point;

            let pads = pattern
                .data
                .iter()
                .filter_map(|item| match item {
                    LibItem::Pad(pad) => Some(pad),
                    _ => None,
                })
                .map(|pad| {
                    let hole_diam_mm = match document.pad_stack(&pad.pad_style) {
                        Some(stack) => Some(stack.hole_diam * mm_per_mil),
                        None => {
                            debug!(
                                footprint = pattern.name.as_str(),
                                pad = pad.number;
                                "Unknown pad stack {:?}", pad.pad_style
                            );
                            None
                        }
                    };

                    Pad {
                        number: pad.number,
                        pin_name: pad.pin_name.clone(),
                        pad_stack: pad.pad_style.clone(),
                        x_mm: (pad.origin.x - origin.x) * mm_per_mil,
                        y_mm: (pad.origin.y - origin.y) * mm_per_mil,
                        rotate: pad.rotate,
                        hole_diam_mm,
                    }
                })
                .collect();

            footprints.insert(pattern.name.clone(), FootprintInfo { pads });
        }

        Self { footprints }
    }
}
