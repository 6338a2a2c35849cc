// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/fields.rs - Declarative property tables for BXL entities.
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
 * # `fields` Module
 *
 * Most BXL items are a keyword followed by a list of `(Name value...)`
 * properties. Each entity type declares a [FieldTable] once, mapping every
 * property name it understands (plus any legacy alias) to a typed setter or
 * accumulator. The parser walks the property list and dispatches each entry
 * through the table of the item it is filling in.
 *
 * ```ignore
 * field_table!(LibArc, || {
 *     FieldTable::new("LibArc")
 *         .field("Radius", Binding::real(|a: &mut LibArc, v| a.radius = v))
 *         .field("Width", Binding::real(|a: &mut LibArc, v| a.width = v))
 * });
 * ```
 */

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;

use crate::geometry::Point;
use crate::instance::NetNode;

pub(crate) type Setter<T, V> = Box<dyn Fn(&mut T, V) + Send + Sync>;
pub(crate) type Accessor<T, V> = Box<dyn Fn(&mut T) -> &mut Vec<V> + Send + Sync>;
pub(crate) type Resolver<T> = Box<dyn Fn(&mut T, EnumValue<'_>) -> bool + Send + Sync>;

/// A raw enumeration value as it appeared in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumValue<'a> {
    Name(&'a str),
    Number(i32),
}

impl fmt::Display for EnumValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumValue::Name(name) => f.write_str(name),
            EnumValue::Number(number) => write!(f, "{number}"),
        }
    }
}

/// An enumeration that can be read from a property value.
///
/// Names are matched ignoring case and any `-`, `_` or whitespace, so
/// `Open Collector`, `open_collector` and `OPENCOLLECTOR` all select the same
/// variant.
pub trait Enumeration: Copy + 'static {
    /// Every accepted name, aliases included, with the variant it selects.
    const NAMES: &'static [(&'static str, Self)];

    /// The underlying integer value used by the file format.
    fn value(self) -> i32;

    fn from_name(name: &str) -> Option<Self> {
        let wanted: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_') && !c.is_whitespace())
            .collect();
        Self::NAMES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(&wanted))
            .map(|(_, variant)| *variant)
    }

    fn from_value(value: i32) -> Option<Self> {
        Self::NAMES
            .iter()
            .map(|(_, variant)| *variant)
            .find(|variant| variant.value() == value)
    }
}

/// How a single named property is stored into an entity of type `T`.
pub(crate) enum Binding<T> {
    Real(Setter<T, Decimal>),
    Integer(Setter<T, i32>),
    Boolean(Setter<T, bool>),
    Text(Setter<T, String>),
    Point(Setter<T, Point>),
    TextPair(Setter<T, (String, String)>),
    IndexedText(Setter<T, (i32, String)>),
    Enumeration(Resolver<T>),
    Points(Accessor<T, Point>),
    Nodes(Accessor<T, NetNode>),
}

impl<T: 'static> Binding<T> {
    pub(crate) fn real(set: impl Fn(&mut T, Decimal) + Send + Sync + 'static) -> Self {
        Self::Real(Box::new(set))
    }

    pub(crate) fn integer(set: impl Fn(&mut T, i32) + Send + Sync + 'static) -> Self {
        Self::Integer(Box::new(set))
    }

    pub(crate) fn boolean(set: impl Fn(&mut T, bool) + Send + Sync + 'static) -> Self {
        Self::Boolean(Box::new(set))
    }

    pub(crate) fn text(set: impl Fn(&mut T, String) + Send + Sync + 'static) -> Self {
        Self::Text(Box::new(set))
    }

    pub(crate) fn point(set: impl Fn(&mut T, Point) + Send + Sync + 'static) -> Self {
        Self::Point(Box::new(set))
    }

    pub(crate) fn text_pair(set: impl Fn(&mut T, (String, String)) + Send + Sync + 'static) -> Self {
        Self::TextPair(Box::new(set))
    }

    pub(crate) fn indexed_text(set: impl Fn(&mut T, (i32, String)) + Send + Sync + 'static) -> Self {
        Self::IndexedText(Box::new(set))
    }

    pub(crate) fn enumeration<E: Enumeration>(set: impl Fn(&mut T, E) + Send + Sync + 'static) -> Self {
        Self::Enumeration(Box::new(move |target: &mut T, value: EnumValue<'_>| {
            let resolved = match value {
                EnumValue::Name(name) => E::from_name(name),
                EnumValue::Number(number) => E::from_value(number),
            };
            match resolved {
                Some(variant) => {
                    set(target, variant);
                    true
                }
                None => false,
            }
        }))
    }

    pub(crate) fn points(get: impl Fn(&mut T) -> &mut Vec<Point> + Send + Sync + 'static) -> Self {
        Self::Points(Box::new(get))
    }

    pub(crate) fn nodes(get: impl Fn(&mut T) -> &mut Vec<NetNode> + Send + Sync + 'static) -> Self {
        Self::Nodes(Box::new(get))
    }

    /// Sequence fields accumulate instead of overwriting, so repeating them
    /// is not a duplicate.
    pub(crate) fn is_sequence(&self) -> bool {
        matches!(self, Binding::Points(_) | Binding::Nodes(_))
    }

    /// Re-targets this binding at a `U` that embeds a `T`.
    fn project<U: 'static>(&'static self, project: fn(&mut U) -> &mut T) -> Binding<U> {
        match self {
            Binding::Real(set) => Binding::real(move |u: &mut U, v| set(project(u), v)),
            Binding::Integer(set) => Binding::integer(move |u: &mut U, v| set(project(u), v)),
            Binding::Boolean(set) => Binding::boolean(move |u: &mut U, v| set(project(u), v)),
            Binding::Text(set) => Binding::text(move |u: &mut U, v| set(project(u), v)),
            Binding::Point(set) => Binding::point(move |u: &mut U, v| set(project(u), v)),
            Binding::TextPair(set) => Binding::text_pair(move |u: &mut U, v| set(project(u), v)),
            Binding::IndexedText(set) => {
                Binding::indexed_text(move |u: &mut U, v| set(project(u), v))
            }
            Binding::Enumeration(resolve) => Binding::Enumeration(Box::new(
                move |u: &mut U, v: EnumValue<'_>| resolve(project(u), v),
            )),
            Binding::Points(get) => Binding::points(move |u: &mut U| get(project(u))),
            Binding::Nodes(get) => Binding::nodes(move |u: &mut U| get(project(u))),
        }
    }
}

/// One named property of an entity.
pub struct Field<T> {
    name: &'static str,
    pub(crate) binding: Binding<T>,
}

impl<T> Field<T> {
    /// The canonical property name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// The set of properties an entity type accepts, keyed case-insensitively.
pub struct FieldTable<T> {
    type_name: &'static str,
    fields: Vec<Field<T>>,
    index: HashMap<String, usize>,
}

impl<T: 'static> FieldTable<T> {
    pub(crate) fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub(crate) fn field(mut self, name: &'static str, binding: Binding<T>) -> Self {
        self.index.insert(name.to_ascii_lowercase(), self.fields.len());
        self.fields.push(Field { name, binding });
        self
    }

    /// Registers an alternate name for the most recently added field.
    pub(crate) fn alias(mut self, alias: &'static str) -> Self {
        if let Some(last) = self.fields.len().checked_sub(1) {
            self.index.insert(alias.to_ascii_lowercase(), last);
        }
        self
    }

    /// Copies every field (and alias) of `parent` into this table, reached
    /// through `project`.
    pub(crate) fn inherit<P: 'static>(
        mut self,
        parent: &'static FieldTable<P>,
        project: fn(&mut T) -> &mut P,
    ) -> Self {
        let offset = self.fields.len();
        for field in &parent.fields {
            self.fields.push(Field {
                name: field.name,
                binding: field.binding.project(project),
            });
        }
        for (key, index) in &parent.index {
            self.index.insert(key.clone(), offset + index);
        }
        self
    }

    /// The entity name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn lookup(&self, name: &str) -> Option<&Field<T>> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&index| &self.fields[index])
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.fields.len()
    }

    /// The conventional `Origin` field, if the entity has one.
    pub(crate) fn origin(&self) -> Option<&Setter<T, Point>> {
        match self.lookup("Origin").map(|field| &field.binding) {
            Some(Binding::Point(set)) => Some(set),
            _ => None,
        }
    }

    /// The conventional `Points` sequence, if the entity has one.
    pub(crate) fn points(&self) -> Option<&Accessor<T, Point>> {
        match self.lookup("Points").map(|field| &field.binding) {
            Some(Binding::Points(get)) => Some(get),
            _ => None,
        }
    }
}

/// Entities that can be filled in from a property list.
pub trait Fields: Sized + 'static {
    fn fields() -> &'static FieldTable<Self>;
}

/// Implements [Fields] for a type with a table built on first use.
macro_rules! field_table {
    ($ty:ty, $build:expr) => {
        impl $crate::fields::Fields for $ty {
            fn fields() -> &'static $crate::fields::FieldTable<Self> {
                static TABLE: std::sync::LazyLock<$crate::fields::FieldTable<$ty>> =
                    std::sync::LazyLock::new($build);
                &TABLE
            }
        }
    };
}

pub(crate) use field_table;
