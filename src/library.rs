// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/library.rs - Component library entities found in BXL files.
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
 * # `library` Module
 *
 * Footprints ("patterns"), schematic symbols, components and the layer, text
 * style and pad stack definitions they refer to. These are the contents of a
 * typical BXL library export.
 */

use rust_decimal::Decimal;

use crate::fields::{Binding, Enumeration, FieldTable, Fields, field_table};
use crate::geometry::Point;

/// Electrical role of a layer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LayerType {
    #[default]
    NonSignal,
    Signal,
    Plane,
}

impl Enumeration for LayerType {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("NonSignal", LayerType::NonSignal),
        ("Signal", LayerType::Signal),
        ("Plane", LayerType::Plane),
    ];

    fn value(self) -> i32 {
        self as i32
    }
}

/// A layer definition from the `LayerData` section.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Layer {
    pub id: i32,
    pub name: String,
    pub layer_type: LayerType,
    /// Board layer role, e.g. `Top_Silk` or `Signal_Top`.
    pub board_layer_type: Option<String>,
    pub layer_order: i32,
}

/// A named font definition referenced by text items.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TextStyle {
    pub name: String,
    pub font_width: Decimal,
    pub font_height: Decimal,
    pub font_char_width: Option<Decimal>,
    pub font_family: String,
    pub font_face: String,
}

impl TextStyle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

field_table!(TextStyle, || {
    FieldTable::new("TextStyle")
        .field("FontWidth", Binding::real(|s: &mut TextStyle, v| s.font_width = v))
        .field("FontHeight", Binding::real(|s: &mut TextStyle, v| s.font_height = v))
        .field(
            "FontCharWidth",
            Binding::real(|s: &mut TextStyle, v| s.font_char_width = Some(v)),
        )
        .field("FontFamily", Binding::text(|s: &mut TextStyle, v| s.font_family = v))
        .field("FontFace", Binding::text(|s: &mut TextStyle, v| s.font_face = v))
});

/// Outline of a pad on one layer of a [PadStack].
///
/// `Circle` is accepted as another name for [PadShapeKind::Round].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PadShapeKind {
    #[default]
    Round,
    Square,
    Oblong,
    Rectangle,
    Polygon,
    Thermal,
    ThermalX,
}

impl Enumeration for PadShapeKind {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("Round", PadShapeKind::Round),
        ("Circle", PadShapeKind::Round),
        ("Square", PadShapeKind::Square),
        ("Oblong", PadShapeKind::Oblong),
        ("Rectangle", PadShapeKind::Rectangle),
        ("Polygon", PadShapeKind::Polygon),
        ("Thermal", PadShapeKind::Thermal),
        ("ThermalX", PadShapeKind::ThermalX),
    ];

    fn value(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PadShape {
    pub kind: PadShapeKind,
    pub width: Decimal,
    pub height: Decimal,
    pub pad_type: i32,
    pub layer: String,
}

field_table!(PadShape, || {
    FieldTable::new("PadShape")
        .field("Width", Binding::real(|s: &mut PadShape, v| s.width = v))
        .field("Height", Binding::real(|s: &mut PadShape, v| s.height = v))
        .field("PadType", Binding::integer(|s: &mut PadShape, v| s.pad_type = v))
        .field("Layer", Binding::text(|s: &mut PadShape, v| s.layer = v))
});

/// A pad definition: drill and per-layer copper shapes.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PadStack {
    pub name: String,
    pub hole_diam: Decimal,
    pub surface: bool,
    pub plated: bool,
    pub no_paste: bool,
    pub start_range: i32,
    pub end_range: i32,
    pub is_via: bool,
    pub shapes: Vec<PadShape>,
}

impl PadStack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

field_table!(PadStack, || {
    FieldTable::new("PadStack")
        .field("HoleDiam", Binding::real(|s: &mut PadStack, v| s.hole_diam = v))
        .field("Surface", Binding::boolean(|s: &mut PadStack, v| s.surface = v))
        .field("Plated", Binding::boolean(|s: &mut PadStack, v| s.plated = v))
        .field("NoPaste", Binding::boolean(|s: &mut PadStack, v| s.no_paste = v))
        .field("StartRange", Binding::integer(|s: &mut PadStack, v| s.start_range = v))
        .field("EndRange", Binding::integer(|s: &mut PadStack, v| s.end_range = v))
        .field("IsVia", Binding::boolean(|s: &mut PadStack, v| s.is_via = v))
});

/// Anchor point of a text item relative to its origin.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextJustification {
    UpperLeft,
    UpperCenter,
    UpperRight,
    Left,
    #[default]
    Center,
    Right,
    LowerLeft,
    LowerCenter,
    LowerRight,
}

impl Enumeration for TextJustification {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("UpperLeft", TextJustification::UpperLeft),
        ("UpperCenter", TextJustification::UpperCenter),
        ("UpperRight", TextJustification::UpperRight),
        ("Left", TextJustification::Left),
        ("Center", TextJustification::Center),
        ("Right", TextJustification::Right),
        ("LowerLeft", TextJustification::LowerLeft),
        ("LowerCenter", TextJustification::LowerCenter),
        ("LowerRight", TextJustification::LowerRight),
    ];

    fn value(self) -> i32 {
        self as i32
    }
}

/// A piece of placed text. Used for free text, pin labels and attributes, in
/// both library and instance data.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TextBlock {
    pub layer: String,
    pub origin: Point,
    pub is_visible: bool,
    pub text: String,
    pub rotate: Decimal,
    pub is_flipped: bool,
    pub justify: TextJustification,
    /// Name of a [TextStyle].
    pub text_style: String,
}

field_table!(TextBlock, || {
    FieldTable::new("Text")
        .field("Layer", Binding::text(|t: &mut TextBlock, v| t.layer = v))
        .field("Origin", Binding::point(|t: &mut TextBlock, v| t.origin = v))
        .field("IsVisible", Binding::boolean(|t: &mut TextBlock, v| t.is_visible = v))
        .alias("Visible")
        .field("Text", Binding::text(|t: &mut TextBlock, v| t.text = v))
        .field("Rotate", Binding::real(|t: &mut TextBlock, v| t.rotate = v))
        .alias("Rotated")
        .field("IsFlipped", Binding::boolean(|t: &mut TextBlock, v| t.is_flipped = v))
        .alias("Flipped")
        .field("Justify", Binding::enumeration(|t: &mut TextBlock, v| t.justify = v))
        .field("TextStyle", Binding::text(|t: &mut TextBlock, v| t.text_style = v))
        .alias("TextStyleRef")
});

/// Function of a pin, for ERC and netlisting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PinType {
    #[default]
    None,
    Input,
    Output,
    BiDirectional,
    Tristate,
    OpenCollector,
    OpenEmitter,
    Power,
    Ground,
    Analog,
    Behaviour,
    Any,
    Digital,
    NoConnect,
    Passive,
}

impl Enumeration for PinType {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("None", PinType::None),
        ("Input", PinType::Input),
        ("Output", PinType::Output),
        ("BiDirectional", PinType::BiDirectional),
        ("Tristate", PinType::Tristate),
        ("OpenCollector", PinType::OpenCollector),
        ("OpenEmitter", PinType::OpenEmitter),
        ("Power", PinType::Power),
        ("Ground", PinType::Ground),
        ("Analog", PinType::Analog),
        ("Behaviour", PinType::Behaviour),
        ("Any", PinType::Any),
        ("Digital", PinType::Digital),
        ("NoConnect", PinType::NoConnect),
        ("Passive", PinType::Passive),
    ];

    fn value(self) -> i32 {
        self as i32
    }
}

/// A schematic symbol pin with its designator and name labels.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LibPin {
    pub layer: String,
    pub origin: Point,
    pub pin_num: i32,
    pub pin_length: Decimal,
    pub is_flipped: bool,
    pub is_visible: bool,
    pub rotate: Decimal,
    pub width: Decimal,
    pub pin_type: PinType,
    pub designator: TextBlock,
    pub name: TextBlock,
}

field_table!(LibPin, || {
    FieldTable::new("Pin")
        .field("Layer", Binding::text(|p: &mut LibPin, v| p.layer = v))
        .field("Origin", Binding::point(|p: &mut LibPin, v| p.origin = v))
        .field("PinNum", Binding::integer(|p: &mut LibPin, v| p.pin_num = v))
        .field("PinLength", Binding::real(|p: &mut LibPin, v| p.pin_length = v))
        .field("IsFlipped", Binding::boolean(|p: &mut LibPin, v| p.is_flipped = v))
        .field("IsVisible", Binding::boolean(|p: &mut LibPin, v| p.is_visible = v))
        .field("Rotate", Binding::real(|p: &mut LibPin, v| p.rotate = v))
        .field("Width", Binding::real(|p: &mut LibPin, v| p.width = v))
        .field("PinType", Binding::enumeration(|p: &mut LibPin, v| p.pin_type = v))
});

/// A footprint pad. Also used for deleted pads.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LibPad {
    pub layer: String,
    pub origin: Point,
    pub number: i32,
    pub pin_name: String,
    /// Name of a [PadStack].
    pub pad_style: String,
    pub original_pad_style: String,
    pub mechanical: bool,
    pub original_pin_number: i32,
    pub rotate: Decimal,
}

field_table!(LibPad, || {
    FieldTable::new("Pad")
        .field("Layer", Binding::text(|p: &mut LibPad, v| p.layer = v))
        .field("Origin", Binding::point(|p: &mut LibPad, v| p.origin = v))
        .field("Number", Binding::integer(|p: &mut LibPad, v| p.number = v))
        .field("PinName", Binding::text(|p: &mut LibPad, v| p.pin_name = v))
        .field("PadStyle", Binding::text(|p: &mut LibPad, v| p.pad_style = v))
        .field(
            "OriginalPadStyle",
            Binding::text(|p: &mut LibPad, v| p.original_pad_style = v),
        )
        .field("Mechanical", Binding::boolean(|p: &mut LibPad, v| p.mechanical = v))
        .field(
            "OriginalPinNumber",
            Binding::integer(|p: &mut LibPad, v| p.original_pin_number = v),
        )
        .field("Rotate", Binding::real(|p: &mut LibPad, v| p.rotate = v))
});

/// A polygon outline. Also used for keepout polygons.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LibPoly {
    pub layer: String,
    pub origin: Point,
    pub property: String,
    pub width: Decimal,
    pub points: Vec<Point>,
}

field_table!(LibPoly, || {
    FieldTable::new("Poly")
        .field("Layer", Binding::text(|p: &mut LibPoly, v| p.layer = v))
        .field("Origin", Binding::point(|p: &mut LibPoly, v| p.origin = v))
        .field("Property", Binding::text(|p: &mut LibPoly, v| p.property = v))
        .field("Width", Binding::real(|p: &mut LibPoly, v| p.width = v))
        .field("Points", Binding::points(|p: &mut LibPoly| &mut p.points))
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct LibLine {
    pub layer: String,
    pub origin: Point,
    pub end_point: Point,
    pub width: Decimal,
}

field_table!(LibLine, || {
    FieldTable::new("Line")
        .field("Layer", Binding::text(|l: &mut LibLine, v| l.layer = v))
        .field("Origin", Binding::point(|l: &mut LibLine, v| l.origin = v))
        .field("EndPoint", Binding::point(|l: &mut LibLine, v| l.end_point = v))
        .field("Width", Binding::real(|l: &mut LibLine, v| l.width = v))
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct LibArc {
    pub layer: String,
    pub origin: Point,
    pub radius: Decimal,
    pub start_angle: Decimal,
    pub sweep_angle: Decimal,
    pub width: Decimal,
}

field_table!(LibArc, || {
    FieldTable::new("Arc")
        .field("Layer", Binding::text(|a: &mut LibArc, v| a.layer = v))
        .field("Origin", Binding::point(|a: &mut LibArc, v| a.origin = v))
        .field("Radius", Binding::real(|a: &mut LibArc, v| a.radius = v))
        .field("StartAngle", Binding::real(|a: &mut LibArc, v| a.start_angle = v))
        .field("SweepAngle", Binding::real(|a: &mut LibArc, v| a.sweep_angle = v))
        .field("Width", Binding::real(|a: &mut LibArc, v| a.width = v))
});

/// A named text value attached to a footprint, symbol or component, such as
/// `RefDes` or `Value`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LibAttribute {
    pub text: TextBlock,
    pub number: i32,
    pub name: String,
}

fn attribute_text(attribute: &mut LibAttribute) -> &mut TextBlock {
    &mut attribute.text
}

field_table!(LibAttribute, || {
    FieldTable::new("Attribute")
        .inherit(TextBlock::fields(), attribute_text)
        .field("Number", Binding::integer(|a: &mut LibAttribute, v| a.number = v))
        .field("Name", Binding::text(|a: &mut LibAttribute, v| a.name = v))
        .field(
            "Attr",
            Binding::text_pair(|a: &mut LibAttribute, (name, text)| {
                a.name = name;
                a.text.text = text;
            }),
        )
});

/// A footprint wizard variable.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LibWizard {
    pub layer: String,
    pub origin: Point,
    pub var_name: String,
    pub var_data: String,
}

field_table!(LibWizard, || {
    FieldTable::new("Wizard")
        .field("Layer", Binding::text(|w: &mut LibWizard, v| w.layer = v))
        .field("Origin", Binding::point(|w: &mut LibWizard, v| w.origin = v))
        .field("VarName", Binding::text(|w: &mut LibWizard, v| w.var_name = v))
        .field("VarData", Binding::text(|w: &mut LibWizard, v| w.var_data = v))
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct LibTemplateData {
    pub layer: String,
    pub origin: Point,
    pub data: String,
}

field_table!(LibTemplateData, || {
    FieldTable::new("Templatedata")
        .field("Layer", Binding::text(|t: &mut LibTemplateData, v| t.layer = v))
        .field("Origin", Binding::point(|t: &mut LibTemplateData, v| t.origin = v))
        .field("Data", Binding::text(|t: &mut LibTemplateData, v| t.data = v))
});

/// One graphical or logical element of a footprint, symbol or component.
#[derive(Debug, Clone, PartialEq)]
pub enum LibItem {
    Pin(LibPin),
    Pad(LibPad),
    DeletedPad(LibPad),
    Poly(LibPoly),
    PolyKeepout(LibPoly),
    Line(LibLine),
    Arc(LibArc),
    Text(TextBlock),
    Attribute(LibAttribute),
    Wizard(LibWizard),
    TemplateData(LibTemplateData),
}

impl LibItem {
    pub fn layer(&self) -> &str {
        match self {
            LibItem::Pin(pin) => &pin.layer,
            LibItem::Pad(pad) | LibItem::DeletedPad(pad) => &pad.layer,
            LibItem::Poly(poly) | LibItem::PolyKeepout(poly) => &poly.layer,
            LibItem::Line(line) => &line.layer,
            LibItem::Arc(arc) => &arc.layer,
            LibItem::Text(text) => &text.layer,
            LibItem::Attribute(attribute) => &attribute.text.layer,
            LibItem::Wizard(wizard) => &wizard.layer,
            LibItem::TemplateData(data) => &data.layer,
        }
    }

    pub fn origin(&self) -> Point {
        match self {
            LibItem::Pin(pin) => pin.origin,
            LibItem::Pad(pad) | LibItem::DeletedPad(pad) => pad.origin,
            LibItem::Poly(poly) | LibItem::PolyKeepout(poly) => poly.origin,
            LibItem::Line(line) => line.origin,
            LibItem::Arc(arc) => arc.origin,
            LibItem::Text(text) => text.origin,
            LibItem::Attribute(attribute) => attribute.text.origin,
            LibItem::Wizard(wizard) => wizard.origin,
            LibItem::TemplateData(data) => data.origin,
        }
    }
}

fn find_attribute<'a>(data: &'a [LibItem], name: &str) -> Option<&'a LibAttribute> {
    data.iter().find_map(|item| match item {
        LibItem::Attribute(attribute) if attribute.name.eq_ignore_ascii_case(name) => {
            Some(attribute)
        }
        _ => None,
    })
}

/// A PCB footprint.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Pattern {
    pub name: String,
    pub origin_point: Point,
    pub pick_point: Point,
    pub glue_point: Point,
    pub pins_renamed: bool,
    pub data: Vec<LibItem>,
}

impl Pattern {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Finds an attribute by name, ignoring case.
    pub fn attribute(&self, name: &str) -> Option<&LibAttribute> {
        find_attribute(&self.data, name)
    }
}

/// A schematic library symbol.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub origin_point: Point,
    pub original_name: Option<String>,
    pub edited: bool,
    pub data: Vec<LibItem>,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Finds an attribute by name, ignoring case.
    pub fn attribute(&self, name: &str) -> Option<&LibAttribute> {
        find_attribute(&self.data, name)
    }
}

/// A component-level pin, tying a symbol pin to a part and pin number.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CompPin {
    pub descriptor: String,
    pub name: String,
    pub part_num: i32,
    pub sym_pin_num: i32,
    pub gate_eq: i32,
    pub pin_eq: i32,
    pub pin_type: PinType,
    pub side: String,
    pub group: i32,
    pub inner_graphic: String,
    pub outer_graphic: String,
}

impl CompPin {
    pub fn new(descriptor: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

field_table!(CompPin, || {
    FieldTable::new("CompPin")
        .field("PartNum", Binding::integer(|p: &mut CompPin, v| p.part_num = v))
        .field("SymPinNum", Binding::integer(|p: &mut CompPin, v| p.sym_pin_num = v))
        .field("GateEq", Binding::integer(|p: &mut CompPin, v| p.gate_eq = v))
        .field("PinEq", Binding::integer(|p: &mut CompPin, v| p.pin_eq = v))
        .field("PinType", Binding::enumeration(|p: &mut CompPin, v| p.pin_type = v))
        .field("Side", Binding::text(|p: &mut CompPin, v| p.side = v))
        .field("Group", Binding::integer(|p: &mut CompPin, v| p.group = v))
        .field("InnerGraphic", Binding::text(|p: &mut CompPin, v| p.inner_graphic = v))
        .field("OuterGraphic", Binding::text(|p: &mut CompPin, v| p.outer_graphic = v))
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RelatedFile {
    pub file_name: String,
    pub file_type: String,
    pub path: String,
}

field_table!(RelatedFile, || {
    FieldTable::new("RelatedFile")
        .field("FileName", Binding::text(|f: &mut RelatedFile, v| f.file_name = v))
        .field("FileType", Binding::text(|f: &mut RelatedFile, v| f.file_type = v))
        .field("Path", Binding::text(|f: &mut RelatedFile, v| f.path = v))
});

/// A symbol used for one part (gate) of a component.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AttachedSymbol {
    pub part_num: i32,
    pub alt_type: String,
    pub symbol_name: String,
}

field_table!(AttachedSymbol, || {
    FieldTable::new("AttachedSymbol")
        .field("PartNum", Binding::integer(|s: &mut AttachedSymbol, v| s.part_num = v))
        .field("AltType", Binding::text(|s: &mut AttachedSymbol, v| s.alt_type = v))
        .field("SymbolName", Binding::text(|s: &mut AttachedSymbol, v| s.symbol_name = v))
});

/// Maps a footprint pad number to a component pin.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PadNum {
    pub number: i32,
    pub comp_pin_ref: String,
}

impl PadNum {
    pub fn new(number: i32) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }
}

field_table!(PadNum, || {
    FieldTable::new("PadNum")
        .field("CompPinRef", Binding::text(|p: &mut PadNum, v| p.comp_pin_ref = v))
});

/// A library part tying a footprint, its symbols and pin mappings together.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Component {
    pub name: String,
    pub pattern_name: Option<String>,
    pub alternate_patterns: Vec<String>,
    pub original_name: Option<String>,
    pub source_library: Option<String>,
    pub ref_des_prefix: Option<String>,
    pub composition: Option<String>,
    pub alt_ieee: bool,
    pub alt_de_morgan: bool,
    pub revision_level: Option<String>,
    pub revision_note: Option<String>,
    pub pins: Vec<CompPin>,
    pub data: Vec<LibItem>,
    pub related_files: Vec<RelatedFile>,
    pub attached_symbols: Vec<AttachedSymbol>,
    pub pin_map: Vec<PadNum>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn number_of_pins(&self) -> usize {
        self.pins.len()
    }

    /// The highest part index used by any pin or attached symbol, or 0 when
    /// there are neither.
    pub fn num_parts(&self) -> i32 {
        self.pins
            .iter()
            .map(|pin| pin.part_num)
            .chain(self.attached_symbols.iter().map(|symbol| symbol.part_num))
            .max()
            .unwrap_or(0)
    }

    /// Finds an attribute by name, ignoring case.
    pub fn attribute(&self, name: &str) -> Option<&LibAttribute> {
        find_attribute(&self.data, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_is_another_name_for_round() {
        assert_eq!(PadShapeKind::from_name("Circle"), Some(PadShapeKind::Round));
        assert_eq!(PadShapeKind::from_value(0), Some(PadShapeKind::Round));
        assert_eq!(PadShapeKind::from_name("thermal-x"), Some(PadShapeKind::ThermalX));
    }

    #[test]
    fn pin_type_accepts_spaced_names() {
        assert_eq!(PinType::from_name("Open Collector"), Some(PinType::OpenCollector));
        assert_eq!(PinType::from_name("bi_directional"), Some(PinType::BiDirectional));
        assert_eq!(PinType::from_value(14), Some(PinType::Passive));
        assert_eq!(PinType::from_value(15), None);
    }

    #[test]
    fn num_parts_is_zero_without_pins_or_symbols() {
        assert_eq!(Component::new("EMPTY").num_parts(), 0);
    }

    #[test]
    fn num_parts_covers_pins_and_attached_symbols() {
        let mut component = Component::new("QUAD");
        let mut pin = CompPin::new("1", "A");
        pin.part_num = 2;
        component.pins.push(pin);
        component.attached_symbols.push(AttachedSymbol {
            part_num: 4,
            ..Default::default()
        });
        assert_eq!(component.num_parts(), 4);
        assert_eq!(component.number_of_pins(), 1);
    }

    #[test]
    fn attribute_lookup_ignores_case() {
        let mut pattern = Pattern::new("SOIC8");
        pattern.data.push(LibItem::Attribute(LibAttribute {
            name: "RefDes".to_string(),
            ..Default::default()
        }));
        assert!(pattern.attribute("REFDES").is_some());
        assert!(pattern.attribute("Value").is_none());
    }

    #[test]
    fn attribute_table_includes_text_fields() {
        let table = LibAttribute::fields();
        assert!(table.lookup("Attr").is_some());
        assert!(table.lookup("Justify").is_some());
        assert!(table.lookup("TextStyleRef").is_some());
        assert!(table.origin().is_some());
    }
}
