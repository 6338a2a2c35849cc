// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/instance.rs - Board and schematic instance entities found in BXL files.
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
 * # `instance` Module
 *
 * Placed data from full board and schematic exports: component placements,
 * vias, nets, schematic sheets and the geometry found on numbered layers.
 */

use rust_decimal::Decimal;

use crate::fields::{Binding, FieldTable, Fields, field_table};
use crate::geometry::{Point, Region};
use crate::library::{LayerType, TextBlock};

/// A placed component on the board or on a schematic sheet.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ComponentInstance {
    pub designator: String,
    pub comp_name: String,
    pub point: Point,
    pub rotate: Decimal,
    pub pattern_ref: String,
    pub attributes: Vec<InstAttribute>,
}

impl ComponentInstance {
    pub fn new(designator: impl Into<String>) -> Self {
        Self {
            designator: designator.into(),
            ..Default::default()
        }
    }
}

field_table!(ComponentInstance, || {
    FieldTable::new("ComponentInstance")
        .field("CompName", Binding::text(|c: &mut ComponentInstance, v| c.comp_name = v))
        .field("Point", Binding::point(|c: &mut ComponentInstance, v| c.point = v))
        .field("Rotate", Binding::real(|c: &mut ComponentInstance, v| c.rotate = v))
        .field("PatternRef", Binding::text(|c: &mut ComponentInstance, v| c.pattern_ref = v))
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ViaInstance {
    pub origin: Point,
    pub via_style: String,
    pub net_name_ref: String,
}

field_table!(ViaInstance, || {
    FieldTable::new("ViaInstance")
        .field("Origin", Binding::point(|v: &mut ViaInstance, p| v.origin = p))
        .field("ViaStyle", Binding::text(|v: &mut ViaInstance, s| v.via_style = s))
        .field("NetNameRef", Binding::text(|v: &mut ViaInstance, s| v.net_name_ref = s))
});

/// One end of a net connection: a component designator and a pin.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NetNode {
    pub component: String,
    pub pin: String,
}

impl NetNode {
    pub fn new(component: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            pin: pin.into(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct NetInstance {
    pub name: String,
    pub number: i32,
    pub nodes: Vec<NetNode>,
}

impl NetInstance {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

field_table!(NetInstance, || {
    FieldTable::new("NetInstance")
        .field("Number", Binding::integer(|n: &mut NetInstance, v| n.number = v))
        .field("Nodes", Binding::nodes(|n: &mut NetInstance| &mut n.nodes))
        .alias("Node")
});

/// The schematic drawing area and its grid.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Workspace {
    pub region: Region,
    pub grid: Decimal,
}

fn workspace_region(workspace: &mut Workspace) -> &mut Region {
    &mut workspace.region
}

field_table!(Workspace, || {
    FieldTable::new("Workspace")
        .inherit(Region::fields(), workspace_region)
        .field("Grid", Binding::real(|w: &mut Workspace, v| w.grid = v))
});

/// Schematic-wide settings from the `SchematicData` section.
#[derive(Debug, Clone, PartialEq)]
pub struct SchematicData {
    pub units: String,
    pub workspace: Workspace,
    pub attributes: Vec<(String, String)>,
    /// Sheet numbers and names.
    pub sheets: Vec<(i32, String)>,
}

impl Default for SchematicData {
    fn default() -> Self {
        Self {
            units: "mil".to_string(),
            workspace: Workspace::default(),
            attributes: Vec::new(),
            sheets: Vec::new(),
        }
    }
}

/// One page of a schematic.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub number: i32,
    pub show_border: bool,
    pub border_name: String,
    pub scale_factor: Decimal,
    pub offset: Point,
    pub data: Vec<InstItem>,
}

/// Geometry drawn on one numbered board layer.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LayerNumber {
    pub id: i32,
    pub layer_name: String,
    pub layer_num: i32,
    pub layer_type: LayerType,
    pub order_number: i32,
    pub data: Vec<InstItem>,
}

field_table!(LayerNumber, || {
    FieldTable::new("LayerNumber")
        .field("LayerName", Binding::text(|l: &mut LayerNumber, v| l.layer_name = v))
        .field("LayerNum", Binding::integer(|l: &mut LayerNumber, v| l.layer_num = v))
        .field("LayerType", Binding::enumeration(|l: &mut LayerNumber, v| l.layer_type = v))
        .field("OrderNumber", Binding::integer(|l: &mut LayerNumber, v| l.order_number = v))
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InstWire {
    pub layer: String,
    pub origin: Point,
    pub end_point: Point,
    pub width: Decimal,
    pub net_name_ref: String,
}

field_table!(InstWire, || {
    FieldTable::new("Wire")
        .field("Layer", Binding::text(|w: &mut InstWire, v| w.layer = v))
        .field("Origin", Binding::point(|w: &mut InstWire, v| w.origin = v))
        .field("EndPoint", Binding::point(|w: &mut InstWire, v| w.end_point = v))
        .field("Width", Binding::real(|w: &mut InstWire, v| w.width = v))
        .field("NetNameRef", Binding::text(|w: &mut InstWire, v| w.net_name_ref = v))
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InstPort {
    pub layer: String,
    pub origin: Point,
    pub name: String,
    pub port_type: String,
    pub rotate: Decimal,
    pub is_flipped: bool,
    pub net_name_ref: String,
}

field_table!(InstPort, || {
    FieldTable::new("Port")
        .field("Layer", Binding::text(|p: &mut InstPort, v| p.layer = v))
        .field("Origin", Binding::point(|p: &mut InstPort, v| p.origin = v))
        .field("Name", Binding::text(|p: &mut InstPort, v| p.name = v))
        .field("PortType", Binding::text(|p: &mut InstPort, v| p.port_type = v))
        .field("Rotate", Binding::real(|p: &mut InstPort, v| p.rotate = v))
        .alias("Rotated")
        .field("IsFlipped", Binding::boolean(|p: &mut InstPort, v| p.is_flipped = v))
        .alias("Flipped")
        .field("NetNameRef", Binding::text(|p: &mut InstPort, v| p.net_name_ref = v))
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InstJunction {
    pub layer: String,
    pub origin: Point,
    pub net_name_ref: String,
}

field_table!(InstJunction, || {
    FieldTable::new("Junction")
        .field("Layer", Binding::text(|j: &mut InstJunction, v| j.layer = v))
        .field("Origin", Binding::point(|j: &mut InstJunction, v| j.origin = v))
        .field("NetNameRef", Binding::text(|j: &mut InstJunction, v| j.net_name_ref = v))
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InstLine {
    pub layer: String,
    pub origin: Point,
    /// The far end of the line.
    pub point1: Point,
    pub width: Decimal,
}

field_table!(InstLine, || {
    FieldTable::new("Line")
        .field("Layer", Binding::text(|l: &mut InstLine, v| l.layer = v))
        .field("Origin", Binding::point(|l: &mut InstLine, v| l.origin = v))
        .field("Point1", Binding::point(|l: &mut InstLine, v| l.point1 = v))
        .alias("Point2")
        .field("Width", Binding::real(|l: &mut InstLine, v| l.width = v))
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InstArc {
    pub layer: String,
    pub origin: Point,
    pub radius: Decimal,
    pub start_angle: Decimal,
    pub sweep_angle: Decimal,
    pub width: Decimal,
}

field_table!(InstArc, || {
    FieldTable::new("Arc")
        .field("Layer", Binding::text(|a: &mut InstArc, v| a.layer = v))
        .field("Origin", Binding::point(|a: &mut InstArc, v| a.origin = v))
        .field("Radius", Binding::real(|a: &mut InstArc, v| a.radius = v))
        .field("StartAngle", Binding::real(|a: &mut InstArc, v| a.start_angle = v))
        .field("SweepAngle", Binding::real(|a: &mut InstArc, v| a.sweep_angle = v))
        .field("Width", Binding::real(|a: &mut InstArc, v| a.width = v))
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InstPoly {
    pub layer: String,
    pub origin: Point,
    pub width: Decimal,
    pub points: Vec<Point>,
}

field_table!(InstPoly, || {
    FieldTable::new("Poly")
        .field("Layer", Binding::text(|p: &mut InstPoly, v| p.layer = v))
        .field("Origin", Binding::point(|p: &mut InstPoly, v| p.origin = v))
        .field("Width", Binding::real(|p: &mut InstPoly, v| p.width = v))
        .field("Points", Binding::points(|p: &mut InstPoly| &mut p.points))
        .alias("PPoint")
});

/// A poured copper area: a polygon with pour and thermal relief settings.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InstCopperPour {
    pub poly: InstPoly,
    pub pour_type: String,
    pub pour_spacing: Decimal,
    pub use_design_rules: bool,
    pub thermal_type: String,
    pub thermal_width: Decimal,
    pub thermal_spokes: i32,
}

fn copper_pour_poly(pour: &mut InstCopperPour) -> &mut InstPoly {
    &mut pour.poly
}

field_table!(InstCopperPour, || {
    FieldTable::new("Copperpour")
        .inherit(InstPoly::fields(), copper_pour_poly)
        .field("PourType", Binding::text(|c: &mut InstCopperPour, v| c.pour_type = v))
        .field("PourSpacing", Binding::real(|c: &mut InstCopperPour, v| c.pour_spacing = v))
        .field(
            "UseDesignRules",
            Binding::boolean(|c: &mut InstCopperPour, v| c.use_design_rules = v),
        )
        .field("ThermalType", Binding::text(|c: &mut InstCopperPour, v| c.thermal_type = v))
        .field("ThermalWidth", Binding::real(|c: &mut InstCopperPour, v| c.thermal_width = v))
        .field(
            "ThermalSpokes",
            Binding::integer(|c: &mut InstCopperPour, v| c.thermal_spokes = v),
        )
});

/// A placed reference to a library symbol on a schematic sheet.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InstSymbol {
    pub layer: String,
    pub origin: Point,
    pub rotate: Decimal,
    pub symbol_name: String,
    pub ref_des: String,
    pub gate_number: i32,
    pub is_flipped: bool,
}

field_table!(InstSymbol, || {
    FieldTable::new("Symbol")
        .field("Layer", Binding::text(|s: &mut InstSymbol, v| s.layer = v))
        .field("Origin", Binding::point(|s: &mut InstSymbol, v| s.origin = v))
        .field("Rotate", Binding::real(|s: &mut InstSymbol, v| s.rotate = v))
        .alias("Rotated")
        .field("SymbolName", Binding::text(|s: &mut InstSymbol, v| s.symbol_name = v))
        .field("RefDes", Binding::text(|s: &mut InstSymbol, v| s.ref_des = v))
        .field("GateNumber", Binding::integer(|s: &mut InstSymbol, v| s.gate_number = v))
        .field("IsFlipped", Binding::boolean(|s: &mut InstSymbol, v| s.is_flipped = v))
        .alias("Flipped")
});

/// A placed attribute, such as a designator or value label.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InstAttribute {
    pub text: TextBlock,
    pub name: String,
    pub ref_des: String,
    pub gate_number: i32,
}

fn attribute_text(attribute: &mut InstAttribute) -> &mut TextBlock {
    &mut attribute.text
}

field_table!(InstAttribute, || {
    FieldTable::new("Attribute")
        .inherit(TextBlock::fields(), attribute_text)
        .field("Name", Binding::text(|a: &mut InstAttribute, v| a.name = v))
        .field("RefDes", Binding::text(|a: &mut InstAttribute, v| a.ref_des = v))
        .field("GateNumber", Binding::integer(|a: &mut InstAttribute, v| a.gate_number = v))
        .field(
            "Attribute",
            Binding::text_pair(|a: &mut InstAttribute, (name, text)| {
                a.name = name;
                a.text.text = text;
            }),
        )
        .alias("AttrName")
});

/// One element of a schematic sheet or board layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InstItem {
    Wire(InstWire),
    Port(InstPort),
    Junction(InstJunction),
    Line(InstLine),
    Arc(InstArc),
    Poly(InstPoly),
    CopperPour(InstCopperPour),
    Text(TextBlock),
    Symbol(InstSymbol),
    Attribute(InstAttribute),
}

impl InstItem {
    pub fn layer(&self) -> &str {
        match self {
            InstItem::Wire(wire) => &wire.layer,
            InstItem::Port(port) => &port.layer,
            InstItem::Junction(junction) => &junction.layer,
            InstItem::Line(line) => &line.layer,
            InstItem::Arc(arc) => &arc.layer,
            InstItem::Poly(poly) => &poly.layer,
            InstItem::CopperPour(pour) => &pour.poly.layer,
            InstItem::Text(text) => &text.layer,
            InstItem::Symbol(symbol) => &symbol.layer,
            InstItem::Attribute(attribute) => &attribute.text.layer,
        }
    }

    pub fn origin(&self) -> Point {
        match self {
            InstItem::Wire(wire) => wire.origin,
            InstItem::Port(port) => port.origin,
            InstItem::Junction(junction) => junction.origin,
            InstItem::Line(line) => line.origin,
            InstItem::Arc(arc) => arc.origin,
            InstItem::Poly(poly) => poly.origin,
            InstItem::CopperPour(pour) => pour.poly.origin,
            InstItem::Text(text) => text.origin,
            InstItem::Symbol(symbol) => symbol.origin,
            InstItem::Attribute(attribute) => attribute.text.origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copper_pour_inherits_polygon_fields() {
        let table = InstCopperPour::fields();
        assert_eq!(table.lookup("PPoint").map(|f| f.name()), Some("Points"));
        assert!(table.lookup("ThermalSpokes").is_some());
        assert!(table.points().is_some());
        assert!(table.origin().is_some());
    }

    #[test]
    fn workspace_accepts_region_corners() {
        let table = Workspace::fields();
        assert!(table.lookup("LL").is_some());
        assert!(table.lookup("UpperRight").is_some());
        assert!(table.lookup("Grid").is_some());
    }

    #[test]
    fn schematic_units_default_to_mils() {
        assert_eq!(SchematicData::default().units, "mil");
    }

    #[test]
    fn legacy_names_resolve_to_canonical_fields() {
        assert_eq!(InstLine::fields().lookup("point2").map(|f| f.name()), Some("Point1"));
        assert_eq!(InstSymbol::fields().lookup("Flipped").map(|f| f.name()), Some("IsFlipped"));
        assert_eq!(
            InstAttribute::fields().lookup("AttrName").map(|f| f.name()),
            Some("Attribute")
        );
        assert_eq!(NetInstance::fields().lookup("Node").map(|f| f.name()), Some("Nodes"));
    }
}
