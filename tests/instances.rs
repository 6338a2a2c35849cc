// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  tests/instances.rs - Integration tests for placed design data.
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

use rust_decimal::Decimal;

use bxl::geometry::Point;
use bxl::instance::InstItem;
use bxl::library::LayerType;
use bxl::parser::ParsedBxlFile;

const DESIGN: &str = r#"WorkSpaceSize (LowerLeft 0, 0) (UpperRight 10000, 8000)
ComponentInstances : 1
Component "U1" (CompName "LM358D") (PatternRef "SOIC8_TI") (Point 1000, 2000) (Rotate 90)
Attribute (Layer TOP_SILKSCREEN) (Origin 1000, 2100) (Attribute "RefDes", "U1") (IsVisible True)
Attribute (Layer TOP_ASSEMBLY) (Origin 1000, 2000) (Attribute "Value", "LM358")
ViaInstances : 1
Via (ViaStyle "V20") (NetNameRef "GND") (Origin 500, 500)
Nets : 2
Net "GND" (Number 1) (Nodes U1/4, J1/2)
Net "OUT" (Number 2) (Node U1/1) (Node R1/2)
SchematicData : 1
Units "mil"
Workspace (LowerLeft 0, 0) (UpperRight 11000, 8500) (Grid 100)
Attribute "Title", "Demo board"
Sheet (Name 1, "Main")
Sheets : 1
Sheet : 1
Name "Main"
Number 1
ShowBorder "True"
ScaleFactor 1.0
OffSet 0, 0
Data : 2
Wire (Layer Wire) (Origin 0, 0) (EndPoint 100, 0) (Width 10) (NetNameRef "GND")
Symbol (SymbolName "LM358") (RefDes "U1") (GateNumber 1) (Origin 500, 500) (Rotate 0)
EndData
Layers : 1
LayerNumber : 1 (LayerName "TOP") (LayerNum 1) (LayerType Signal)
Line (Layer TOP) (Origin 0, 0) (Width 5)
Copperpour (Layer TOP) (PourType Solid) (0, 0) (100, 0) (100, 100)
End of File
"#;

fn point(x: i64, y: i64) -> Point {
    Point::new(Decimal::from(x), Decimal::from(y))
}

fn parse() -> ParsedBxlFile {
    let parsed = ParsedBxlFile::from_text(DESIGN, "design.xlr", None);
    assert!(parsed.logs.is_empty(), "{:#?}", parsed.logs);
    parsed
}

#[test]
fn work_space_and_component_instances() {
    let document = parse().document;
    assert_eq!(document.work_space_size.upper_right, point(10000, 8000));

    assert_eq!(document.component_instances.len(), 1);
    let u1 = &document.component_instances[0];
    assert_eq!(u1.designator, "U1");
    assert_eq!(u1.comp_name, "LM358D");
    assert_eq!(u1.point, point(1000, 2000));
    assert_eq!(u1.rotate, Decimal::from(90));

    let attributes: Vec<_> = u1
        .attributes
        .iter()
        .map(|a| (a.name.as_str(), a.text.text.as_str()))
        .collect();
    assert_eq!(attributes, vec![("RefDes", "U1"), ("Value", "LM358")]);
}

#[test]
fn vias_and_nets() {
    let document = parse().document;
    assert_eq!(document.via_instances[0].net_name_ref, "GND");
    assert_eq!(document.via_instances[0].origin, point(500, 500));

    let gnd = &document.nets[0];
    let nodes: Vec<_> = gnd
        .nodes
        .iter()
        .map(|n| format!("{}/{}", n.component, n.pin))
        .collect();
    assert_eq!(nodes, vec!["U1/4", "J1/2"]);

    // Repeated node properties accumulate.
    assert_eq!(document.nets[1].nodes.len(), 2);
}

#[test]
fn schematic_settings_and_sheets() {
    let document = parse().document;
    let schematic = &document.schematic_data;
    assert_eq!(schematic.units, "mil");
    assert_eq!(schematic.workspace.grid, Decimal::from(100));
    assert_eq!(
        schematic.attributes,
        vec![("Title".to_string(), "Demo board".to_string())]
    );
    assert_eq!(schematic.sheets, vec![(1, "Main".to_string())]);

    assert_eq!(document.schematic_sheets.len(), 1);
    let sheet = &document.schematic_sheets[0];
    assert_eq!(sheet.name, "Main");
    assert!(sheet.show_border);
    assert_eq!(sheet.scale_factor, Decimal::ONE);
    assert_eq!(sheet.data.len(), 2);
    assert!(matches!(&sheet.data[0], InstItem::Wire(wire) if wire.net_name_ref == "GND"));
    assert!(matches!(&sheet.data[1], InstItem::Symbol(symbol) if symbol.ref_des == "U1"));
}

#[test]
fn layer_geometry() {
    let document = parse().document;
    assert_eq!(document.layers.len(), 1);
    let layer = &document.layers[0];
    assert_eq!(layer.id, 1);
    assert_eq!(layer.layer_name, "TOP");
    assert_eq!(layer.layer_type, LayerType::Signal);
    assert_eq!(layer.data.len(), 2);

    let InstItem::CopperPour(pour) = &layer.data[1] else {
        panic!("expected a copper pour, got {:?}", layer.data[1]);
    };
    assert_eq!(pour.pour_type, "Solid");
    assert_eq!(pour.poly.points, vec![point(0, 0), point(100, 0), point(100, 100)]);
}
