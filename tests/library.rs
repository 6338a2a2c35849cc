// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  tests/library.rs - Integration tests for component library files.
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

use std::path::PathBuf;

use rust_decimal::Decimal;

use bxl::decoder::FileType;
use bxl::fields::Enumeration;
use bxl::geometry::Point;
use bxl::interpreter::InterpretedBxlFile;
use bxl::library::{LibItem, PadShapeKind, PinType, TextJustification};
use bxl::parser::ParsedBxlFile;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn parse_fixture() -> ParsedBxlFile {
    ParsedBxlFile::from_filename(fixture("SOIC8.xlr"), FileType::FromExtension, None)
        .expect("fixture should be readable")
}

fn point(x: i64, y: i64) -> Point {
    Point::new(Decimal::from(x), Decimal::from(y))
}

#[test]
fn library_parses_without_diagnostics() {
    let parsed = parse_fixture();
    assert!(parsed.logs.is_empty(), "{:#?}", parsed.logs);

    let document = &parsed.document;
    assert_eq!(document.text_styles.len(), 1);
    assert_eq!(document.pad_stacks.len(), 2);
    assert_eq!(document.footprints.len(), 1);
    assert_eq!(document.symbols.len(), 1);
    assert_eq!(document.components.len(), 1);
}

#[test]
fn text_style_and_pad_stacks() {
    let parsed = parse_fixture();
    let document = &parsed.document;

    let style = document.text_style("h80S8").expect("text style");
    assert_eq!(style.font_height, Decimal::from(80));
    assert_eq!(style.font_char_width, Some(Decimal::from(67)));

    let smd = document.pad_stack("RX59Y17D0T").expect("pad stack");
    assert!(smd.surface);
    assert_eq!(smd.shapes[0].kind, PadShapeKind::Rectangle);
    assert_eq!(smd.shapes[0].height, Decimal::from(17));

    let through_hole = document.pad_stack("C40H25").expect("pad stack");
    assert!(through_hole.plated);
    assert_eq!(through_hole.hole_diam, Decimal::from(25));
    let layers: Vec<_> = through_hole.shapes.iter().map(|s| s.layer.as_str()).collect();
    assert_eq!(layers, vec!["TOP", "BOTTOM"]);
}

#[test]
fn footprint_items() {
    let parsed = parse_fixture();
    let footprint = parsed.document.footprint("SOIC8_TI").expect("footprint");
    assert_eq!(footprint.origin_point, point(0, 0));
    assert_eq!(footprint.data.len(), 5);

    let LibItem::Pad(first) = &footprint.data[0] else {
        panic!("expected a pad, got {:?}", footprint.data[0]);
    };
    assert_eq!(first.number, 1);
    assert_eq!(first.pad_style, "RX59Y17D0T");
    assert_eq!(first.origin, point(-100, 75));

    let LibItem::Line(line) = &footprint.data[3] else {
        panic!("expected a line, got {:?}", footprint.data[3]);
    };
    assert_eq!(line.origin, Point::new(Decimal::new(-765, 1), Decimal::from(-98)));
    assert_eq!(line.layer, "TOP_ASSEMBLY");

    let refdes = footprint.attribute("refdes").expect("RefDes attribute");
    assert_eq!(refdes.text.text, "RefDes");
    assert_eq!(refdes.text.justify, TextJustification::Center);
    assert!(refdes.text.is_visible);
}

#[test]
fn symbol_pins_carry_their_labels() {
    let parsed = parse_fixture();
    let symbol = parsed.document.symbol("LM358").expect("symbol");
    assert_eq!(symbol.original_name.as_deref(), Some("LM358"));
    assert!(!symbol.edited);
    assert_eq!(symbol.data.len(), 3);

    let LibItem::Pin(pin) = &symbol.data[0] else {
        panic!("expected a pin, got {:?}", symbol.data[0]);
    };
    assert_eq!(pin.pin_type, PinType::Output);
    assert_eq!(pin.pin_length, Decimal::from(200));
    assert_eq!(pin.designator.text, "1");
    assert_eq!(pin.designator.justify, TextJustification::LowerCenter);
    assert_eq!(pin.name.text, "OUT");
    assert_eq!(pin.name.origin, point(235, 0));

    let LibItem::Text(text) = &symbol.data[2] else {
        panic!("expected text, got {:?}", symbol.data[2]);
    };
    assert_eq!(text.text, "LM358");
    assert_eq!(text.justify, TextJustification::LowerLeft);
}

#[test]
fn component_header_and_sections() {
    let parsed = parse_fixture();
    let component = parsed.document.component("lm358d").expect("component");

    assert_eq!(component.pattern_name.as_deref(), Some("SOIC8_TI"));
    assert_eq!(component.source_library.as_deref(), Some("Texas Instruments"));
    assert_eq!(component.ref_des_prefix.as_deref(), Some("U"));
    assert_eq!(component.composition.as_deref(), Some("Homogeneous"));
    assert_eq!(component.revision_level, None);
    assert_eq!(component.revision_note, None);

    assert_eq!(component.number_of_pins(), 2);
    assert_eq!(component.num_parts(), 1);
    assert_eq!(component.pins[1].descriptor, "2");
    assert_eq!(component.pins[1].name, "IN-");
    assert_eq!(component.pins[1].pin_type, PinType::Input);
    assert_eq!(component.pins[1].side, "Left");

    let manufacturer = component.attribute("manufacturer_name").expect("attribute");
    assert_eq!(manufacturer.text.text, "Texas Instruments");

    assert_eq!(component.attached_symbols.len(), 1);
    assert_eq!(component.attached_symbols[0].symbol_name, "LM358");
    assert_eq!(component.pin_map.len(), 2);
    assert_eq!(component.pin_map[1].comp_pin_ref, "2");
}

#[test]
fn pin_type_numbers_match_names() {
    assert_eq!(PinType::Output.value(), 2);
    assert_eq!(PinType::from_value(PinType::Input.value()), Some(PinType::Input));
}

#[test]
fn interpreted_pads_are_in_millimeters() {
    let parsed = parse_fixture();
    let interpreted = InterpretedBxlFile::from_parsed(&parsed);
    let pads = &interpreted.footprints["SOIC8_TI"].pads;
    assert_eq!(pads.len(), 3);

    assert_eq!(pads[0].x_mm, Decimal::new(-254, 2));
    assert_eq!(pads[0].y_mm, Decimal::new(1905, 3));
    assert_eq!(pads[0].hole_diam_mm, Some(Decimal::ZERO));

    let mounting = &pads[2];
    assert_eq!(mounting.pin_name, "MH");
    assert_eq!(mounting.rotate, Decimal::from(90));
    assert_eq!(mounting.hole_diam_mm, Some(Decimal::new(635, 3)));
}

#[test]
fn missing_file_is_an_error() {
    let result = ParsedBxlFile::from_filename(fixture("missing.bxl"), FileType::Binary, None);
    let error = result.expect_err("reading a missing file should fail");
    assert!(error.to_string().contains("missing.bxl"), "{error}");
}
