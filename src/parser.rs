// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/parser.rs - Parse decoded BXL text into a document.
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
 * # `parser` Module
 *
 * This module turns decoded BXL text into a [BxlDocument].
 *
 * The parser is a recursive-descent reader over the [Tokenizer]. It never
 * fails: anything it cannot make sense of is skipped, with a [LogEntry]
 * describing what was dropped. A real syntax violation stops the parse with
 * a single error entry, and the document read up to that point is kept.
 *
 * ## Usage Example
 *
 * ```no_run
 * use bxl::decoder::FileType;
 * use bxl::parser::ParsedBxlFile;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     // Decode and parse the file
 *     let parsed = ParsedBxlFile::from_filename("example.bxl", FileType::FromExtension, None)?;
 *
 *     // Access parsed data
 *     for footprint in &parsed.document.footprints {
 *         println!("Footprint: {}", footprint.name);
 *     }
 *
 *     // Show what was skipped
 *     for entry in &parsed.logs {
 *         eprintln!("{entry}");
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use log::{debug, error, info, warn};
use rust_decimal::Decimal;

use crate::decoder::{DecodedBxlFile, FileType};
use crate::document::{BxlDocument, LogEntry, LogSeverity, Logs};
use crate::error::{Error, ParseError};
use crate::fields::{Binding, EnumValue, Enumeration, Fields};
use crate::geometry::Point;
use crate::instance::{
    ComponentInstance, InstAttribute, InstItem, LayerNumber, NetInstance, NetNode, SchematicData,
    Sheet, ViaInstance,
};
use crate::library::{
    AttachedSymbol, CompPin, Component, Layer, LayerType, LibItem, LibPin, PadNum, PadShape,
    PadShapeKind, PadStack, Pattern, RelatedFile, Symbol, TextStyle,
};
use crate::tokenizer::{Keyword, TokenKind, Tokenizer, Value};

type ParseResult<T> = Result<T, ParseError>;

const fn kw(keyword: Keyword) -> TokenKind {
    TokenKind::Keyword(keyword)
}

/// Top-level keywords the parser can resume from after skipping input.
const ANCHORS: &[TokenKind] = &[
    kw(Keyword::LayerData),
    kw(Keyword::TextStyles),
    kw(Keyword::PadStacks),
    kw(Keyword::Patterns),
    kw(Keyword::Symbols),
    kw(Keyword::Components),
    kw(Keyword::WorkSpaceSize),
    kw(Keyword::ComponentInstances),
    kw(Keyword::ViaInstances),
    kw(Keyword::Nets),
    kw(Keyword::SchematicComponentInstances),
    kw(Keyword::SchematicNets),
    kw(Keyword::SchematicData),
    kw(Keyword::Sheets),
    kw(Keyword::Layers),
    kw(Keyword::EndOfFile),
    kw(Keyword::TextStyle),
    kw(Keyword::PadStack),
    kw(Keyword::Pattern),
    kw(Keyword::Symbol),
    kw(Keyword::Component),
];

/// Keywords that start an item inside a `LayerNumber` block.
const INST_ITEMS: &[TokenKind] = &[
    kw(Keyword::Wire),
    kw(Keyword::Port),
    kw(Keyword::Junction),
    kw(Keyword::Line),
    kw(Keyword::Arc),
    kw(Keyword::Poly),
    kw(Keyword::Copperpour),
    kw(Keyword::Text),
    kw(Keyword::Symbol),
    kw(Keyword::Attribute),
];

/// Parses one BXL text into a [BxlDocument].
///
/// `reference` names the input in log messages; only its file name part is
/// used.
pub struct Parser<'a> {
    text: &'a str,
    reference: String,
    logs: Logs,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str, reference: impl Into<String>) -> Self {
        Self {
            text,
            reference: reference.into(),
            logs: Logs::new(),
        }
    }

    /// Parses the whole text and returns the document.
    ///
    /// This never fails. If parsing stops early, [Parser::logs] ends with an
    /// error entry and the returned document holds everything read before it.
    /// `progress` receives non-decreasing percentages, starting with 0.
    pub fn execute(&mut self, progress: Option<&mut dyn FnMut(u8)>) -> BxlDocument {
        info!(reference = self.reference.as_str(), bytes = self.text.len(); "Parsing BXL text");

        let file_name = Path::new(&self.reference)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.reference.clone());
        let mut reader = Reader::new(self.text, file_name, progress);
        let mut document = BxlDocument::default();

        reader.start_progress();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> ParseResult<()> {
            reader.tokenizer.reset()?;
            reader.read_document(&mut document)
        }));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => reader.log(LogSeverity::Error, err),
            Err(payload) => reader.log(
                LogSeverity::InternalError,
                format_args!("Internal error: {}", panic_message(payload.as_ref())),
            ),
        }
        reader.report_progress(true);

        self.logs = reader.logs;
        debug!(
            footprints = document.footprints.len(),
            symbols = document.symbols.len(),
            components = document.components.len(),
            entries = self.logs.len();
            "Finished parsing {}", self.reference
        );
        document
    }

    /// Diagnostics from the last [Parser::execute].
    pub fn logs(&self) -> &Logs {
        &self.logs
    }

    pub fn into_logs(self) -> Logs {
        self.logs
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

struct Reader<'a, 'p> {
    tokenizer: Tokenizer<'a>,
    file_name: String,
    logs: Logs,
    progress: Option<&'p mut dyn FnMut(u8)>,
    progress_position: usize,
    progress_value: u8,
    progress_delta: usize,
}

impl<'a, 'p> Reader<'a, 'p> {
    fn new(text: &'a str, file_name: String, progress: Option<&'p mut dyn FnMut(u8)>) -> Self {
        Self {
            tokenizer: Tokenizer::new(text),
            file_name,
            logs: Logs::new(),
            progress,
            progress_position: 0,
            progress_value: 0,
            progress_delta: text.len() / 100,
        }
    }

    fn start_progress(&mut self) {
        if let Some(progress) = self.progress.as_deref_mut() {
            progress(0);
        }
    }

    /// Reports progress unless less than 1% of the input was consumed since
    /// the last report.
    fn report_progress(&mut self, force: bool) {
        let position = self.tokenizer.position();
        if !force && position < self.progress_position + self.progress_delta {
            return;
        }
        let Some(progress) = self.progress.as_deref_mut() else {
            return;
        };
        let total = self.tokenizer.text().len();
        let value = if total == 0 {
            100
        } else {
            (position.min(total) * 100 / total) as u8
        };
        self.progress_position = position;
        self.progress_value = self.progress_value.max(value);
        progress(self.progress_value);
    }

    fn log(&mut self, severity: LogSeverity, message: impl fmt::Display) {
        let message = format!(
            "{}:{}:{} {message}",
            self.file_name,
            self.tokenizer.line(),
            self.tokenizer.column()
        );
        match severity {
            LogSeverity::Information => debug!("{message}"),
            LogSeverity::Warning => warn!("{message}"),
            LogSeverity::Error | LogSeverity::InternalError => error!("{message}"),
        }
        self.logs.push(LogEntry::new(severity, message));
    }

    fn information(&mut self, message: impl fmt::Display) {
        self.log(LogSeverity::Information, message);
    }

    fn warning(&mut self, message: impl fmt::Display) {
        self.log(LogSeverity::Warning, message);
    }

    fn unexpected(&self, expected: impl fmt::Display) -> ParseError {
        ParseError::Syntax(format!(
            "Expected {expected}, actual {}.",
            self.tokenizer.kind()
        ))
    }

    // Token primitives

    fn peek(&self) -> TokenKind {
        self.tokenizer.kind()
    }

    fn at(&self, keyword: Keyword) -> bool {
        self.peek().is_keyword(keyword)
    }

    fn accept(&mut self, kind: TokenKind) -> ParseResult<Option<Value<'a>>> {
        if self.peek() != kind {
            return Ok(None);
        }
        let value = self.tokenizer.value();
        self.tokenizer.advance()?;
        self.report_progress(false);
        Ok(Some(value))
    }

    fn accept_keyword(&mut self, keyword: Keyword) -> ParseResult<bool> {
        Ok(self.accept(kw(keyword))?.is_some())
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Value<'a>> {
        match self.accept(kind)? {
            Some(value) => Ok(value),
            None => Err(self.unexpected(kind)),
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<()> {
        self.expect(kw(keyword)).map(|_| ())
    }

    fn read_integer(&mut self) -> ParseResult<i32> {
        match self.expect(TokenKind::Integer)? {
            Value::Integer(value) => Ok(value),
            value => Err(ParseError::Syntax(format!("Expected integer, actual {value:?}."))),
        }
    }

    /// Reads a decimal, or an integer promoted to one.
    fn read_real(&mut self) -> ParseResult<Decimal> {
        if let Some(value) = self.accept(TokenKind::Decimal)? {
            return match value {
                Value::Real(value) => Ok(value),
                value => Err(ParseError::Syntax(format!("Expected decimal, actual {value:?}."))),
            };
        }
        Ok(Decimal::from(self.read_integer()?))
    }

    fn read_boolean(&mut self) -> ParseResult<bool> {
        match self.expect(TokenKind::Boolean)? {
            Value::Boolean(value) => Ok(value),
            value => Err(ParseError::Syntax(format!("Expected boolean, actual {value:?}."))),
        }
    }

    fn read_text_token(&mut self, kind: TokenKind) -> ParseResult<&'a str> {
        match self.expect(kind)? {
            Value::Text(text) => Ok(text),
            value => Err(ParseError::Syntax(format!("Expected {kind}, actual {value:?}."))),
        }
    }

    fn read_string(&mut self) -> ParseResult<String> {
        self.read_text_token(TokenKind::String).map(str::to_string)
    }

    fn read_identifier(&mut self) -> ParseResult<&'a str> {
        self.read_text_token(TokenKind::Identifier)
    }

    /// A bare identifier, or a quoted string.
    fn read_text(&mut self) -> ParseResult<String> {
        if self.peek() == TokenKind::Identifier {
            Ok(self.read_identifier()?.to_string())
        } else {
            self.read_string()
        }
    }

    fn read_optional_text(&mut self) -> ParseResult<Option<String>> {
        match self.peek() {
            TokenKind::Identifier | TokenKind::String => self.read_text().map(Some),
            _ => Ok(None),
        }
    }

    /// `x, y` without parentheses.
    fn read_point_coords(&mut self) -> ParseResult<Point> {
        let x = self.read_real()?;
        self.expect(TokenKind::Comma)?;
        let y = self.read_real()?;
        Ok(Point::new(x, y))
    }

    fn read_point(&mut self) -> ParseResult<Point> {
        self.expect(TokenKind::ParenL)?;
        let point = self.read_point_coords()?;
        self.expect(TokenKind::ParenR)?;
        Ok(point)
    }

    fn read_node_part(&mut self) -> ParseResult<String> {
        if self.peek() == TokenKind::Integer {
            Ok(self.read_integer()?.to_string())
        } else {
            Ok(self.read_identifier()?.to_string())
        }
    }

    /// `component/pin` pairs separated by commas.
    fn read_nodes(&mut self) -> ParseResult<Vec<NetNode>> {
        let mut nodes = Vec::new();
        loop {
            let component = self.read_node_part()?;
            self.expect(TokenKind::Slash)?;
            let pin = self.read_node_part()?;
            nodes.push(NetNode::new(component, pin));
            if self.accept(TokenKind::Comma)?.is_none() {
                return Ok(nodes);
            }
        }
    }

    /// `Marker : count`
    fn read_count(&mut self, marker: Keyword) -> ParseResult<i32> {
        self.expect_keyword(marker)?;
        self.expect(TokenKind::Colon)?;
        self.read_integer()
    }

    /// Reads a counted collection into `items`.
    ///
    /// With an `end` marker, items are read until the marker and the count is
    /// only checked. Without one, exactly `count` items are read. Items the
    /// reader could not store still count as read.
    fn read_collection<T>(
        &mut self,
        start: Keyword,
        end: Option<Keyword>,
        items: &mut Vec<T>,
        mut read_item: impl FnMut(&mut Self) -> ParseResult<Option<T>>,
    ) -> ParseResult<()> {
        let count = self.read_count(start)?;
        match end {
            Some(end) => {
                let mut read = 0;
                while !self.at(end) {
                    items.extend(read_item(self)?);
                    read += 1;
                }
                self.expect_keyword(end)?;
                if read != count {
                    self.information(format_args!(
                        "Collection size mis-match, expected {count}, actual {read}"
                    ));
                }
            }
            None => {
                for _ in 0..count {
                    items.extend(read_item(self)?);
                }
            }
        }
        Ok(())
    }

    /// Skips tokens until one of `anchors`, returning whether one was found.
    fn skip_to(&mut self, warn: bool, anchors: &[TokenKind]) -> ParseResult<bool> {
        let start = self.tokenizer.state();
        while !self.tokenizer.is_eof() && !anchors.contains(&self.peek()) {
            self.tokenizer.advance()?;
        }
        let end = self.tokenizer.state();
        if warn && end.position() != start.position() {
            self.warning(format_args!(
                "Ignored from {}:{} to {}:{}",
                start.line(),
                start.column(),
                end.line(),
                end.column()
            ));
        }
        Ok(!self.tokenizer.is_eof())
    }

    /// Like [Reader::skip_to], but running out of input is a syntax error.
    fn skip_until(&mut self, warn: bool, anchors: &[TokenKind]) -> ParseResult<()> {
        if self.skip_to(warn, anchors)? {
            return Ok(());
        }
        let expected: Vec<String> = anchors.iter().map(ToString::to_string).collect();
        Err(ParseError::Syntax(format!("Expected {}", expected.join(","))))
    }

    // Property lists

    /// Walks a `(Name value) (x, y) ...` list.
    ///
    /// `on_property` reads the value of a named property and returns the
    /// canonical name when the property is single-valued, so repeats can be
    /// reported. `on_point` receives bare coordinates.
    fn read_properties(
        &mut self,
        mut on_property: impl FnMut(&mut Self, &'a str) -> ParseResult<Option<&'static str>>,
        mut on_point: impl FnMut(&mut Self, Point),
    ) -> ParseResult<()> {
        let mut seen = HashSet::new();
        while self.accept(TokenKind::ParenL)?.is_some() {
            let mut name = "";
            let mut duplicate = false;
            let mut start = self.tokenizer.state();
            if matches!(self.peek(), TokenKind::Decimal | TokenKind::Integer) {
                let point = self.read_point_coords()?;
                on_point(self, point);
            } else {
                name = self.read_identifier()?;
                start = self.tokenizer.state();
                if let Some(key) = on_property(self, name)? {
                    duplicate = !seen.insert(key);
                }
            }
            let has_read_data = self.tokenizer.state().position() != start.position();

            if has_read_data && duplicate {
                self.information(format_args!("Duplicate value for {name}"));
            }
            if self.peek() == TokenKind::ParenL {
                self.information("Missing closing parenthesis");
                continue;
            }
            if has_read_data && self.peek() != TokenKind::ParenR {
                self.warning("Excess or poorly formatted property value");
                self.tokenizer.skip_until(')');
            }
            self.skip_until(true, &[TokenKind::ParenR])?;
            self.expect(TokenKind::ParenR)?;
        }
        Ok(())
    }

    /// Reads the value of property `name` into `target` through its field
    /// table.
    fn read_property<T: Fields>(
        &mut self,
        target: &mut T,
        name: &str,
    ) -> ParseResult<Option<&'static str>> {
        let table = T::fields();
        let Some(field) = table.lookup(name) else {
            self.warning(format_args!("{} missing property: {name}", table.type_name()));
            return Ok(None);
        };
        match &field.binding {
            Binding::Real(set) => set(target, self.read_real()?),
            Binding::Integer(set) => set(target, self.read_integer()?),
            Binding::Boolean(set) => set(target, self.read_boolean()?),
            Binding::Text(set) => set(target, self.read_text()?),
            Binding::Point(set) => set(target, self.read_point_coords()?),
            Binding::TextPair(set) => {
                let first = self.read_string()?;
                self.accept(TokenKind::Comma)?;
                let second = self.read_string()?;
                set(target, (first, second));
            }
            Binding::IndexedText(set) => {
                let number = self.read_integer()?;
                self.accept(TokenKind::Comma)?;
                let text = self.read_string()?;
                set(target, (number, text));
            }
            Binding::Enumeration(resolve) => {
                let (resolved, value) = if self.peek() == TokenKind::Integer {
                    let number = self.read_integer()?;
                    (resolve(target, EnumValue::Number(number)), number.to_string())
                } else {
                    let text = self.read_text()?;
                    let resolved = resolve(target, EnumValue::Name(&text));
                    (resolved, text)
                };
                if !resolved {
                    self.warning(format_args!("Unsupported {name} value: {value}"));
                }
            }
            Binding::Points(get) => {
                let point = self.read_point_coords()?;
                get(target).push(point);
            }
            Binding::Nodes(get) => {
                let nodes = self.read_nodes()?;
                get(target).extend(nodes);
            }
        }
        if field.binding.is_sequence() {
            Ok(None)
        } else {
            Ok(Some(field.name()))
        }
    }

    fn read_properties_into<T: Fields>(&mut self, target: &mut T) -> ParseResult<()> {
        let mut points = Vec::new();
        self.read_properties(
            |reader, name| reader.read_property(target, name),
            |_, point| points.push(point),
        )?;
        self.place_points(target, points);
        Ok(())
    }

    /// A single bare point is the origin. Several are a point list.
    fn place_points<T: Fields>(&mut self, target: &mut T, points: Vec<Point>) {
        if points.is_empty() {
            return;
        }
        let table = T::fields();
        if points.len() == 1 {
            if let Some(set) = table.origin() {
                set(target, points[0]);
                return;
            }
        }
        match table.points() {
            Some(get) => get(target).extend(points),
            None => self.warning(format_args!(
                "{} missing property: Origin or Points[{}]",
                table.type_name(),
                points.len()
            )),
        }
    }

    fn ignore_properties(&mut self) -> ParseResult<()> {
        self.read_properties(
            |reader, name| {
                reader.warning(format_args!("Ignored property: {name}"));
                Ok(None)
            },
            |reader, _| reader.warning("Ignored coordinates"),
        )
    }

    /// `Keyword (properties...)`
    fn read_item<T: Fields + Default>(&mut self, keyword: Keyword) -> ParseResult<T> {
        self.expect_keyword(keyword)?;
        let mut item = T::default();
        self.read_properties_into(&mut item)?;
        Ok(item)
    }

    /// Logs and skips an unknown header entry of a library item.
    fn skip_header_property(&mut self, type_name: &str, until: Keyword) -> ParseResult<()> {
        let name = self.read_identifier()?;
        self.warning(format_args!("{type_name} ignored property: {name}"));
        self.skip_until(true, &[kw(until)])
    }

    // Document

    fn read_document(&mut self, document: &mut BxlDocument) -> ParseResult<()> {
        while !self.tokenizer.is_eof() {
            let TokenKind::Keyword(keyword) = self.peek() else {
                self.skip_to(true, ANCHORS)?;
                continue;
            };
            match keyword {
                Keyword::LayerData => self.read_collection(
                    Keyword::LayerData,
                    None,
                    &mut document.layer_data,
                    |reader| reader.read_layer().map(Some),
                )?,
                Keyword::TextStyles => self.read_collection(
                    Keyword::TextStyles,
                    None,
                    &mut document.text_styles,
                    |reader| reader.read_text_style().map(Some),
                )?,
                Keyword::PadStacks => self.read_collection(
                    Keyword::PadStacks,
                    None,
                    &mut document.pad_stacks,
                    |reader| reader.read_pad_stack().map(Some),
                )?,
                Keyword::Patterns => self.read_collection(
                    Keyword::Patterns,
                    None,
                    &mut document.footprints,
                    |reader| reader.read_pattern().map(Some),
                )?,
                Keyword::Symbols => self.read_collection(
                    Keyword::Symbols,
                    None,
                    &mut document.symbols,
                    |reader| reader.read_symbol().map(Some),
                )?,
                Keyword::Components => self.read_collection(
                    Keyword::Components,
                    None,
                    &mut document.components,
                    |reader| reader.read_component().map(Some),
                )?,
                Keyword::WorkSpaceSize => {
                    self.expect_keyword(Keyword::WorkSpaceSize)?;
                    self.read_properties_into(&mut document.work_space_size)?;
                }
                Keyword::ComponentInstances => self.read_collection(
                    Keyword::ComponentInstances,
                    None,
                    &mut document.component_instances,
                    |reader| reader.read_component_instance().map(Some),
                )?,
                Keyword::ViaInstances => self.read_collection(
                    Keyword::ViaInstances,
                    None,
                    &mut document.via_instances,
                    |reader| reader.read_item::<ViaInstance>(Keyword::Via).map(Some),
                )?,
                Keyword::Nets => self.read_collection(
                    Keyword::Nets,
                    None,
                    &mut document.nets,
                    |reader| reader.read_net().map(Some),
                )?,
                Keyword::SchematicComponentInstances => self.read_collection(
                    Keyword::SchematicComponentInstances,
                    None,
                    &mut document.schematic_component_instances,
                    |reader| reader.read_component_instance().map(Some),
                )?,
                Keyword::SchematicNets => self.read_collection(
                    Keyword::SchematicNets,
                    None,
                    &mut document.schematic_nets,
                    |reader| reader.read_net().map(Some),
                )?,
                Keyword::SchematicData => {
                    self.read_schematic_data(&mut document.schematic_data)?
                }
                Keyword::Sheets => self.read_collection(
                    Keyword::Sheets,
                    None,
                    &mut document.schematic_sheets,
                    |reader| reader.read_sheet().map(Some),
                )?,
                Keyword::Layers => self.read_collection(
                    Keyword::Layers,
                    None,
                    &mut document.layers,
                    |reader| reader.read_layer_number().map(Some),
                )?,
                Keyword::TextStyle => document.text_styles.push(self.read_text_style()?),
                Keyword::PadStack => document.pad_stacks.push(self.read_pad_stack()?),
                Keyword::Pattern => document.footprints.push(self.read_pattern()?),
                Keyword::Symbol => document.symbols.push(self.read_symbol()?),
                Keyword::Component => document.components.push(self.read_component()?),
                Keyword::EndOfFile => return Ok(()),
                Keyword::ThreeDModels
                | Keyword::SuperComponents
                | Keyword::AttachedFiles
                | Keyword::LayerTechnicalData => {
                    let count = self.read_count(keyword)?;
                    if count > 0 {
                        self.warning(format_args!(
                            "Ignored unsupported {keyword} with {count} items"
                        ));
                    }
                    self.skip_to(false, ANCHORS)?;
                }
                _ => {
                    self.skip_to(true, ANCHORS)?;
                }
            }
        }
        Ok(())
    }

    // Library

    fn read_layer(&mut self) -> ParseResult<Layer> {
        let mut layer = Layer {
            id: self.read_count(Keyword::Layer)?,
            ..Default::default()
        };
        self.expect_keyword(Keyword::Name)?;
        layer.name = self.read_identifier()?.to_string();
        if self.accept_keyword(Keyword::LayerType)? {
            if let Some(name) = self.read_optional_text()? {
                match LayerType::from_name(&name) {
                    Some(layer_type) => layer.layer_type = layer_type,
                    None => self.warning(format_args!("Unsupported LayerType value: {name}")),
                }
            }
        }
        if self.accept_keyword(Keyword::BoardLayerType)? {
            layer.board_layer_type = self.read_optional_text()?;
        }
        if self.accept_keyword(Keyword::LayerOrder)? {
            layer.layer_order = self.read_integer()?;
        }
        Ok(layer)
    }

    fn read_text_style(&mut self) -> ParseResult<TextStyle> {
        self.expect_keyword(Keyword::TextStyle)?;
        let mut style = TextStyle::new(self.read_string()?);
        self.read_properties_into(&mut style)?;
        Ok(style)
    }

    fn read_pad_stack(&mut self) -> ParseResult<PadStack> {
        self.expect_keyword(Keyword::PadStack)?;
        let mut pad_stack = PadStack::new(self.read_string()?);
        self.read_properties_into(&mut pad_stack)?;
        self.read_collection(Keyword::Shapes, None, &mut pad_stack.shapes, |reader| {
            reader.read_pad_shape().map(Some)
        })?;
        self.expect_keyword(Keyword::EndPadStack)?;
        Ok(pad_stack)
    }

    fn read_pad_shape(&mut self) -> ParseResult<PadShape> {
        self.expect_keyword(Keyword::PadShape)?;
        let mut shape = PadShape::default();
        let kind = self.read_string()?;
        match PadShapeKind::from_name(&kind) {
            Some(kind) => shape.kind = kind,
            None => self.warning(format_args!("Unsupported Kind value: {kind}")),
        }
        self.read_properties_into(&mut shape)?;
        Ok(shape)
    }

    fn read_lib_pin(&mut self) -> ParseResult<LibPin> {
        let mut pin: LibPin = self.read_item(Keyword::Pin)?;
        self.expect_keyword(Keyword::PinDes)?;
        pin.designator.text = self.read_string()?;
        self.read_properties_into(&mut pin.designator)?;
        self.expect_keyword(Keyword::PinName)?;
        pin.name.text = self.read_string()?;
        self.read_properties_into(&mut pin.name)?;
        Ok(pin)
    }

    fn read_lib_item(&mut self) -> ParseResult<Option<LibItem>> {
        let item = match self.peek() {
            TokenKind::Keyword(Keyword::Pin) => LibItem::Pin(self.read_lib_pin()?),
            TokenKind::Keyword(Keyword::Pad) => LibItem::Pad(self.read_item(Keyword::Pad)?),
            TokenKind::Keyword(Keyword::Deletedpad) => {
                LibItem::DeletedPad(self.read_item(Keyword::Deletedpad)?)
            }
            TokenKind::Keyword(Keyword::Poly) => LibItem::Poly(self.read_item(Keyword::Poly)?),
            TokenKind::Keyword(Keyword::Polykeepout) => {
                LibItem::PolyKeepout(self.read_item(Keyword::Polykeepout)?)
            }
            TokenKind::Keyword(Keyword::Line) => LibItem::Line(self.read_item(Keyword::Line)?),
            TokenKind::Keyword(Keyword::Arc) => LibItem::Arc(self.read_item(Keyword::Arc)?),
            TokenKind::Keyword(Keyword::Text) => LibItem::Text(self.read_item(Keyword::Text)?),
            TokenKind::Keyword(Keyword::Attribute) => {
                LibItem::Attribute(self.read_item(Keyword::Attribute)?)
            }
            TokenKind::Keyword(Keyword::Wizard) => {
                LibItem::Wizard(self.read_item(Keyword::Wizard)?)
            }
            TokenKind::Keyword(Keyword::Templatedata) => {
                LibItem::TemplateData(self.read_item(Keyword::Templatedata)?)
            }
            _ => {
                let name = self.read_identifier()?;
                self.warning(format_args!("Unsupported library item: {name}"));
                self.ignore_properties()?;
                return Ok(None);
            }
        };
        Ok(Some(item))
    }

    fn read_pattern(&mut self) -> ParseResult<Pattern> {
        self.expect_keyword(Keyword::Pattern)?;
        let mut pattern = Pattern::new(self.read_string()?);
        while !self.at(Keyword::Data) {
            if self.accept_keyword(Keyword::OriginPoint)? {
                pattern.origin_point = self.read_point()?;
            } else if self.accept_keyword(Keyword::PickPoint)? {
                pattern.pick_point = self.read_point()?;
            } else if self.accept_keyword(Keyword::GluePoint)? {
                pattern.glue_point = self.read_point()?;
            } else if self.accept_keyword(Keyword::PinsRenamed)? {
                pattern.pins_renamed = self.read_boolean()?;
            } else {
                self.skip_header_property("Pattern", Keyword::Data)?;
            }
        }
        self.read_collection(
            Keyword::Data,
            Some(Keyword::EndData),
            &mut pattern.data,
            Self::read_lib_item,
        )?;
        self.expect_keyword(Keyword::EndPattern)?;
        Ok(pattern)
    }

    fn read_symbol(&mut self) -> ParseResult<Symbol> {
        self.expect_keyword(Keyword::Symbol)?;
        let mut symbol = Symbol::new(self.read_string()?);
        while !self.at(Keyword::Data) {
            if self.accept_keyword(Keyword::OriginPoint)? {
                symbol.origin_point = self.read_point()?;
            } else if self.accept_keyword(Keyword::OriginalName)? {
                symbol.original_name = Some(self.read_string()?);
            } else if self.accept_keyword(Keyword::Edited)? {
                symbol.edited = self.read_boolean()?;
            } else {
                self.skip_header_property("Symbol", Keyword::Data)?;
            }
        }
        self.read_collection(
            Keyword::Data,
            Some(Keyword::EndData),
            &mut symbol.data,
            Self::read_lib_item,
        )?;
        self.expect_keyword(Keyword::EndSymbol)?;
        Ok(symbol)
    }

    fn read_component(&mut self) -> ParseResult<Component> {
        self.expect_keyword(Keyword::Component)?;
        let mut component = Component::new(self.read_string()?);
        while !self.at(Keyword::CompPins) {
            let TokenKind::Keyword(keyword) = self.peek() else {
                self.skip_header_property("Component", Keyword::CompPins)?;
                continue;
            };
            match keyword {
                Keyword::PatternName => {
                    self.accept_keyword(keyword)?;
                    component.pattern_name = Some(self.read_string()?);
                }
                Keyword::AlternatePattern => {
                    self.accept_keyword(keyword)?;
                    component.alternate_patterns.push(self.read_string()?);
                }
                Keyword::OriginalName => {
                    self.accept_keyword(keyword)?;
                    component.original_name = Some(self.read_string()?);
                }
                Keyword::SourceLibrary => {
                    self.accept_keyword(keyword)?;
                    component.source_library = Some(self.read_string()?);
                }
                Keyword::RefDesPrefix => {
                    self.accept_keyword(keyword)?;
                    component.ref_des_prefix = Some(self.read_string()?);
                }
                // Derived from the pin list.
                Keyword::NumberofPins | Keyword::NumParts | Keyword::PatternPins => {
                    self.accept_keyword(keyword)?;
                    self.read_integer()?;
                }
                Keyword::Composition => {
                    self.accept_keyword(keyword)?;
                    component.composition = Some(self.read_identifier()?.to_string());
                }
                Keyword::AltIeee => {
                    self.accept_keyword(keyword)?;
                    component.alt_ieee = self.read_boolean()?;
                }
                Keyword::AltDeMorgan => {
                    self.accept_keyword(keyword)?;
                    component.alt_de_morgan = self.read_boolean()?;
                }
                Keyword::RevisionLevel => {
                    self.accept_keyword(keyword)?;
                    component.revision_level = self.read_optional_text()?;
                }
                Keyword::RevisionNote => {
                    self.accept_keyword(keyword)?;
                    component.revision_note = self.read_optional_text()?;
                }
                _ => self.skip_header_property("Component", Keyword::CompPins)?,
            }
        }

        self.read_collection(
            Keyword::CompPins,
            Some(Keyword::EndCompPins),
            &mut component.pins,
            |reader| reader.read_comp_pin().map(Some),
        )?;
        self.read_collection(
            Keyword::CompData,
            Some(Keyword::EndCompData),
            &mut component.data,
            Self::read_comp_data_item,
        )?;
        while self.at(Keyword::RelatedFiles) {
            self.read_count(Keyword::RelatedFiles)?;
            let mut related_file = RelatedFile::default();
            self.read_properties_into(&mut related_file)?;
            component.related_files.push(related_file);
        }
        self.read_collection(
            Keyword::AttachedSymbols,
            Some(Keyword::EndAttachedSymbols),
            &mut component.attached_symbols,
            |reader| {
                reader
                    .read_item::<AttachedSymbol>(Keyword::AttachedSymbol)
                    .map(Some)
            },
        )?;
        self.read_collection(
            Keyword::PinMap,
            Some(Keyword::EndPinMap),
            &mut component.pin_map,
            |reader| reader.read_pad_num().map(Some),
        )?;
        self.expect_keyword(Keyword::EndComponent)?;
        Ok(component)
    }

    fn read_comp_pin(&mut self) -> ParseResult<CompPin> {
        self.expect_keyword(Keyword::CompPin)?;
        let descriptor = self.read_node_part()?;
        let mut pin = CompPin::new(descriptor, self.read_string()?);
        self.read_properties_into(&mut pin)?;
        Ok(pin)
    }

    fn read_comp_data_item(&mut self) -> ParseResult<Option<LibItem>> {
        match self.peek() {
            TokenKind::Keyword(Keyword::Attribute) => {
                Ok(Some(LibItem::Attribute(self.read_item(Keyword::Attribute)?)))
            }
            TokenKind::Keyword(Keyword::Wizard) => {
                Ok(Some(LibItem::Wizard(self.read_item(Keyword::Wizard)?)))
            }
            _ => Err(self.unexpected("Attribute or Wizard")),
        }
    }

    fn read_pad_num(&mut self) -> ParseResult<PadNum> {
        self.expect_keyword(Keyword::PadNum)?;
        let mut pad_num = PadNum::new(self.read_integer()?);
        self.read_properties_into(&mut pad_num)?;
        Ok(pad_num)
    }

    // Instances

    fn read_component_instance(&mut self) -> ParseResult<ComponentInstance> {
        self.expect_keyword(Keyword::Component)?;
        let mut instance = ComponentInstance::new(self.read_string()?);
        self.read_properties_into(&mut instance)?;
        while self.at(Keyword::Attribute) {
            let attribute: InstAttribute = self.read_item(Keyword::Attribute)?;
            instance.attributes.push(attribute);
        }
        Ok(instance)
    }

    fn read_net(&mut self) -> ParseResult<NetInstance> {
        self.expect_keyword(Keyword::Net)?;
        let mut net = NetInstance::new(self.read_string()?);
        self.read_properties_into(&mut net)?;
        Ok(net)
    }

    fn read_schematic_data(&mut self, data: &mut SchematicData) -> ParseResult<()> {
        self.expect_keyword(Keyword::SchematicData)?;
        self.expect(TokenKind::Colon)?;
        self.accept(TokenKind::Integer)?;
        self.expect_keyword(Keyword::Units)?;
        data.units = self.read_string()?;
        self.expect_keyword(Keyword::Workspace)?;
        self.read_properties_into(&mut data.workspace)?;
        while self.accept_keyword(Keyword::Attribute)? {
            let name = self.read_string()?;
            self.expect(TokenKind::Comma)?;
            let value = self.read_string()?;
            data.attributes.push((name, value));
        }
        // `Sheet (Name 1, "Main")`, the leading identifier is not checked.
        while self.accept_keyword(Keyword::Sheet)? {
            self.expect(TokenKind::ParenL)?;
            self.read_identifier()?;
            let number = self.read_integer()?;
            self.expect(TokenKind::Comma)?;
            let name = self.read_string()?;
            self.expect(TokenKind::ParenR)?;
            data.sheets.push((number, name));
        }
        Ok(())
    }

    fn read_inst_item(&mut self) -> ParseResult<Option<InstItem>> {
        let item = match self.peek() {
            TokenKind::Keyword(Keyword::Wire) => InstItem::Wire(self.read_item(Keyword::Wire)?),
            TokenKind::Keyword(Keyword::Port) => InstItem::Port(self.read_item(Keyword::Port)?),
            TokenKind::Keyword(Keyword::Junction) => {
                InstItem::Junction(self.read_item(Keyword::Junction)?)
            }
            TokenKind::Keyword(Keyword::Line) => InstItem::Line(self.read_item(Keyword::Line)?),
            TokenKind::Keyword(Keyword::Arc) => InstItem::Arc(self.read_item(Keyword::Arc)?),
            TokenKind::Keyword(Keyword::Poly) => InstItem::Poly(self.read_item(Keyword::Poly)?),
            TokenKind::Keyword(Keyword::Copperpour) => {
                InstItem::CopperPour(self.read_item(Keyword::Copperpour)?)
            }
            TokenKind::Keyword(Keyword::Text) => InstItem::Text(self.read_item(Keyword::Text)?),
            TokenKind::Keyword(Keyword::Symbol) => {
                InstItem::Symbol(self.read_item(Keyword::Symbol)?)
            }
            TokenKind::Keyword(Keyword::Attribute) => {
                InstItem::Attribute(self.read_item(Keyword::Attribute)?)
            }
            _ => {
                let name = self.read_identifier()?;
                self.warning(format_args!("Unsupported instance item: {name}"));
                self.ignore_properties()?;
                return Ok(None);
            }
        };
        Ok(Some(item))
    }

    fn read_sheet(&mut self) -> ParseResult<Sheet> {
        self.read_count(Keyword::Sheet)?;
        let mut sheet = Sheet::default();
        while !self.at(Keyword::Data) {
            if self.accept_keyword(Keyword::Name)? {
                sheet.name = self.read_string()?;
            } else if self.accept_keyword(Keyword::Number)? {
                sheet.number = self.read_integer()?;
            } else if self.accept_keyword(Keyword::ShowBorder)? {
                sheet.show_border = if self.peek() == TokenKind::Boolean {
                    self.read_boolean()?
                } else {
                    self.read_string()?.eq_ignore_ascii_case("true")
                };
            } else if self.accept_keyword(Keyword::BorderName)? {
                sheet.border_name = self.read_string()?;
            } else if self.accept_keyword(Keyword::ScaleFactor)? {
                sheet.scale_factor = self.read_real()?;
            } else if self.accept_keyword(Keyword::OffSet)? {
                sheet.offset = self.read_point_coords()?;
            } else {
                self.skip_header_property("Sheet", Keyword::Data)?;
            }
        }
        self.read_collection(Keyword::Data, None, &mut sheet.data, Self::read_inst_item)?;
        self.accept_keyword(Keyword::EndData)?;
        Ok(sheet)
    }

    fn read_layer_number(&mut self) -> ParseResult<LayerNumber> {
        let mut layer = LayerNumber {
            id: self.read_count(Keyword::LayerNumber)?,
            ..Default::default()
        };
        self.read_properties_into(&mut layer)?;
        while INST_ITEMS.contains(&self.peek()) {
            layer.data.extend(self.read_inst_item()?);
        }
        Ok(layer)
    }
}

/// Represents a fully parsed BXL file together with its diagnostics.
#[derive(Debug, Clone)]
pub struct ParsedBxlFile {
    pub document: BxlDocument,
    pub logs: Logs,
}

impl ParsedBxlFile {
    /// Parses decoded BXL text. `reference` names the input in log messages.
    pub fn from_text(
        text: &str,
        reference: &str,
        progress: Option<&mut dyn FnMut(u8)>,
    ) -> Self {
        let mut parser = Parser::new(text, reference);
        let document = parser.execute(progress);
        Self {
            document,
            logs: parser.into_logs(),
        }
    }

    pub fn from_decoded(decoded: &DecodedBxlFile, reference: &str) -> Self {
        Self::from_text(&decoded.text, reference, None)
    }

    /// Reads, decodes and parses a file.
    ///
    /// Only failing to read the file is an error. Problems in its contents
    /// are reported through [ParsedBxlFile::logs].
    pub fn from_filename(
        path: impl AsRef<Path>,
        file_type: FileType,
        progress: Option<&mut dyn FnMut(u8)>,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        let decoded = DecodedBxlFile::from_filename(path, file_type)?;
        Ok(Self::from_text(
            &decoded.text,
            &path.to_string_lossy(),
            progress,
        ))
    }

    pub fn has_errors(&self) -> bool {
        self.logs.has_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::PinType;

    use proptest::prelude::*;

    fn parse(text: &str) -> (BxlDocument, Logs) {
        let mut parser = Parser::new(text, "/tmp/parts/test.bxl");
        let document = parser.execute(None);
        (document, parser.into_logs())
    }

    fn severities(logs: &Logs) -> Vec<LogSeverity> {
        logs.iter().map(|entry| entry.severity).collect()
    }

    const PAD_STACK: &str = "\
PadStacks : 1
PadStack \"RECT20X30\" (HoleDiam 0) (Surface True) (Plated False) (NoPaste False)
\tShapes : 1
\tPadShape \"Rectangle\" (Width 20) (Height 30) (PadType 0) (Layer TOP)
EndPadStack
";

    #[test]
    fn empty_input_gives_empty_document() {
        let (document, logs) = parse("");
        assert_eq!(document, BxlDocument::default());
        assert!(logs.is_empty());
    }

    #[test]
    fn reads_pad_stack_with_shapes() {
        let (document, logs) = parse(PAD_STACK);
        assert!(logs.is_empty(), "{logs:?}");
        let stack = document.pad_stack("rect20x30").expect("pad stack");
        assert!(stack.surface);
        assert!(!stack.plated);
        assert_eq!(stack.shapes.len(), 1);
        assert_eq!(stack.shapes[0].kind, PadShapeKind::Rectangle);
        assert_eq!(stack.shapes[0].width, Decimal::from(20));
        assert_eq!(stack.shapes[0].layer, "TOP");
    }

    #[test]
    fn reads_layers_positionally() {
        let text = "LayerData : 2\nLayer : 1 Name TOP LayerType Signal\nLayer : 2 Name DRILL LayerType Bogus\n";
        let (document, logs) = parse(text);
        assert_eq!(document.layer_data.len(), 2);
        assert_eq!(document.layer_data[0].layer_type, LayerType::Signal);
        assert_eq!(document.layer_data[1].name, "DRILL");
        assert_eq!(logs.warnings().count(), 1);
        assert!(logs.warnings().all(|m| m.ends_with("Unsupported LayerType value: Bogus")));
    }

    #[test]
    fn messages_carry_file_name_and_position() {
        let (_, logs) = parse("Bogus\nTextStyle \"H80s8\" (FontWidth 8)\n");
        let message = logs.warnings().next().expect("warning");
        assert!(message.starts_with("test.bxl:2:1 Ignored from 1:1 to 2:1"), "{message}");
    }

    #[test]
    fn duplicate_property_is_information() {
        let (document, logs) = parse("TextStyle \"H80s8\" (FontWidth 8) (FontWidth 9)\n");
        assert_eq!(severities(&logs), vec![LogSeverity::Information]);
        assert_eq!(document.text_styles[0].font_width, Decimal::from(9));
    }

    #[test]
    fn alias_and_canonical_name_are_duplicates() {
        let text = "Pattern \"P\"\n\tData : 1\n\t\tText (Layer TOP) (Rotate 90) (rotated 45) (Text \"x\")\n\tEndData\nEndPattern\n";
        let (document, logs) = parse(text);
        assert_eq!(severities(&logs), vec![LogSeverity::Information]);
        assert!(logs.entries()[0].message.ends_with("Duplicate value for rotated"));
        let LibItem::Text(text) = &document.footprints[0].data[0] else {
            panic!("expected text, got {:?}", document.footprints[0].data[0]);
        };
        assert_eq!(text.rotate, Decimal::from(45));
    }

    #[test]
    fn missing_closing_parenthesis_is_recovered() {
        let (document, logs) = parse("TextStyle \"H80s8\" (FontWidth 8 (FontHeight 80)\n");
        assert_eq!(severities(&logs), vec![LogSeverity::Information]);
        assert_eq!(document.text_styles[0].font_width, Decimal::from(8));
        assert_eq!(document.text_styles[0].font_height, Decimal::from(80));
    }

    #[test]
    fn excess_property_content_is_skipped() {
        let (document, logs) = parse("TextStyle \"H80s8\" (FontWidth 8 9 10) (FontHeight 80)\n");
        assert!(!logs.has_errors());
        assert!(
            logs.warnings()
                .any(|m| m.ends_with("Excess or poorly formatted property value"))
        );
        assert_eq!(document.text_styles[0].font_width, Decimal::from(8));
        assert_eq!(document.text_styles[0].font_height, Decimal::from(80));
    }

    #[test]
    fn unknown_property_is_warned_and_skipped() {
        let (document, logs) = parse("TextStyle \"H80s8\" (Colour red) (FontWidth 8)\n");
        assert!(!logs.has_errors());
        assert!(logs.warnings().any(|m| m.ends_with("TextStyle missing property: Colour")));
        assert_eq!(document.text_styles[0].font_width, Decimal::from(8));
    }

    #[test]
    fn bare_points_fill_origin_or_point_list() {
        let text = "\
Pattern \"P\"
\tOriginPoint (0, 0)
\tData : 2
\t\tLine (Layer TOP_SILK) (10, 20) (EndPoint 30, 20) (Width 1)
\t\tPoly (Layer TOP_SILK) (0, 0) (10, 0) (10, 10)
\tEndData
EndPattern
";
        let (document, logs) = parse(text);
        assert!(logs.is_empty(), "{logs:?}");
        let data = &document.footprints[0].data;
        let LibItem::Line(line) = &data[0] else {
            panic!("expected line, got {:?}", data[0]);
        };
        assert_eq!(line.origin, Point::new(Decimal::from(10), Decimal::from(20)));
        let LibItem::Poly(poly) = &data[1] else {
            panic!("expected poly, got {:?}", data[1]);
        };
        assert_eq!(poly.points.len(), 3);
    }

    #[test]
    fn unsupported_library_item_is_counted_but_dropped() {
        let text = "\
Pattern \"P\"
\tData : 2
\t\tHatch (Layer TOP) (Width 1)
\t\tLine (Layer TOP) (Origin 0, 0) (EndPoint 1, 1) (Width 1)
\tEndData
EndPattern
";
        let (document, logs) = parse(text);
        assert_eq!(document.footprints[0].data.len(), 1);
        assert!(logs.warnings().any(|m| m.ends_with("Unsupported library item: Hatch")));
        assert!(logs.warnings().any(|m| m.ends_with("Ignored property: Layer")));
        assert!(!logs.iter().any(|e| e.message.contains("mis-match")));
    }

    #[test]
    fn collection_count_mismatch_is_information() {
        let text = "Pattern \"P\"\n\tData : 3\n\t\tText (Layer TOP) (Text \"x\")\n\tEndData\nEndPattern\n";
        let (document, logs) = parse(text);
        assert_eq!(document.footprints[0].data.len(), 1);
        assert_eq!(severities(&logs), vec![LogSeverity::Information]);
        assert!(logs.entries()[0].message.ends_with("Collection size mis-match, expected 3, actual 1"));
    }

    #[test]
    fn syntax_error_keeps_partial_document() {
        let text = format!("{PAD_STACK}Patterns : 1\nPattern OOPS\n");
        let (document, logs) = parse(&text);
        assert_eq!(document.pad_stacks.len(), 1);
        assert!(document.footprints.is_empty());
        assert_eq!(logs.errors().count(), 1);
        let message = logs.errors().next().expect("error");
        assert!(message.ends_with("Expected string, actual identifier."), "{message}");
    }

    #[test]
    fn tokenizer_failure_is_logged_as_error() {
        let (_, logs) = parse("TextStyle \"H80s8\" (FontWidth @@@)\n");
        assert!(logs.has_errors());
        assert!(logs.errors().any(|m| m.contains("Unrecognized input: @@@")));
    }

    #[test]
    fn unsupported_sections_are_skipped_with_one_warning() {
        let text = "SuperComponents : 3\nSuperComponent \"A\" (Foo 1)\nSuperComponent \"B\"\nEnd of File\n";
        let (document, logs) = parse(text);
        assert_eq!(document, BxlDocument::default());
        assert_eq!(logs.len(), 1);
        assert!(logs.entries()[0].message.ends_with("Ignored unsupported SuperComponents with 3 items"));
    }

    #[test]
    fn unsupported_section_header_alone_warns_once() {
        let (document, logs) = parse("SuperComponents : 3\n");
        assert_eq!(document, BxlDocument::default());
        assert_eq!(severities(&logs), vec![LogSeverity::Warning]);
        assert!(logs.entries()[0].message.ends_with("Ignored unsupported SuperComponents with 3 items"));
    }

    #[test]
    fn schematic_sheet_lines_accept_any_leading_identifier() {
        let text = "\
SchematicData : 1
Units \"mil\"
Workspace (LowerLeft 0, 0) (UpperRight 100, 100)
Sheet (Page 2, \"Power\")
Sheet (Name 3, \"IO\")
";
        let (document, logs) = parse(text);
        assert!(logs.is_empty(), "{logs:?}");
        assert_eq!(
            document.schematic_data.sheets,
            vec![(2, "Power".to_string()), (3, "IO".to_string())]
        );
    }

    #[derive(Debug, Default)]
    struct Caption {
        index: i32,
        text: String,
    }

    crate::fields::field_table!(Caption, || {
        crate::fields::FieldTable::new("Caption").field(
            "Label",
            Binding::indexed_text(|c: &mut Caption, (index, text)| {
                c.index = index;
                c.text = text;
            }),
        )
    });

    #[test]
    fn indexed_text_property_takes_an_optional_comma() {
        for text in ["(Label 4, \"Four\")", "(Label 4 \"Four\")"] {
            let mut reader = Reader::new(text, "caption.bxl".to_string(), None);
            let mut caption = Caption::default();
            reader.tokenizer.reset().expect("tokenize");
            reader.read_properties_into(&mut caption).expect("parse");
            assert_eq!((caption.index, caption.text.as_str()), (4, "Four"), "{text}");
            assert!(reader.logs.is_empty(), "{text}: {:?}", reader.logs);
        }
    }

    #[test]
    fn empty_unsupported_section_is_silent() {
        let (_, logs) = parse("3DModels : 0\nEnd of File\n");
        assert!(logs.is_empty());
    }

    #[test]
    fn enumeration_accepts_names_and_known_numbers() {
        let text = "\
Symbol \"S\"
\tData : 3
\t\tPin (PinNum 1) (Origin 0, 0) (PinType Open Collector)
\t\t\tPinDes \"1\" (Origin 0, 0)
\t\t\tPinName \"A\" (Origin 0, 0)
\t\tPin (PinNum 2) (Origin 0, 0) (PinType 14)
\t\t\tPinDes \"2\" (Origin 0, 0)
\t\t\tPinName \"B\" (Origin 0, 0)
\t\tPin (PinNum 3) (Origin 0, 0) (PinType 99)
\t\t\tPinDes \"3\" (Origin 0, 0)
\t\t\tPinName \"C\" (Origin 0, 0)
\tEndData
EndSymbol
";
        let (document, logs) = parse(text);
        let types: Vec<_> = document.symbols[0]
            .data
            .iter()
            .filter_map(|item| match item {
                LibItem::Pin(pin) => Some(pin.pin_type),
                _ => None,
            })
            .collect();
        assert_eq!(types, vec![PinType::OpenCollector, PinType::Passive, PinType::None]);
        assert_eq!(logs.warnings().count(), 1);
        assert!(logs.warnings().all(|m| m.ends_with("Unsupported PinType value: 99")));
    }

    #[test]
    fn progress_is_monotonic_and_complete() {
        let text = PAD_STACK.repeat(20);
        let mut values = Vec::new();
        let mut record = |value: u8| values.push(value);
        let mut parser = Parser::new(&text, "many.bxl");
        parser.execute(Some(&mut record));
        assert_eq!(values.first(), Some(&0));
        assert_eq!(values.last(), Some(&100));
        assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(values.len() > 2);
    }

    #[test]
    fn empty_input_reports_full_progress() {
        let mut values = Vec::new();
        let mut record = |value: u8| values.push(value);
        Parser::new("", "empty.bxl").execute(Some(&mut record));
        assert_eq!(values, vec![0, 100]);
    }

    #[test]
    fn panic_payloads_are_described() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }

    proptest! {
        #[test]
        fn never_panics_on_arbitrary_text(text in "[ -~\n]{0,200}") {
            let (_, logs) = parse(&text);
            prop_assert!(logs.iter().all(|e| e.severity != LogSeverity::InternalError));
        }

        #[test]
        fn at_most_one_error_per_parse(text in "(PadStack|Pattern|Data|\\(|\\)|\"x\"|1|:| |\n){0,40}") {
            let (_, logs) = parse(&text);
            prop_assert!(logs.errors().count() <= 1);
        }
    }
}
