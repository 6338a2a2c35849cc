// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/document.rs - Parsed BXL document and parser diagnostics.
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
 * # `document` Module
 *
 * The result of a parse: a [BxlDocument] with every entity read from the
 * file, and the [Logs] describing anything that went wrong along the way.
 *
 * A document is always returned, even when the input is malformed. Check
 * [Logs::has_errors] to find out whether parsing stopped early, in which case
 * the document holds everything read up to the failure.
 */

use std::fmt;
use std::slice;

use crate::geometry::Region;
use crate::instance::{ComponentInstance, LayerNumber, NetInstance, SchematicData, Sheet, ViaInstance};
use crate::library::{Component, Layer, PadStack, Pattern, Symbol, TextStyle};

/// Component library contents and, for board exports, the placed design.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BxlDocument {
    /// Layer definitions from `LayerData`.
    pub layer_data: Vec<Layer>,
    pub text_styles: Vec<TextStyle>,
    pub pad_stacks: Vec<PadStack>,
    /// PCB footprints, stored as `Pattern` items in the file.
    pub footprints: Vec<Pattern>,
    pub symbols: Vec<Symbol>,
    pub components: Vec<Component>,
    pub work_space_size: Region,
    pub schematic_data: SchematicData,

    pub component_instances: Vec<ComponentInstance>,
    pub via_instances: Vec<ViaInstance>,
    pub nets: Vec<NetInstance>,
    pub schematic_component_instances: Vec<ComponentInstance>,
    pub schematic_nets: Vec<NetInstance>,
    pub schematic_sheets: Vec<Sheet>,
    /// Geometry grouped by board layer.
    pub layers: Vec<LayerNumber>,
}

impl BxlDocument {
    pub fn text_style(&self, name: &str) -> Option<&TextStyle> {
        self.text_styles
            .iter()
            .find(|style| style.name.eq_ignore_ascii_case(name))
    }

    pub fn pad_stack(&self, name: &str) -> Option<&PadStack> {
        self.pad_stacks
            .iter()
            .find(|stack| stack.name.eq_ignore_ascii_case(name))
    }

    pub fn footprint(&self, name: &str) -> Option<&Pattern> {
        self.footprints
            .iter()
            .find(|pattern| pattern.name.eq_ignore_ascii_case(name))
    }

    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols
            .iter()
            .find(|symbol| symbol.name.eq_ignore_ascii_case(name))
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components
            .iter()
            .find(|component| component.name.eq_ignore_ascii_case(name))
    }
}

/// How serious a log entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogSeverity {
    /// Harmless irregularities, like duplicate properties.
    Information,
    /// Input that was skipped or could not be stored.
    Warning,
    /// Parsing stopped at this point.
    Error,
    /// Parsing stopped because of a defect in this library.
    InternalError,
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogSeverity::Information => "Information",
            LogSeverity::Warning => "Warning",
            LogSeverity::Error => "Error",
            LogSeverity::InternalError => "InternalError",
        };
        f.write_str(name)
    }
}

/// A single parser diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub severity: LogSeverity,
    /// Message prefixed with `file:line:column`.
    pub message: String,
}

impl LogEntry {
    pub fn new(severity: LogSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self.severity,
            LogSeverity::Error | LogSeverity::InternalError
        )
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Ordered diagnostics gathered while parsing one document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Logs {
    entries: Vec<LogEntry>,
}

impl Logs {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Messages of every warning entry.
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.severity == LogSeverity::Warning)
            .map(|entry| entry.message.as_str())
    }

    /// Messages of every error entry, internal errors included.
    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.is_error())
            .map(|entry| entry.message.as_str())
    }

    /// Whether parsing was interrupted, meaning the document may be
    /// incomplete.
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(LogEntry::is_error)
    }
}

impl<'a> IntoIterator for &'a Logs {
    type Item = &'a LogEntry;
    type IntoIter = slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<LogEntry> for Logs {
    fn from_iter<I: IntoIterator<Item = LogEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn severity() -> impl Strategy<Value = LogSeverity> {
        prop_oneof![
            Just(LogSeverity::Information),
            Just(LogSeverity::Warning),
            Just(LogSeverity::Error),
            Just(LogSeverity::InternalError),
        ]
    }

    proptest! {
        #[test]
        fn has_errors_iff_error_or_internal_error(severities in prop::collection::vec(severity(), 0..32)) {
            let logs: Logs = severities
                .iter()
                .map(|&severity| LogEntry::new(severity, "x"))
                .collect();
            let expected = severities
                .iter()
                .any(|s| matches!(s, LogSeverity::Error | LogSeverity::InternalError));
            prop_assert_eq!(logs.has_errors(), expected);
            prop_assert_eq!(logs.errors().count() > 0, expected);
        }
    }

    #[test]
    fn warnings_and_errors_are_filtered_by_severity() {
        let logs: Logs = [
            LogEntry::new(LogSeverity::Information, "info"),
            LogEntry::new(LogSeverity::Warning, "warn"),
            LogEntry::new(LogSeverity::InternalError, "boom"),
        ]
        .into_iter()
        .collect();
        assert_eq!(logs.warnings().collect::<Vec<_>>(), vec!["warn"]);
        assert_eq!(logs.errors().collect::<Vec<_>>(), vec!["boom"]);
        assert_eq!(logs.len(), 3);
    }

    #[test]
    fn lookups_ignore_case() {
        let mut document = BxlDocument::default();
        document.pad_stacks.push(PadStack::new("RECT20X30"));
        document.footprints.push(Pattern::new("SOIC8"));
        assert!(document.pad_stack("rect20x30").is_some());
        assert!(document.footprint("soic8").is_some());
        assert!(document.symbol("soic8").is_none());
    }
}
