// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/tokenizer.rs - Tokenizer for the XLR text grammar.
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
 * # `tokenizer` Module
 *
 * Splits XLR text into tokens with one token of lookahead.
 *
 * Keywords are not reserved. They are only recognized outside parentheses,
 * so `(Name "Layer")` and `(Layer TOP)` never produce keyword tokens. The
 * nesting depth is reset at every newline, which keeps a missing `)` from
 * hiding the keywords on the following lines.
 */

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::TokenizeError;

macro_rules! keywords {
    ($($variant:ident => $lexeme:literal,)*) => {
        /// Structural words of the format, in matching priority order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($variant,)*
        }

        impl Keyword {
            /// Every keyword, in the order they are tried.
            pub const ALL: &'static [Keyword] = &[$(Keyword::$variant,)*];

            /// The spelling of the keyword in the input, ignoring case.
            pub fn lexeme(self) -> &'static str {
                match self {
                    $(Keyword::$variant => $lexeme,)*
                }
            }
        }
    };
}

keywords! {
    LayerData => "LayerData",
    Layer => "Layer",
    Name => "Name",
    LayerType => "LayerType",
    BoardLayerType => "BoardLayerType",
    LayerOrder => "LayerOrder",
    TextStyles => "TextStyles",
    PadStacks => "PadStacks",
    Patterns => "Patterns",
    ThreeDModels => "3DModels",
    Symbols => "Symbols",
    Components => "Components",
    SuperComponents => "SuperComponents",
    AttachedFiles => "AttachedFiles",
    WorkSpaceSize => "WorkSpaceSize",
    ComponentInstances => "ComponentInstances",
    ViaInstances => "ViaInstances",
    Via => "Via",
    Nets => "Nets",
    Net => "Net",
    SchematicComponentInstances => "SchematicComponentInstances",
    SchematicNets => "SchematicNets",
    SchematicData => "SchematicData",
    Units => "Units",
    Sheet => "Sheet",
    Workspace => "Workspace",
    Sheets => "Sheets",
    Number => "Number",
    ShowBorder => "ShowBorder",
    BorderName => "BorderName",
    ScaleFactor => "ScaleFactor",
    OffSet => "OffSet",
    Wire => "Wire",
    Port => "Port",
    Junction => "Junction",
    Copperpour => "Copperpour",
    Layers => "Layers",
    LayerNumber => "LayerNumber",
    LayerTechnicalData => "LayerTechnicalData",
    EndOfFile => "End of File",
    PadStack => "PadStack",
    EndPadStack => "EndPadStack",
    Pattern => "Pattern",
    EndPattern => "EndPattern",
    Symbol => "Symbol",
    EndSymbol => "EndSymbol",
    Component => "Component",
    EndComponent => "EndComponent",
    Data => "Data",
    EndData => "EndData",
    CompPins => "CompPins",
    EndCompPins => "EndCompPins",
    CompData => "CompData",
    EndCompData => "EndCompData",
    AttachedSymbols => "AttachedSymbols",
    EndAttachedSymbols => "EndAttachedSymbols",
    PinMap => "PinMap",
    EndPinMap => "EndPinMap",
    TextStyle => "TextStyle",
    OriginPoint => "OriginPoint",
    PickPoint => "PickPoint",
    GluePoint => "GluePoint",
    PinsRenamed => "PinsRenamed",
    PatternName => "PatternName",
    AlternatePattern => "AlternatePattern",
    OriginalName => "OriginalName",
    Edited => "Edited",
    SourceLibrary => "SourceLibrary",
    RefDesPrefix => "RefDesPrefix",
    NumberofPins => "NumberofPins",
    NumParts => "NumParts",
    Composition => "Composition",
    AltIeee => "AltIEEE",
    AltDeMorgan => "AltDeMorgan",
    PatternPins => "PatternPins",
    RevisionLevel => "Revision Level",
    RevisionNote => "Revision Note",
    Shapes => "Shapes",
    PadShape => "PadShape",
    Pad => "Pad",
    Deletedpad => "Deletedpad",
    Poly => "Poly",
    Polykeepout => "Polykeepout",
    Line => "Line",
    Arc => "Arc",
    Text => "Text",
    Pin => "Pin",
    PinDes => "PinDes",
    PinName => "PinName",
    Attribute => "Attribute",
    Wizard => "Wizard",
    Templatedata => "Templatedata",
    CompPin => "CompPin",
    AttachedSymbol => "AttachedSymbol",
    RelatedFiles => "RelatedFiles",
    PadNum => "PadNum",
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lexeme())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword(Keyword),
    ParenL,
    ParenR,
    Comma,
    Colon,
    Slash,
    Decimal,
    Integer,
    Boolean,
    String,
    Identifier,
    /// A comment, or input passed over by [Tokenizer::skip_until].
    Skipped,
    /// No more input.
    End,
}

impl TokenKind {
    pub fn is_keyword(self, keyword: Keyword) -> bool {
        self == TokenKind::Keyword(keyword)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(keyword) => write!(f, "{keyword}"),
            TokenKind::ParenL => f.write_str("'('"),
            TokenKind::ParenR => f.write_str("')'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Colon => f.write_str("':'"),
            TokenKind::Slash => f.write_str("'/'"),
            TokenKind::Decimal => f.write_str("decimal"),
            TokenKind::Integer => f.write_str("integer"),
            TokenKind::Boolean => f.write_str("boolean"),
            TokenKind::String => f.write_str("string"),
            TokenKind::Identifier => f.write_str("identifier"),
            TokenKind::Skipped => f.write_str("skipped input"),
            TokenKind::End => f.write_str("end of input"),
        }
    }
}

/// The typed value of a literal or identifier token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    None,
    Real(Decimal),
    Integer(i32),
    Boolean(bool),
    /// String contents without quotes, or an identifier.
    Text(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// The matched input.
    pub lexeme: &'a str,
    pub value: Value<'a>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, lexeme: &'a str, value: Value<'a>) -> Self {
        Self {
            kind,
            lexeme,
            value,
        }
    }
}

/// The compiled literal patterns, shared by every tokenizer.
pub struct Patterns {
    decimal: Regex,
    integer: Regex,
    boolean: Regex,
    doubly_quoted: Regex,
    string: Regex,
    spaced_identifier: Regex,
    identifier: Regex,
    comment: Regex,
}

pub static PATTERNS: LazyLock<Patterns> = LazyLock::new(Patterns::new);

impl Patterns {
    fn new() -> Self {
        let compile = |pattern: &str| {
            Regex::new(&format!("^(?i:{pattern})")).expect("valid BXL token pattern")
        };
        Self {
            decimal: compile(r"[-+]?\d*\.\d+(e-\d+)?\b"),
            integer: compile(r"[-+]?\d+\b"),
            boolean: compile(r"(True|False)\b"),
            // Some files quote strings twice.
            doubly_quoted: compile(r#"""[^"\s),].*?"""#),
            // Strings may contain inch marks, as in "0.180" (4.57mm)". The
            // inch form is tried before any single character.
            string: compile(r#""(?:\d"\s*[(,]?\s*\d+(?:\.\d+)?mm|[^"\n])*?""#),
            spaced_identifier: compile(r"Open Collector|Open Emitter"),
            identifier: compile(r"[\w-]+"),
            comment: compile(r"#[^\n]*(\n|$)"),
        }
    }

    /// Matches everything but keywords at the start of `input`.
    fn general<'a>(&self, input: &'a str) -> Result<Option<Token<'a>>, TokenizeError> {
        let punctuation = match input.chars().next() {
            Some('(') => Some(TokenKind::ParenL),
            Some(')') => Some(TokenKind::ParenR),
            Some(',') => Some(TokenKind::Comma),
            Some(':') => Some(TokenKind::Colon),
            Some('/') => Some(TokenKind::Slash),
            _ => None,
        };
        if let Some(kind) = punctuation {
            return Ok(Some(Token::new(kind, &input[..1], Value::None)));
        }

        if let Some(m) = self.decimal.find(input) {
            let lexeme = m.as_str();
            let value = parse_decimal(lexeme)
                .ok_or_else(|| TokenizeError::NumberOutOfRange(lexeme.to_string()))?;
            return Ok(Some(Token::new(TokenKind::Decimal, lexeme, Value::Real(value))));
        }
        if let Some(m) = self.integer.find(input) {
            let lexeme = m.as_str();
            let value = i32::from_str(lexeme)
                .map_err(|_| TokenizeError::NumberOutOfRange(lexeme.to_string()))?;
            return Ok(Some(Token::new(TokenKind::Integer, lexeme, Value::Integer(value))));
        }
        if let Some(m) = self.boolean.find(input) {
            let lexeme = m.as_str();
            let value = lexeme.eq_ignore_ascii_case("true");
            return Ok(Some(Token::new(TokenKind::Boolean, lexeme, Value::Boolean(value))));
        }
        if let Some(m) = self.doubly_quoted.find(input) {
            let lexeme = m.as_str();
            let inner = &lexeme[2..lexeme.len() - 2];
            return Ok(Some(Token::new(TokenKind::String, lexeme, Value::Text(inner))));
        }
        if let Some(m) = self.string.find(input) {
            let lexeme = m.as_str();
            let inner = &lexeme[1..lexeme.len() - 1];
            return Ok(Some(Token::new(TokenKind::String, lexeme, Value::Text(inner))));
        }
        if let Some(m) = self
            .spaced_identifier
            .find(input)
            .or_else(|| self.identifier.find(input))
        {
            let lexeme = m.as_str();
            return Ok(Some(Token::new(TokenKind::Identifier, lexeme, Value::Text(lexeme))));
        }
        if let Some(m) = self.comment.find(input) {
            return Ok(Some(Token::new(TokenKind::Skipped, m.as_str(), Value::None)));
        }

        Ok(None)
    }
}

fn parse_decimal(lexeme: &str) -> Option<Decimal> {
    let lexeme = lexeme.strip_prefix('+').unwrap_or(lexeme);
    let (sign, digits) = match lexeme.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", lexeme),
    };
    // `.5` needs a leading digit.
    let zero = if digits.starts_with('.') { "0" } else { "" };
    let normalized = format!("{sign}{zero}{digits}").to_ascii_lowercase();
    if normalized.contains('e') {
        Decimal::from_scientific(&normalized).ok()
    } else {
        Decimal::from_str(&normalized).ok()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Position, nesting depth and current token. Saving and restoring this is
/// enough to rewind the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenizerState<'a> {
    depth: i32,
    position: usize,
    line: usize,
    column: usize,
    current: Token<'a>,
}

impl TokenizerState<'_> {
    fn start() -> Self {
        Self {
            depth: 0,
            position: 0,
            line: 1,
            column: 1,
            current: Token::new(TokenKind::End, "", Value::None),
        }
    }

    /// Byte offset of the token this state points at.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

pub struct Tokenizer<'a> {
    text: &'a str,
    patterns: &'static Patterns,
    state: TokenizerState<'a>,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer positioned before the first token. Call
    /// [Tokenizer::reset] to read it.
    pub fn new(text: &'a str) -> Self {
        Self::with_patterns(text, &PATTERNS)
    }

    pub fn with_patterns(text: &'a str, patterns: &'static Patterns) -> Self {
        Self {
            text,
            patterns,
            state: TokenizerState::start(),
        }
    }

    /// Rewinds to the start of the input and reads the first token.
    pub fn reset(&mut self) -> Result<(), TokenizeError> {
        self.state = TokenizerState::start();
        self.advance()
    }

    /// Replaces the current token with the next one, skipping whitespace and
    /// comments.
    pub fn advance(&mut self) -> Result<(), TokenizeError> {
        loop {
            self.consume(self.state.current.lexeme.len());
            self.skip_whitespace();

            if self.is_eof() {
                let end = &self.text[self.text.len()..];
                self.state.current = Token::new(TokenKind::End, end, Value::None);
                return Ok(());
            }

            let token = self.find_match()?;
            match token.kind {
                TokenKind::ParenL => self.state.depth += 1,
                TokenKind::ParenR => self.state.depth -= 1,
                _ => {}
            }
            self.state.current = token;

            if token.kind != TokenKind::Skipped {
                return Ok(());
            }
        }
    }

    /// Turns everything from the start of the current token up to, but not
    /// including, the next `target` into one [TokenKind::Skipped] token. The
    /// following [Tokenizer::advance] resumes at `target`.
    pub fn skip_until(&mut self, target: char) {
        let rest = &self.text[self.state.position..];
        let end = rest.find(target).unwrap_or(rest.len());
        self.state.current = Token::new(TokenKind::Skipped, &rest[..end], Value::None);
    }

    pub fn state(&self) -> TokenizerState<'a> {
        self.state
    }

    pub fn restore(&mut self, state: TokenizerState<'a>) {
        self.state = state;
    }

    pub fn token(&self) -> &Token<'a> {
        &self.state.current
    }

    pub fn kind(&self) -> TokenKind {
        self.state.current.kind
    }

    pub fn lexeme(&self) -> &'a str {
        self.state.current.lexeme
    }

    pub fn value(&self) -> Value<'a> {
        self.state.current.value
    }

    /// Byte offset of the current token.
    pub fn position(&self) -> usize {
        self.state.position
    }

    pub fn line(&self) -> usize {
        self.state.line
    }

    pub fn column(&self) -> usize {
        self.state.column
    }

    pub fn depth(&self) -> i32 {
        self.state.depth
    }

    pub fn is_eof(&self) -> bool {
        self.state.position >= self.text.len()
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    fn consume(&mut self, len: usize) {
        let start = self.state.position;
        let end = (start + len).min(self.text.len());
        for c in self.text[start..end].chars() {
            if c == '\n' {
                self.state.line += 1;
                self.state.column = 1;
                self.state.depth = 0;
            } else {
                self.state.column += 1;
            }
        }
        self.state.position = end;
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.text[self.state.position..].chars().next() {
            if !c.is_whitespace() {
                break;
            }
            self.consume(c.len_utf8());
        }
    }

    fn find_match(&self) -> Result<Token<'a>, TokenizeError> {
        let rest = &self.text[self.state.position..];
        if self.state.depth == 0 {
            if let Some(token) = self.match_keyword(rest) {
                return Ok(token);
            }
        }
        self.patterns
            .general(rest)?
            .ok_or_else(|| TokenizeError::Unrecognized(rest.chars().take(10).collect()))
    }

    fn match_keyword(&self, rest: &'a str) -> Option<Token<'a>> {
        if self.text[..self.state.position].ends_with('(') {
            return None;
        }
        Keyword::ALL.iter().find_map(|&keyword| {
            let lexeme = keyword.lexeme();
            let candidate = rest.get(..lexeme.len())?;
            let at_boundary = rest[lexeme.len()..]
                .chars()
                .next()
                .is_none_or(|c| !is_word_char(c));
            (candidate.eq_ignore_ascii_case(lexeme) && at_boundary)
                .then(|| Token::new(TokenKind::Keyword(keyword), candidate, Value::None))
        })
    }
}
