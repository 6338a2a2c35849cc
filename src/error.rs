// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/error.rs - Error types for the BXL library.
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
 * # `error` Module
 *
 * Decoding and parsing never fail from the caller's point of view: problems
 * found in the input end up in [Logs](crate::document::Logs). The only errors
 * surfaced through `Result` are the ones reading the input file.
 */

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned when loading a BXL or XLR file from disk.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Raised by the tokenizer when no pattern matches the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("Unrecognized input: {0}")]
    Unrecognized(String),

    #[error("Numeric literal out of range: {0}")]
    NumberOutOfRange(String),
}

/// Fatal conditions that stop a parse.
///
/// These unwind through `?` to [`Parser::execute`](crate::parser::Parser::execute),
/// which turns them into a single log entry and returns the partial document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error("{0}")]
    Syntax(String),
}
