// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/lib.rs - Decoder and parser library for BXL and XLR files.
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
 * # `bxl` Crate
 *
 * A library for decoding, parsing, and interpreting BXL and XLR PCB component
 * library files.
 *
 * BXL files are Huffman-compressed text. XLR files hold the same text
 * uncompressed. This crate provides the full pipeline:
 *
 * 1. [decoder]: Decompresses BXL bytes into text.
 * 2. [tokenizer]: Splits the text into keywords, punctuation and literals.
 * 3. [parser]: Reads the tokens into a [document::BxlDocument], logging
 *    anything it had to skip.
 * 4. [interpreter]: Transforms parsed data into usable footprint information.
 *
 * ## Usage Example
 *
 * ```no_run
 * use bxl::decoder::{DecodedBxlFile, FileType};
 * use bxl::parser::ParsedBxlFile;
 * use bxl::interpreter::InterpretedBxlFile;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     // Decode the file
 *     let decoded = DecodedBxlFile::from_filename("example.bxl", FileType::FromExtension)?;
 *
 *     // Parse the decoded file
 *     let parsed = ParsedBxlFile::from_decoded(&decoded, "example.bxl");
 *     if parsed.has_errors() {
 *         eprintln!("Parsing stopped early, the document is incomplete");
 *     }
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

pub mod decoder;
pub mod document;
pub mod error;
pub mod fields;
pub mod geometry;
pub mod instance;
pub mod interpreter;
pub mod library;
pub mod parser;
pub mod tokenizer;

pub use error::Error;
