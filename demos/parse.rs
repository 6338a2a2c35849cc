// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  parse.rs - Parser demo for BXL and XLR files.
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

use clap::Parser;

use bxl::decoder::*;
use bxl::parser::ParsedBxlFile;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to read.
    file: String,

    /// Treat the file as compressed BXL, whatever its extension.
    #[arg(long, conflicts_with = "text")]
    binary: bool,

    /// Treat the file as plain XLR text, whatever its extension.
    #[arg(long)]
    text: bool,

    /// Print the whole parsed document.
    #[arg(long)]
    dump: bool,
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    let file_type = if args.binary {
        FileType::Binary
    } else if args.text {
        FileType::Text
    } else {
        FileType::FromExtension
    };

    let decoded = match DecodedBxlFile::from_filename(&args.file, file_type) {
        Ok(df) => df,
        Err(error) => {
            eprintln!("Error opening file {:?}: {}", &args.file, error);
            return;
        }
    };

    let parsed = ParsedBxlFile::from_decoded(&decoded, &args.file);

    for entry in &parsed.logs {
        eprintln!("{}", entry);
    }

    if args.dump {
        println!("{:?}", parsed.document);
        return;
    }

    let document = &parsed.document;
    println!("Text styles: {}", document.text_styles.len());
    println!("Pad stacks: {}", document.pad_stacks.len());
    println!("Footprints: {}", document.footprints.len());
    for footprint in &document.footprints {
        println!("  {} ({} items)", footprint.name, footprint.data.len());
    }
    println!("Symbols: {}", document.symbols.len());
    println!("Components: {}", document.components.len());
    for component in &document.components {
        println!(
            "  {} ({} pins, pattern {})",
            component.name,
            component.number_of_pins(),
            component.pattern_name.as_deref().unwrap_or("-")
        );
    }

    if parsed.has_errors() {
        eprintln!("Parsing stopped early, the output above is incomplete.");
    }
}
