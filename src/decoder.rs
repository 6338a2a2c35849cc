// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/decoder.rs - Decoder library for binary BXL files.
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
 * # `decoder` Module
 *
 * Binary BXL files are the textual XLR grammar compressed with an adaptive
 * Huffman code. The first four bytes hold the decompressed length, with the
 * bits of every byte reversed. The remaining bytes are a bit stream read
 * most-significant-bit first, walked through a 256-leaf tree whose shape
 * changes as symbol weights grow.
 */

use std::fs::File;
use std::io::BufReader;
use std::io::prelude::*;
use std::path::Path;
use std::sync::LazyLock;

use log::{debug, warn};

use crate::error::Error;

const HEADER_LEN: usize = 4;
const LEAF_LEVEL: u8 = 8;

#[derive(Debug, Clone)]
struct Node {
    parent: Option<usize>,
    left: Option<usize>,
    right: Option<usize>,
    weight: u64,
    symbol: u8,
    level: u8,
}

impl Node {
    fn new(parent: Option<usize>, level: u8, symbol: u8) -> Self {
        Self {
            parent,
            left: None,
            right: None,
            weight: 0,
            symbol,
            level,
        }
    }

    fn is_leaf(&self) -> bool {
        self.level == LEAF_LEVEL
    }
}

/// The decoding tree, stored as an arena. Node 0 is the root.
#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

const ROOT: usize = 0;

static TEMPLATE: LazyLock<Tree> = LazyLock::new(Tree::build);

impl Tree {
    /// Fills the tree depth first, right branch before left, numbering leaves
    /// in the order they are created.
    fn build() -> Self {
        let mut tree = Self {
            nodes: vec![Node::new(None, 0, 0)],
        };
        let mut next_symbol: u16 = 0;
        tree.fill(ROOT, &mut next_symbol);
        tree
    }

    fn fill(&mut self, parent: usize, next_symbol: &mut u16) {
        let level = self.nodes[parent].level + 1;
        let right = self.create(parent, level, next_symbol);
        self.nodes[parent].right = Some(right);
        if level < LEAF_LEVEL {
            self.fill(right, next_symbol);
        }
        let left = self.create(parent, level, next_symbol);
        self.nodes[parent].left = Some(left);
        if level < LEAF_LEVEL {
            self.fill(left, next_symbol);
        }
    }

    fn create(&mut self, parent: usize, level: u8, next_symbol: &mut u16) -> usize {
        let mut symbol = 0;
        if level == LEAF_LEVEL {
            symbol = (*next_symbol & 0xFF) as u8;
            *next_symbol += 1;
        }
        self.nodes.push(Node::new(Some(parent), level, symbol));
        self.nodes.len() - 1
    }

    fn sibling(&self, parent: usize, child: usize) -> Option<usize> {
        let node = &self.nodes[parent];
        if node.right != Some(child) {
            node.right
        } else {
            node.left
        }
    }

    fn weight(&self, node: Option<usize>) -> u64 {
        node.map_or(0, |index| self.nodes[index].weight)
    }

    fn needs_swapping(&self, node: usize) -> Option<(usize, usize)> {
        let parent = self.nodes[node].parent?;
        let grandparent = self.nodes[parent].parent?;
        (self.nodes[node].weight > self.nodes[parent].weight).then_some((parent, grandparent))
    }

    /// Makes `replacement` a child of `parent` in the slot held by `old`.
    fn relink(&mut self, parent: usize, old: Option<usize>, replacement: Option<usize>) {
        if let Some(replacement) = replacement {
            self.nodes[replacement].parent = Some(parent);
        }
        let node = &mut self.nodes[parent];
        if node.right == old {
            node.right = replacement;
        } else if node.left == old {
            node.left = replacement;
        }
    }

    /// Moves a node that outweighs its parent up into the place of its
    /// parent's sibling, then repeats from every node whose weight changed.
    fn update(&mut self, node: usize) {
        while let Some((parent, grandparent)) = self.needs_swapping(node) {
            let uncle = self.sibling(grandparent, parent);
            self.relink(grandparent, Some(parent), Some(node));
            self.relink(grandparent, uncle, Some(parent));
            self.relink(parent, Some(node), uncle);

            let parent_weight = self.weight(self.nodes[parent].right) + self.weight(self.nodes[parent].left);
            self.nodes[parent].weight = parent_weight;
            self.nodes[grandparent].weight = self.nodes[node].weight + parent_weight;

            self.update(parent);
            self.update(grandparent);
        }
    }
}

/// Reads bits most-significant first, starting with one zero bit that is not
/// part of the input.
struct BitReader<'a> {
    data: &'a [u8],
    index: usize,
    current_byte: u8,
    current_bit: i8,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            index: 0,
            current_byte: 0,
            current_bit: 0,
        }
    }

    fn has_more(&self) -> bool {
        self.index < self.data.len()
    }

    fn next_bit(&mut self) -> Option<bool> {
        if self.current_bit < 0 {
            self.current_byte = *self.data.get(self.index)?;
            self.index += 1;
            self.current_bit = 7;
        }
        let bit = self.current_byte & (1 << self.current_bit) != 0;
        self.current_bit -= 1;
        Some(bit)
    }
}

/// Reads the decompressed length from the header.
pub fn decoded_len(data: &[u8]) -> Option<u32> {
    let header = data.get(..HEADER_LEN)?;
    Some(
        header
            .iter()
            .enumerate()
            .map(|(i, byte)| u32::from(byte.reverse_bits()) << (8 * i))
            .fold(0, |size, part| size | part),
    )
}

/// Decompresses a binary BXL buffer into its raw bytes.
///
/// Malformed input never fails. Decoding stops early if the bit stream ends
/// before the length given in the header has been produced.
pub fn decode_bytes(data: &[u8]) -> Vec<u8> {
    let Some(size) = decoded_len(data) else {
        debug!(len = data.len(); "Input too short for a BXL header");
        return Vec::new();
    };
    let size = size as usize;
    debug!(size, compressed = data.len(); "Decoding BXL data");

    let mut tree = TEMPLATE.clone();
    let mut reader = BitReader::new(&data[HEADER_LEN..]);
    let mut output = Vec::with_capacity(size.min(data.len().saturating_mul(8)));

    'symbols: while reader.has_more() && output.len() != size {
        let mut node = ROOT;
        while !tree.nodes[node].is_leaf() {
            let Some(bit) = reader.next_bit() else {
                break 'symbols;
            };
            let next = if bit {
                tree.nodes[node].left
            } else {
                tree.nodes[node].right
            };
            match next {
                Some(next) => node = next,
                None => break 'symbols,
            }
        }
        output.push(tree.nodes[node].symbol);
        tree.nodes[node].weight += 1;
        tree.update(node);
    }

    if output.len() != size {
        warn!(expected = size, actual = output.len(); "BXL data ended before the declared length");
    }

    output
}

/// Decompresses a binary BXL buffer into text, one character per byte.
pub fn decode(data: &[u8]) -> String {
    decode_bytes(data).iter().map(|&byte| char::from(byte)).collect()
}

/// How to interpret the contents of an input file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Text if the extension is `.xlr`, binary otherwise.
    #[default]
    FromExtension,
    Binary,
    Text,
}

impl FileType {
    pub fn is_binary(self, path: &Path) -> bool {
        match self {
            FileType::Binary => true,
            FileType::Text => false,
            FileType::FromExtension => !path
                .extension()
                .and_then(|extension| extension.to_str())
                .is_some_and(|extension| extension.eq_ignore_ascii_case("xlr")),
        }
    }
}

/// The textual contents of a BXL or XLR file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBxlFile {
    pub text: String,
}

impl DecodedBxlFile {
    pub fn from_filename(path: impl AsRef<Path>, file_type: FileType) -> Result<Self, Error> {
        let path = path.as_ref();
        let io_error = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_error)?;
        let mut reader = BufReader::new(file);

        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).map_err(io_error)?;

        if file_type.is_binary(path) {
            Ok(Self::from_bytes(&buffer))
        } else {
            Ok(Self::from_text(&buffer))
        }
    }

    /// Decompresses binary BXL data.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self { text: decode(data) }
    }

    /// Reads XLR text, dropping any UTF-8 byte order mark.
    pub fn from_text(data: &[u8]) -> Self {
        let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
        Self {
            text: String::from_utf8_lossy(data).into_owned(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use proptest::prelude::*;

    /// Compresses `input` the way the decoder expects, for building fixtures.
    pub(crate) fn encode(input: &[u8]) -> Vec<u8> {
        let mut tree = TEMPLATE.clone();
        let mut leaves = [0usize; 256];
        for (index, node) in tree.nodes.iter().enumerate() {
            if node.is_leaf() {
                leaves[usize::from(node.symbol)] = index;
            }
        }

        let mut bits = Vec::new();
        for &symbol in input {
            let leaf = leaves[usize::from(symbol)];
            let mut path = Vec::new();
            let mut node = leaf;
            while let Some(parent) = tree.nodes[node].parent {
                path.push(tree.nodes[parent].left == Some(node));
                node = parent;
            }
            bits.extend(path.into_iter().rev());
            tree.nodes[leaf].weight += 1;
            tree.update(leaf);
        }

        // The decoder supplies the first bit itself.
        if !bits.is_empty() {
            assert!(!bits.remove(0), "first symbol must start with a zero bit");
        }

        let size = input.len() as u32;
        let mut output: Vec<u8> = (0..HEADER_LEN)
            .map(|i| ((size >> (8 * i)) as u8).reverse_bits())
            .collect();
        for chunk in bits.chunks(8) {
            let byte = chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, &bit)| byte | (u8::from(bit) << (7 - i)));
            output.push(byte);
        }
        // Decoding stops once the last byte has been fetched, so codes
        // packed into it still need a byte after them.
        output.push(0);
        output
    }

    #[test]
    fn template_is_an_identity_code() {
        let tree = &*TEMPLATE;
        assert_eq!(tree.nodes.len(), 511);
        for symbol in [0u8, 1, 2, 0x41, 0x7F, 0x80, 0xFF] {
            let mut node = ROOT;
            for i in (0..8).rev() {
                let bit = symbol & (1 << i) != 0;
                node = if bit {
                    tree.nodes[node].left
                } else {
                    tree.nodes[node].right
                }
                .expect("interior nodes have two children");
            }
            assert!(tree.nodes[node].is_leaf());
            assert_eq!(tree.nodes[node].symbol, symbol);
        }
    }

    #[test]
    fn header_bytes_are_bit_reversed() {
        assert_eq!(decoded_len(&[0x80, 0, 0, 0]), Some(1));
        assert_eq!(decoded_len(&[0, 0x80, 0, 0]), Some(0x100));
        assert_eq!(decoded_len(&[0x01, 0, 0, 0]), Some(0x80));
        assert_eq!(decoded_len(&[0, 0, 0]), None);
    }

    #[test]
    fn short_input_decodes_to_nothing() {
        assert_eq!(decode(&[]), "");
        assert_eq!(decode(&[0x80, 0, 0]), "");
    }

    #[test]
    fn first_bit_is_implied() {
        // One symbol of 0x00 is eight zero bits, the first of them implied.
        assert_eq!(decode_bytes(&[0x80, 0, 0, 0, 0x00]), vec![0x00]);
        // With 0xFE the last seven bits are 1111111, so the code is 01111111.
        assert_eq!(decode_bytes(&[0x80, 0, 0, 0, 0xFE]), vec![0x7F]);
    }

    #[test]
    fn decodes_fixtures_of_several_sizes() {
        let fixtures: [&[u8]; 4] = [
            b"A",
            b"PadStacks : 1\r\n",
            b"Pattern \"SOIC8\"\r\n    OriginPoint (0, 0)\r\n    Data : 2\r\n        Pad (Number 1) (PinName \"1\")\r\n        Pad (Number 2) (PinName \"2\")\r\n    EndData\r\nEndPattern\r\n",
            &[b'a'; 4096],
        ];
        for fixture in fixtures {
            let encoded = encode(fixture);
            assert_eq!(decode_bytes(&encoded), fixture);
        }
    }

    #[test]
    fn truncated_stream_stops_early() {
        let text = b"TextStyles : 2\r\nTextStyle \"H50S3\" (FontWidth 3)\r\n";
        let encoded = encode(text);
        let truncated = &encoded[..encoded.len() / 2];
        let decoded = decode_bytes(truncated);
        assert!(decoded.len() < text.len());
        assert_eq!(&text[..decoded.len()], &decoded[..]);
    }

    #[test]
    fn text_input_drops_byte_order_mark() {
        let decoded = DecodedBxlFile::from_text(b"\xEF\xBB\xBFTextStyles : 0");
        assert_eq!(decoded.text, "TextStyles : 0");
    }

    #[test]
    fn file_type_follows_extension() {
        assert!(FileType::FromExtension.is_binary(Path::new("part.bxl")));
        assert!(!FileType::FromExtension.is_binary(Path::new("part.XLR")));
        assert!(FileType::FromExtension.is_binary(Path::new("part")));
        assert!(FileType::Binary.is_binary(Path::new("part.xlr")));
        assert!(!FileType::Text.is_binary(Path::new("part.bxl")));
    }

    proptest! {
        #[test]
        fn ascii_text_round_trips(text in "[ -~\r\n]{0,512}") {
            let encoded = encode(text.as_bytes());
            prop_assert_eq!(decode(&encoded), text);
        }

        #[test]
        fn output_never_exceeds_declared_length(
            declared in 0u32..64,
            body in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            let mut data: Vec<u8> = (0..4).map(|i| ((declared >> (8 * i)) as u8).reverse_bits()).collect();
            data.extend(body);
            prop_assert!(decode_bytes(&data).len() <= declared as usize);
        }
    }
}
