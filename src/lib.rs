//! Byte-oriented Huffman compression.
//!
//! A [`HuffmanTree`] is built from the byte frequencies of an input, its leaf
//! codes are persisted as a flat table, and the input is rewritten as densely
//! packed code bits followed by a one-byte trailer.
//!
//! ```
//! let input = b"so much depends upon a red wheel barrow";
//!
//! let tree = hufftree::build(input)?;
//! let mut artifact = Vec::new();
//! hufftree::persist(&tree, &mut artifact)?;
//! hufftree::encode(&tree, input, &mut artifact)?;
//!
//! let mut source = &artifact[..];
//! let restored = hufftree::load(&mut source)?;
//! let mut out = Vec::new();
//! hufftree::decode(&restored, source, &mut out)?;
//! assert_eq!(out, input);
//! # Ok::<(), hufftree::Error>(())
//! ```

use std::io::{Read, Write};

pub mod archive;
pub mod bitstream;
pub mod codec;
pub mod config;
pub mod error;
pub mod frequency;
pub mod table;
pub mod tree;

pub use archive::{
    compress, compress_file, compress_file_with, compress_with, decompress, decompress_file,
};
pub use config::CodecConfig;
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use table::CodeTable;
pub use tree::{HuffmanTree, Node, NodeId, NodeKind, NodeSummary, TreeSummary};

/// Builds a tree from the byte frequencies of `input`.
pub fn build(input: &[u8]) -> Result<HuffmanTree> {
    build_with(input, &CodecConfig::default())
}

pub fn build_with(input: &[u8], config: &CodecConfig) -> Result<HuffmanTree> {
    HuffmanTree::build(&FrequencyTable::from_bytes(input), config)
}

/// Writes the leaf code table of `tree`.
pub fn persist<W: Write>(tree: &HuffmanTree, sink: W) -> Result<()> {
    codec::write_table(tree, sink)
}

/// Reads a code table written by [`persist`].
pub fn load<R: Read>(source: R) -> Result<HuffmanTree> {
    codec::read_table(source)
}

/// Writes the data segment for `input`; returns the number of payload bits.
pub fn encode<W: Write>(tree: &HuffmanTree, input: &[u8], sink: W) -> Result<u64> {
    let table = CodeTable::new(tree)?;
    bitstream::encode(&table, input, sink)
}

/// Reads a whole data segment from `source` and writes the decoded bytes.
pub fn decode<R: Read, W: Write>(tree: &HuffmanTree, source: R, sink: W) -> Result<()> {
    let table = CodeTable::new(tree)?;
    bitstream::decode(&table, source, sink)
}
