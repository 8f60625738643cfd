//! Persisting the code table.
//!
//! # Format
//!
//! ```text
//! count      u32 LE      number of records that follow (1..=256)
//! records    count x     value:u8  code:u32 LE  code_length:u8
//! ```
//!
//! Only leaves are stored. Internal nodes and child links are not needed to
//! encode or decode, so a loaded tree is a flat list of leaves.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use crate::error::{Error, Result};
use crate::table::CodeTable;
use crate::tree::{HuffmanTree, Node};

/// Size of one persisted leaf record in bytes.
pub const RECORD_SIZE: usize = 6;

pub fn write_table<W: Write>(tree: &HuffmanTree, mut sink: W) -> Result<()> {
    let count = tree.leaf_count() as u32;
    sink.write_u32::<LittleEndian>(count)?;

    for (value, leaf) in tree.leaves() {
        sink.write_u8(value)?;
        sink.write_u32::<LittleEndian>(leaf.code)?;
        sink.write_u8(leaf.code_length)?;
    }

    debug!(records = count, "wrote code table");
    Ok(())
}

/// Reads a table written by [`write_table`] and checks it can drive a
/// [`CodeTable`].
pub fn read_table<R: Read>(mut source: R) -> Result<HuffmanTree> {
    let count = source.read_u32::<LittleEndian>()?;
    if count == 0 || count > 256 {
        return Err(Error::TreeIntegrity(format!(
            "table claims {count} records, expected 1..=256"
        )));
    }

    let mut leaves = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let value = source.read_u8()?;
        let code = source.read_u32::<LittleEndian>()?;
        let code_length = source.read_u8()?;
        leaves.push(Node::coded_leaf(value, code, code_length));
    }

    let tree = HuffmanTree::from_leaves(leaves);
    CodeTable::new(&tree)?;

    debug!(records = count, "read code table");
    Ok(tree)
}
