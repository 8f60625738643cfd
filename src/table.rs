//! Flat code lookups derived from a tree's leaves.

use std::collections::HashMap;

use crate::config::MAX_CODE_LENGTH;
use crate::error::{Error, Result};
use crate::tree::HuffmanTree;

/// Lookup by byte value for encoding and by `(code, length)` for decoding.
///
/// Codes of different lengths can share the same integer, so the decode side
/// is always keyed on the pair.
#[derive(Debug, Clone)]
pub struct CodeTable {
    by_value: [Option<(u32, u8)>; 256],
    by_code: HashMap<(u32, u8), u8>,
    max_code_length: u8,
}

impl CodeTable {
    pub fn new(tree: &HuffmanTree) -> Result<Self> {
        let mut by_value = [None; 256];
        let mut by_code = HashMap::new();
        let mut max_code_length = 0;

        for (value, leaf) in tree.leaves() {
            let (code, len) = (leaf.code, leaf.code_length);

            if len == 0 || len > MAX_CODE_LENGTH {
                return Err(Error::TreeIntegrity(format!(
                    "byte {value:#04x} has a code length of {len}"
                )));
            }
            if len < MAX_CODE_LENGTH && code >> len != 0 {
                return Err(Error::TreeIntegrity(format!(
                    "code {code:#b} for byte {value:#04x} does not fit in {len} bits"
                )));
            }
            if by_value[value as usize].replace((code, len)).is_some() {
                return Err(Error::TreeIntegrity(format!(
                    "byte {value:#04x} appears more than once"
                )));
            }
            if let Some(other) = by_code.insert((code, len), value) {
                return Err(Error::TreeIntegrity(format!(
                    "bytes {other:#04x} and {value:#04x} share a code"
                )));
            }

            max_code_length = max_code_length.max(len);
        }

        if by_code.is_empty() {
            return Err(Error::TreeIntegrity("code table has no leaves".into()));
        }

        Ok(Self {
            by_value,
            by_code,
            max_code_length,
        })
    }

    pub fn code_for(&self, value: u8) -> Result<(u32, u8)> {
        self.by_value[value as usize].ok_or(Error::UnknownSymbol(value))
    }

    /// `None` means the bits are not (yet) a complete code.
    pub fn value_for(&self, code: u32, code_length: u8) -> Option<u8> {
        self.by_code.get(&(code, code_length)).copied()
    }

    pub fn max_code_length(&self) -> u8 {
        self.max_code_length
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
