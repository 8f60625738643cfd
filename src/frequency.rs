//! Byte frequency counting.

use std::io::{Read, Seek, SeekFrom};

use crate::error::Result;

/// Per-byte counting state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Symbol {
    pub seen: bool,
    pub frequency: u64,
}

/// Occurrence counts for all 256 byte values of one input.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    symbols: [Symbol; 256],
    byte_count: u64,
    max_frequency: u64,
}

impl FrequencyTable {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = Self::empty();
        table.count(bytes);
        table
    }

    /// Counts everything `reader` yields, then seeks back to where it started
    /// so the caller can read the same data again for encoding.
    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let start = reader.stream_position()?;
        let mut table = Self::empty();

        let mut buf = [0u8; 8192];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            table.count(&buf[..n]);
        }

        reader.seek(SeekFrom::Start(start))?;
        Ok(table)
    }

    fn empty() -> Self {
        Self {
            symbols: [Symbol::default(); 256],
            byte_count: 0,
            max_frequency: 0,
        }
    }

    fn count(&mut self, bytes: &[u8]) {
        for &b in bytes {
            let sym = &mut self.symbols[b as usize];
            sym.seen = true;
            sym.frequency += 1;
            self.max_frequency = self.max_frequency.max(sym.frequency);
        }
        self.byte_count += bytes.len() as u64;
    }

    pub fn symbol(&self, value: u8) -> Symbol {
        self.symbols[value as usize]
    }

    /// Observed `(value, frequency)` pairs in ascending byte order.
    pub fn observed(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .filter(|(_, s)| s.seen)
            .map(|(v, s)| (v as u8, s.frequency))
    }

    /// Number of distinct byte values seen.
    pub fn distinct(&self) -> usize {
        self.symbols.iter().filter(|s| s.seen).count()
    }

    pub fn byte_count(&self) -> u64 {
        self.byte_count
    }

    pub fn max_frequency(&self) -> u64 {
        self.max_frequency
    }

    pub fn is_empty(&self) -> bool {
        self.byte_count == 0
    }
}
