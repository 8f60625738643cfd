//! Bit packing of coded bytes.
//!
//! Codes are written starting from their least significant bit, and each
//! output byte fills from bit 0 upward. A final partial byte holding `k` bits
//! is shifted so those bits sit in its top `k` positions. One trailer byte
//! follows the payload with the number of valid bits in the last payload
//! byte, or 0 if that byte is full.
//!
//! The decoder accumulates bits in arrival order, so the newest bit is at
//! the low end. Arrival order is the reverse of how codes are stored, hence
//! the low bits are reversed before every lookup.

use std::io::{Read, Write};

use bitvec::prelude::*;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::table::CodeTable;

/// Writes the packed codes for `input` followed by the trailer byte.
///
/// Returns the number of payload bits, not counting padding or trailer.
pub fn encode<W: Write>(table: &CodeTable, input: &[u8], mut sink: W) -> Result<u64> {
    let mut bits: BitVec<u8, Lsb0> = BitVec::with_capacity(input.len() * 2);
    for &byte in input {
        let (code, len) = table.code_for(byte)?;
        for i in 0..len {
            bits.push((code >> i) & 1 == 1);
        }
    }

    let payload_bits = bits.len() as u64;
    let valid = (bits.len() % 8) as u8;

    let mut packed = bits.into_vec();
    if valid != 0 {
        if let Some(last) = packed.last_mut() {
            *last <<= 8 - valid;
        }
    }
    packed.push(valid);
    sink.write_all(&packed)?;

    debug!(
        input = input.len(),
        payload_bits,
        output = packed.len(),
        "encoded bitstream"
    );
    Ok(payload_bits)
}

/// Decodes a full data segment from `source` into `sink`.
///
/// Output is only written once the whole stream decoded cleanly.
pub fn decode<R: Read, W: Write>(table: &CodeTable, mut source: R, mut sink: W) -> Result<()> {
    let mut packed = Vec::new();
    source.read_to_end(&mut packed)?;

    let (&trailer, payload) = packed
        .split_last()
        .ok_or(Error::TruncatedStream { pending_bits: 0 })?;
    if trailer > 7 {
        return Err(Error::InvalidInput(format!(
            "trailer claims {trailer} valid bits in the last byte"
        )));
    }
    if payload.is_empty() && trailer != 0 {
        return Err(Error::InvalidInput(
            "trailer refers to a missing payload byte".into(),
        ));
    }

    let bits = payload.view_bits::<Lsb0>();
    let (full_end, tail_start) = if trailer == 0 {
        (bits.len(), bits.len())
    } else {
        (bits.len() - 8, bits.len() - trailer as usize)
    };
    let stream = bits[..full_end]
        .iter()
        .by_vals()
        .chain(bits[tail_start..].iter().by_vals());

    let max_length = table.max_code_length();
    let mut out = Vec::with_capacity(payload.len() * 2);
    let mut code = 0u32;
    let mut len = 0u8;

    for (position, bit) in stream.enumerate() {
        code = (code << 1) | bit as u32;
        len += 1;
        if len > max_length {
            warn!(position, max_length, "no code matches the bitstream");
            return Err(Error::UnknownCode {
                max_length,
                position,
            });
        }

        if let Some(value) = table.value_for(reverse_low_bits(code, len), len) {
            out.push(value);
            code = 0;
            len = 0;
        }
    }

    if len != 0 {
        warn!(pending_bits = len, "bitstream ended inside a code");
        return Err(Error::TruncatedStream { pending_bits: len });
    }

    sink.write_all(&out)?;
    debug!(input = packed.len(), output = out.len(), "decoded bitstream");
    Ok(())
}

/// Reverses the order of the low `n` bits of `code`; higher bits must be 0.
fn reverse_low_bits(code: u32, n: u8) -> u32 {
    debug_assert!((1..=32).contains(&n));
    code.reverse_bits() >> (32 - n as u32)
}
