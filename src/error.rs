//! Error types for compression and decompression.

use thiserror::Error;

/// Every failure the codec can report.
///
/// Nothing here is transient: the algorithms are deterministic, so callers
/// should surface the error and discard any partial output.
#[derive(Debug, Error)]
pub enum Error {
    /// The input or output stream could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Framing of a persisted artifact or a configuration value is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Input had no bytes, so there is nothing to build a tree from.
    #[error("empty input: no symbols to build a tree from")]
    EmptyInput,

    /// The tree or code table breaks a structural invariant.
    #[error("tree integrity error: {0}")]
    TreeIntegrity(String),

    /// A byte being encoded has no leaf in the code table.
    #[error("byte {0:#04x} has no code in the table")]
    UnknownSymbol(u8),

    /// Decoding accumulated more bits than the longest code without a match.
    #[error("no code of up to {max_length} bits matches the stream at bit {position}")]
    UnknownCode { max_length: u8, position: usize },

    /// The bitstream ended in the middle of a code, or without its trailer.
    #[error("truncated stream: {pending_bits} bits left without a complete code")]
    TruncatedStream { pending_bits: u8 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
