//! Codec configuration.

use derivative::Derivative;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Codes are stored in a `u32`, so no code may be longer than this.
pub const MAX_CODE_LENGTH: u8 = 32;

/// Knobs for building and logging a tree.
///
/// Deserializable from any serde format; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct CodecConfig {
    /// Longest code the builder accepts before failing the build.
    #[derivative(Default(value = "MAX_CODE_LENGTH"))]
    pub max_code_length: u8,

    /// Emit a `trace` event for every leaf code after a build.
    pub trace_codes: bool,
}

impl CodecConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_code_length == 0 || self.max_code_length > MAX_CODE_LENGTH {
            return Err(Error::InvalidInput(format!(
                "max_code_length must be in 1..={MAX_CODE_LENGTH}, got {}",
                self.max_code_length
            )));
        }

        Ok(())
    }
}
