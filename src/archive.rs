//! Whole artifacts: code table segment followed by data segment.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;
use crate::{codec, decode, encode};

pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    compress_with(input, &CodecConfig::default())
}

pub fn compress_with(input: &[u8], config: &CodecConfig) -> Result<Vec<u8>> {
    let tree = HuffmanTree::build(&FrequencyTable::from_bytes(input), config)?;
    pack(&tree, input)
}

pub fn decompress(artifact: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(artifact);
    let tree = codec::read_table(&mut cursor)?;

    let mut out = Vec::new();
    decode(&tree, &mut cursor, &mut out)?;
    Ok(out)
}

fn pack(tree: &HuffmanTree, input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    codec::write_table(tree, &mut out)?;
    encode(tree, input, &mut out)?;
    Ok(out)
}

/// Compresses the file at `input` into `output`.
///
/// The artifact is written to a sibling `.partial` file and renamed into
/// place, so a failed run never leaves a truncated `output` behind.
pub fn compress_file(input: &Path, output: &Path) -> Result<()> {
    compress_file_with(input, output, &CodecConfig::default())
}

pub fn compress_file_with(input: &Path, output: &Path, config: &CodecConfig) -> Result<()> {
    let mut reader = BufReader::new(File::open(input)?);
    let freq = FrequencyTable::from_reader(&mut reader)?;
    let tree = HuffmanTree::build(&freq, config)?;

    let mut data = Vec::with_capacity(freq.byte_count() as usize);
    reader.read_to_end(&mut data)?;

    let artifact = pack(&tree, &data)?;
    write_atomically(output, &artifact)?;

    debug!(
        input = %input.display(),
        output = %output.display(),
        original = data.len(),
        compressed = artifact.len(),
        "compressed file"
    );
    Ok(())
}

pub fn decompress_file(input: &Path, output: &Path) -> Result<()> {
    let artifact = fs::read(input)?;
    let data = decompress(&artifact)?;
    write_atomically(output, &data)?;

    debug!(
        input = %input.display(),
        output = %output.display(),
        restored = data.len(),
        "decompressed file"
    );
    Ok(())
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = partial_path(path)?;

    let written = fs::write(&temp_path, bytes).and_then(|()| fs::rename(&temp_path, path));
    if let Err(e) = written {
        // best effort, the write error is the one worth reporting
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}

fn partial_path(path: &Path) -> Result<PathBuf> {
    let mut name: OsString = path
        .file_name()
        .ok_or_else(|| Error::InvalidInput(format!("{} is not a file path", path.display())))?
        .to_owned();
    name.push(".partial");
    Ok(path.with_file_name(name))
}
