//! End-to-end behaviour of the public API: build, persist, load, encode and
//! decode, plus whole-artifact and file helpers.

use std::fs;
use std::path::PathBuf;

use hufftree::{Error, HuffmanTree};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn round_trip(input: &[u8]) -> Vec<u8> {
    let tree = hufftree::build(input).expect("build failed");

    let mut table = Vec::new();
    hufftree::persist(&tree, &mut table).expect("persist failed");
    let mut data = Vec::new();
    hufftree::encode(&tree, input, &mut data).expect("encode failed");

    let restored = hufftree::load(&table[..]).expect("load failed");
    let mut out = Vec::new();
    hufftree::decode(&restored, &data[..], &mut out).expect("decode failed");
    out
}

fn code_length(tree: &HuffmanTree, value: u8) -> u8 {
    tree.leaves()
        .find(|(v, _)| *v == value)
        .map(|(_, n)| n.code_length)
        .unwrap()
}

#[test]
fn text_round_trips() {
    let s = "This is a really long message, I sure do hope it encodes and decodes properly.";
    assert_eq!(round_trip(s.as_bytes()), s.as_bytes());
}

#[test]
fn random_inputs_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..200 {
        let len = rng.gen_range(1..2000);
        // narrow alphabets give skewed trees, wide ones give flat trees
        let alphabet = rng.gen_range(1..=256u32);
        let input: Vec<u8> = (0..len)
            .map(|_| rng.gen_range(0..alphabet) as u8)
            .collect();

        assert_eq!(round_trip(&input), input);
    }
}

#[test]
fn every_byte_value_round_trips() {
    let input: Vec<u8> = (0..=255u8).cycle().take(256 * 7 + 13).collect();
    assert_eq!(round_trip(&input), input);
}

#[test]
fn single_symbol_input() {
    let input = vec![0x41; 1000];
    let tree = hufftree::build(&input).unwrap();
    assert_eq!(code_length(&tree, 0x41), 1);
    assert_eq!(round_trip(&input), input);
}

#[test]
fn two_symbol_input() {
    let input = b"AB".repeat(37);
    let tree = hufftree::build(&input).unwrap();

    assert_eq!(tree.leaf_count(), 2);
    assert_eq!(tree.count(), 3);
    let codes: Vec<_> = tree.leaves().map(|(v, n)| (v, n.code, n.code_length)).collect();
    assert_eq!(codes, vec![(b'A', 0, 1), (b'B', 1, 1)]);
    assert_eq!(round_trip(&input), input);
}

#[test]
fn same_frequencies_different_order() {
    let first = b"aabbbcdddd".to_vec();
    let second = b"ddddcbbbaa".to_vec();
    let third = b"bbbaaccccd".to_vec();

    for input in [&first, &second, &third] {
        assert_eq!(&round_trip(input), input);
    }

    // building twice from the same bytes gives the same table
    let a = hufftree::build(&third).unwrap().describe();
    let b = hufftree::build(&third).unwrap().describe();
    assert_eq!(a, b);
}

#[test]
fn payload_size_matches_code_lengths() {
    let mut rng = StdRng::seed_from_u64(7);
    let input: Vec<u8> = (0..5000)
        .map(|_| {
            // roughly geometric so code lengths differ
            let r: u32 = rng.gen_range(0..1024);
            (32 - r.leading_zeros()) as u8
        })
        .collect();

    let tree = hufftree::build(&input).unwrap();
    assert!(tree.leaf_count() > 1);

    let expected: u64 = input.iter().map(|&b| code_length(&tree, b) as u64).sum();

    let mut data = Vec::new();
    let bits = hufftree::encode(&tree, &input, &mut data).unwrap();
    assert_eq!(bits, expected);

    let payload_bytes = (expected as usize + 7) / 8;
    assert_eq!(data.len(), payload_bytes + 1);
    assert_eq!(*data.last().unwrap() as u64, expected % 8);
}

#[test]
fn mismatched_table_is_detected() {
    let many = b"the quick brown fox jumps over the lazy dog".to_vec();
    let mut data = Vec::new();
    hufftree::encode(&hufftree::build(&many).unwrap(), &many, &mut data).unwrap();

    let foreign = hufftree::build(&[b'q'; 64]).unwrap();
    let mut out = Vec::new();
    let err = hufftree::decode(&foreign, &data[..], &mut out).unwrap_err();

    assert!(matches!(
        err,
        Error::UnknownCode { .. } | Error::TruncatedStream { .. }
    ));
    assert!(out.is_empty());
}

#[test]
fn truncated_data_is_detected() {
    let input = b"aaaabbc";
    let tree = hufftree::build(input).unwrap();
    let mut out = Vec::new();

    // trailer says one valid bit, and that bit only starts a two-bit code
    let err = hufftree::decode(&tree, &[0x00u8, 1][..], &mut out).unwrap_err();
    assert!(matches!(err, Error::TruncatedStream { pending_bits: 1 }));
}

#[test]
fn empty_input_is_rejected() {
    assert!(matches!(hufftree::build(b""), Err(Error::EmptyInput)));
    assert!(matches!(hufftree::compress(b""), Err(Error::EmptyInput)));
}

#[test]
fn artifact_round_trip() {
    let input = b"It was the best of times, it was the worst of times".repeat(20);
    let artifact = hufftree::compress(&input).unwrap();
    assert!(artifact.len() < input.len());
    assert_eq!(hufftree::decompress(&artifact).unwrap(), input);
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hufftree-{}-{name}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn file_round_trip() {
    let dir = scratch_dir("files");
    let original = dir.join("input.txt");
    let packed = dir.join("input.txt.hf");
    let restored = dir.join("input.txt.u");

    let input = b"Peter Piper picked a peck of pickled peppers\n".repeat(300);
    fs::write(&original, &input).unwrap();

    hufftree::compress_file(&original, &packed).unwrap();
    hufftree::decompress_file(&packed, &restored).unwrap();

    assert_eq!(fs::read(&restored).unwrap(), input);
    assert!(!dir.join("input.txt.hf.partial").exists());
    assert!(!dir.join("input.txt.u.partial").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn failed_compression_leaves_no_output() {
    let dir = scratch_dir("empty");
    let original = dir.join("empty.bin");
    let packed = dir.join("empty.bin.hf");
    fs::write(&original, b"").unwrap();

    let err = hufftree::compress_file(&original, &packed).unwrap_err();
    assert!(matches!(err, Error::EmptyInput));
    assert!(!packed.exists());
    assert!(!dir.join("empty.bin.hf.partial").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn failed_decompression_leaves_no_output() {
    let dir = scratch_dir("corrupt");
    let packed = dir.join("corrupt.hf");
    let restored = dir.join("corrupt.u");

    let mut artifact = hufftree::compress(b"aaaabbc").unwrap();
    // replace the data segment with one dangling bit
    let table_len = 4 + 3 * hufftree::codec::RECORD_SIZE;
    artifact.truncate(table_len);
    artifact.extend_from_slice(&[0x00, 1]);
    fs::write(&packed, &artifact).unwrap();

    let err = hufftree::decompress_file(&packed, &restored).unwrap_err();
    assert!(matches!(err, Error::TruncatedStream { .. }));
    assert!(!restored.exists());

    fs::remove_dir_all(&dir).unwrap();
}
