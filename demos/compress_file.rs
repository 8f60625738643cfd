use std::env;
use std::fs;
use std::path::PathBuf;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set up the global logger");

    let fp = PathBuf::from(
        env::args()
            .nth(1)
            .expect("Please provide path to input file as first argument."),
    );
    let packed = fp.with_extension("hf");
    let restored = fp.with_extension("u");

    // encode scope - save artifact and a tree summary
    {
        hufftree::compress_file(&fp, &packed).expect("compression failed");

        let input = fs::read(&fp).expect("First argument was not a valid filepath.");
        let summary = hufftree::build(&input).unwrap().describe();
        info!(
            leaves = summary.leaf_count,
            nodes = summary.node_count,
            max_frequency = summary.max_frequency,
            "tree summary"
        );
        fs::write(fp.with_extension("tree.mp"), rmp_serde::to_vec(&summary).unwrap()).unwrap();
    }

    // decode scope - restore from the artifact
    {
        hufftree::decompress_file(&packed, &restored).expect("decompression failed");

        let original = fs::read(&fp).unwrap();
        let decoded = fs::read(&restored).unwrap();
        info!(
            original = original.len(),
            compressed = fs::metadata(&packed).unwrap().len(),
            matches = original == decoded,
            "round trip complete"
        );
    }
}
