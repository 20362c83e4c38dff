#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use blockhash::{BlockConfig, DigestPipeline, DrainPolicy, Md5Digest};

fuzz_target!(|input: (u8, Vec<u8>)| {
    let (size_seed, data) = input;
    let block_size = size_seed as usize % 64 + 1;

    for drain in [DrainPolicy::Greedy, DrainPolicy::Single] {
        let config = BlockConfig::new(block_size)
            .unwrap()
            .with_workers(3)
            .with_drain(drain);
        let pipeline = DigestPipeline::new(config).unwrap();

        let mut out = Vec::new();
        let summary = pipeline.run(Cursor::new(&data), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        // Verify: one line per block, ceil(len / block_size)
        assert_eq!(lines.len(), data.len().div_ceil(block_size));
        assert_eq!(summary.blocks as usize, lines.len());
        assert_eq!(summary.bytes as usize, data.len());

        // Verify: line i is the digest of block i
        for (line, block) in lines.iter().zip(data.chunks(block_size)) {
            assert_eq!(*line, Md5Digest::hash(block).to_hex());
        }
    }
});
