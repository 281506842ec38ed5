#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use twinasm::io::read::{reads_from_sequences, Read};

/// Random genome over ACGT from a fixed seed.
pub fn random_genome(len: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let bases = ['A', 'C', 'G', 'T'];
    (0..len).map(|_| bases[rng.gen_range(0..4)]).collect()
}

/// Error-free reads tiling `genome` from the left with a fixed step.
pub fn tile_reads(genome: &str, read_len: usize, step: usize) -> Vec<Read> {
    let mut seqs = Vec::new();
    let mut start = 0;
    while start + read_len <= genome.len() {
        seqs.push(genome[start..start + read_len].to_string());
        start += step;
    }
    reads_from_sequences(&seqs)
}

/// Reads of random length and content, some containing N.
pub fn random_reads(count: usize, seed: u64) -> Vec<Read> {
    let mut rng = StdRng::seed_from_u64(seed);
    let bases = ['A', 'C', 'G', 'T', 'N'];
    let seqs: Vec<String> = (0..count)
        .map(|_| {
            let len = rng.gen_range(0..40);
            (0..len)
                .map(|_| {
                    // N roughly once every 50 bases
                    if rng.gen_range(0..50) == 0 { bases[4] } else { bases[rng.gen_range(0..4)] }
                })
                .collect()
        })
        .collect();
    reads_from_sequences(&seqs)
}
