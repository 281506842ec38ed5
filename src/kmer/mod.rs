//! K-mer window helpers

pub mod kmer;
