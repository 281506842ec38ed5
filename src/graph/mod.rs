//! Assembly graphs and their traversals

pub mod kmer_graph;
pub mod assembler;
pub mod overlap;
pub mod traverser;
pub mod stitch;
