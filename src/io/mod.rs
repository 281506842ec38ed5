pub mod read;
pub mod fasta;
pub mod fastq;
pub mod gfa;
pub mod metadata;
