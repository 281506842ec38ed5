use crate::graph::assembler::Contig;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AssemblyStats {
    pub contig_count: usize,
    pub total_length: usize,
    pub largest_contig: usize,
    pub n50: usize,
}

/// N50: the contig length at which the running total of descending lengths first
/// reaches half of the assembly length. Zero for an empty assembly.
pub fn n50(lengths: &[usize]) -> usize {
    let mut sorted = lengths.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    let total: usize = sorted.iter().sum();

    let mut acc = 0;
    sorted
        .into_iter()
        .find(|&len| {
            acc += len;
            acc * 2 >= total
        })
        .unwrap_or(0)
}

pub fn evaluate_lengths(lengths: &[usize]) -> AssemblyStats {
    AssemblyStats {
        contig_count: lengths.len(),
        total_length: lengths.iter().sum(),
        largest_contig: lengths.iter().copied().max().unwrap_or(0),
        n50: n50(lengths),
    }
}

pub fn evaluate(contigs: &[Contig]) -> AssemblyStats {
    let lengths: Vec<usize> = contigs.iter().map(|c| c.len()).collect();
    evaluate_lengths(&lengths)
}

impl fmt::Display for AssemblyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of contigs: {}", self.contig_count)?;
        writeln!(f, "Total assembly length: {}", self.total_length)?;
        writeln!(f, "Largest contig: {}", self.largest_contig)?;
        write!(f, "N50: {}", self.n50)
    }
}
