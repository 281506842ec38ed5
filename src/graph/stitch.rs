use crate::graph::assembler::Contig;
use crate::graph::overlap::OverlapGraph;
use crate::graph::traverser::ReadPath;
use crate::io::read::Read;
use tracing::{info, warn};

/// Number of reads promoted to contigs when no path could be found.
pub const FALLBACK_CONTIGS: usize = 5;

/// Contigs stitched from a set of overlap paths.
#[derive(Debug, Clone, Default)]
pub struct Consensus {
    pub contigs: Vec<Contig>,
    /// Joins whose recorded overlap covered the whole target read and was clipped.
    pub clipped_joins: usize,
    /// True when the contigs are the longest input reads rather than stitched paths.
    pub fallback: bool,
}

/// Stitches reads along overlap paths using the overlap recorded on each edge.
pub struct ConsensusBuilder<'g> {
    graph: &'g OverlapGraph,
}

impl<'g> ConsensusBuilder<'g> {
    pub fn new(graph: &'g OverlapGraph) -> Self {
        Self { graph }
    }

    /// Spell one path. Returns the sequence and the number of clipped joins.
    pub fn stitch(&self, path: &ReadPath) -> (String, usize) {
        let reads = self.graph.reads();
        let Some((&first, rest)) = path.reads.split_first() else {
            return (String::new(), 0);
        };

        let mut contig = reads[first].sequence.clone();
        let mut clipped = 0;
        let mut previous = first;

        for &next in rest {
            let target = &reads[next].sequence;
            let mut overlap = match self.graph.overlap(previous, next) {
                Some(overlap) => overlap,
                None => {
                    warn!("No overlap recorded for {} -> {}, joining end to end", previous, next);
                    0
                }
            };

            if overlap >= target.len() {
                warn!(
                    "Overlap {} is >= read length {} for {}, clipping",
                    overlap,
                    target.len(),
                    reads[next].id
                );
                // keep the final character, whatever its encoded width
                overlap = target.char_indices().last().map_or(0, |(i, _)| i);
                clipped += 1;
            }

            contig.push_str(&target[overlap..]);
            previous = next;
        }

        (contig, clipped)
    }

    /// Stitch every path into a contig, in path order.
    ///
    /// With no paths but a non-empty `input`, the longest input reads stand in as
    /// contigs.
    pub fn build(&self, paths: &[ReadPath], input: &[Read]) -> Consensus {
        info!("Generating consensus sequences...");
        let mut consensus = Consensus::default();

        for path in paths {
            let (sequence, clipped) = self.stitch(path);
            consensus.clipped_joins += clipped;
            consensus.contigs.push(Contig {
                id: consensus.contigs.len(),
                sequence,
                path: path.reads.clone(),
            });
        }

        if consensus.contigs.is_empty() && !input.is_empty() {
            warn!("No paths found. Using longest reads as contigs.");
            consensus.fallback = true;
            consensus.contigs = longest_reads(input, FALLBACK_CONTIGS)
                .into_iter()
                .enumerate()
                .map(|(i, read)| Contig::new(i, read.sequence.clone()))
                .collect();
        }

        if consensus.clipped_joins > 0 {
            warn!(
                "{} joins had an overlap covering the whole read and were clipped",
                consensus.clipped_joins
            );
        }
        info!("Generated {} contigs", consensus.contigs.len());
        consensus
    }
}

/// The `n` longest reads, longest first; equal lengths keep input order.
pub fn longest_reads(reads: &[Read], n: usize) -> Vec<&Read> {
    let mut sorted: Vec<&Read> = reads.iter().collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));
    sorted.truncate(n);
    sorted
}
