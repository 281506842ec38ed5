use crate::config::AlphabetPolicy;
use crate::error::{AssemblyError, Result};
use crate::io::read::Read;
use crate::kmer::kmer::is_acgt;
use ahash::AHashMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use tracing::{debug, info};

/// Inputs with fewer reads than this are capped at `SMALL_INPUT_CAP` reads,
/// everything else at `LARGE_INPUT_CAP`.
pub const SMALL_INPUT_THRESHOLD: usize = 500;
pub const SMALL_INPUT_CAP: usize = 2000;
pub const LARGE_INPUT_CAP: usize = 500;

/// Number of leading working reads used to estimate read length.
pub const LONG_READ_SAMPLE: usize = 100;
pub const LONG_READ_MEAN_LEN: f64 = 1000.0;
pub const LONG_READ_STRIDE: usize = 10;
pub const LONG_READ_OVERLAP_FACTOR: usize = 3;

/// How many leading reads take part in overlap detection.
pub fn working_set_cap(total_reads: usize) -> usize {
    if total_reads < SMALL_INPUT_THRESHOLD {
        SMALL_INPUT_CAP
    } else {
        LARGE_INPUT_CAP
    }
}

/// Overlap search parameters derived from the working set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapParams {
    pub effective_min_overlap: usize,
    pub stride: usize,
    pub long_reads: bool,
    pub mean_sample_len: f64,
}

impl OverlapParams {
    pub fn detect(working: &[Read], min_overlap: usize) -> Self {
        let sample = &working[..working.len().min(LONG_READ_SAMPLE)];
        let mean_sample_len = if sample.is_empty() {
            0.0
        } else {
            sample.iter().map(|r| r.len()).sum::<usize>() as f64 / sample.len() as f64
        };
        let long_reads = mean_sample_len > LONG_READ_MEAN_LEN;

        if long_reads {
            OverlapParams {
                effective_min_overlap: min_overlap * LONG_READ_OVERLAP_FACTOR,
                stride: LONG_READ_STRIDE,
                long_reads,
                mean_sample_len,
            }
        } else {
            OverlapParams {
                effective_min_overlap: min_overlap,
                stride: 1,
                long_reads,
                mean_sample_len,
            }
        }
    }
}

#[inline]
fn suffix_matches_prefix(a: &[u8], b: &[u8], len: usize) -> bool {
    a[a.len() - len..] == b[..len]
}

/// Suffix/prefix overlap of `a` onto `b`.
///
/// Scans candidate lengths upward in steps of `stride` and settles on the first
/// hit; with a coarse stride the hit is refined to the longest exact match within
/// one stride on either side. The result is therefore the first hit, not the
/// longest overlap overall.
pub fn find_overlap(a: &str, b: &str, params: &OverlapParams) -> Option<usize> {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let min_len = a.len().min(b.len());
    let floor = params.effective_min_overlap;
    let stride = params.stride.max(1);

    let mut k = floor;
    while k <= min_len {
        if suffix_matches_prefix(a, b, k) {
            if stride == 1 {
                return Some(k);
            }
            let start = k.saturating_sub(stride).max(floor);
            let end = (k + stride).min(min_len);
            return (start..=end)
                .filter(|&len| suffix_matches_prefix(a, b, len))
                .max();
        }
        k += stride;
    }
    None
}

/// Directed overlap graph over the working set of reads.
///
/// Node weights are working-set read indices, edge weights overlap lengths.
/// Nodes appear in the order they were first touched by an edge.
#[derive(Debug, Clone)]
pub struct OverlapGraph {
    graph: DiGraph<usize, usize>,
    node_of: AHashMap<usize, NodeIndex>,
    reads: Vec<Read>,
    params: OverlapParams,
}

impl OverlapGraph {
    fn new(reads: Vec<Read>, params: OverlapParams) -> Self {
        Self {
            graph: DiGraph::new(),
            node_of: AHashMap::new(),
            reads,
            params,
        }
    }

    fn node(&mut self, read: usize) -> NodeIndex {
        if let Some(&idx) = self.node_of.get(&read) {
            return idx;
        }
        let idx = self.graph.add_node(read);
        self.node_of.insert(read, idx);
        idx
    }

    fn add_overlap(&mut self, from: usize, to: usize, overlap: usize) {
        let a = self.node(from);
        let b = self.node(to);
        self.graph.add_edge(a, b, overlap);
    }

    /// Reads that overlap detection ran on, in input order.
    pub fn reads(&self) -> &[Read] {
        &self.reads
    }

    pub fn params(&self) -> &OverlapParams {
        &self.params
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Working-set read indices of the graph nodes, in node order.
    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.graph.node_indices().map(move |n| self.graph[n])
    }

    pub fn in_degree(&self, read: usize) -> usize {
        self.degree(read, Direction::Incoming)
    }

    pub fn out_degree(&self, read: usize) -> usize {
        self.degree(read, Direction::Outgoing)
    }

    fn degree(&self, read: usize, dir: Direction) -> usize {
        self.node_of
            .get(&read)
            .map_or(0, |&n| self.graph.edges_directed(n, dir).count())
    }

    pub fn overlap(&self, from: usize, to: usize) -> Option<usize> {
        let a = *self.node_of.get(&from)?;
        let b = *self.node_of.get(&to)?;
        self.graph.find_edge(a, b).map(|e| self.graph[e])
    }

    /// Outgoing edges of `read` as (edge id, target read, overlap), in the order
    /// they were added.
    pub fn out_edges(&self, read: usize) -> Vec<(usize, usize, usize)> {
        let Some(&n) = self.node_of.get(&read) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(n, Direction::Outgoing)
            .map(|e| (e.id().index(), self.graph[e.target()], *e.weight()))
            .collect();
        edges.sort_unstable_by_key(|&(id, _, _)| id);
        edges
    }

    /// All edges as (source read, target read, overlap), indexed by edge id.
    pub fn edges(&self) -> Vec<(usize, usize, usize)> {
        self.graph
            .edge_indices()
            .filter_map(|e| {
                let (a, b) = self.graph.edge_endpoints(e)?;
                Some((self.graph[a], self.graph[b], self.graph[e]))
            })
            .collect()
    }
}

/// Computes pairwise overlaps between reads and builds the overlap graph.
pub struct OverlapGraphBuilder {
    min_overlap: usize,
    alphabet: AlphabetPolicy,
}

impl OverlapGraphBuilder {
    pub fn new(min_overlap: usize) -> Result<Self> {
        if min_overlap == 0 {
            return Err(AssemblyError::InvalidMinOverlap { min_overlap });
        }
        Ok(Self {
            min_overlap,
            alphabet: AlphabetPolicy::default(),
        })
    }

    pub fn with_alphabet(mut self, alphabet: AlphabetPolicy) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn min_overlap(&self) -> usize {
        self.min_overlap
    }

    /// The leading reads overlap detection will run on.
    pub fn working_set(&self, reads: &[Read]) -> Vec<Read> {
        let eligible: Vec<&Read> = match self.alphabet {
            AlphabetPolicy::Permissive => reads.iter().collect(),
            AlphabetPolicy::Strict => reads
                .iter()
                .filter(|r| is_acgt(r.sequence.as_bytes()))
                .collect(),
        };
        if eligible.len() < reads.len() {
            debug!(
                "Excluded {} reads with non-ACGT characters",
                reads.len() - eligible.len()
            );
        }

        let cap = working_set_cap(eligible.len());
        if eligible.len() > cap {
            info!("Processing {} out of {} reads to save time", cap, eligible.len());
        }
        eligible.into_iter().take(cap).cloned().collect()
    }

    /// Find all overlaps between reads.
    pub fn build_overlap_graph(&self, reads: &[Read]) -> OverlapGraph {
        let working = self.working_set(reads);
        let params = OverlapParams::detect(&working, self.min_overlap);
        info!(
            "Finding overlaps with minimum length {}...",
            params.effective_min_overlap
        );
        if params.long_reads {
            info!(
                "Detected long reads (avg length: {:.1}), using effective min overlap: {}",
                params.mean_sample_len, params.effective_min_overlap
            );
        }

        let mut found = Vec::new();
        for (i, query) in working.iter().enumerate() {
            for (j, target) in working.iter().enumerate() {
                if i == j {
                    continue;
                }
                if let Some(overlap) = find_overlap(&query.sequence, &target.sequence, &params) {
                    if overlap >= params.effective_min_overlap {
                        found.push((i, j, overlap));
                    }
                }
            }
        }

        let mut graph = OverlapGraph::new(working, params);
        for (i, j, overlap) in found {
            graph.add_overlap(i, j, overlap);
        }
        info!("Found {} overlaps", graph.edge_count());
        graph
    }
}
