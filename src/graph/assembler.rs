// src/graph/assembler.rs
use crate::graph::kmer_graph::{KmerGraph, NodeId};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contig {
    pub id: usize,
    pub sequence: String,
    /// Graph nodes the contig was spelled from: k-mer graph node ids for DBG
    /// contigs, working-set read indices for OLC contigs.
    pub path: Vec<usize>,
}

impl Contig {
    pub fn new(id: usize, sequence: String) -> Self {
        Self {
            id,
            sequence,
            path: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Visited bookkeeping for one contig extraction call.
struct ContigWalk<'g> {
    graph: &'g KmerGraph,
    visited: Vec<bool>,
}

impl<'g> ContigWalk<'g> {
    fn new(graph: &'g KmerGraph) -> Self {
        Self {
            graph,
            visited: vec![false; graph.node_count()],
        }
    }

    /// Follow the unique-successor chain from `start`, consuming nodes as it goes.
    fn walk(&mut self, start: NodeId) -> (String, Vec<usize>) {
        let graph = self.graph;
        let mut sequence = graph.label(start).to_string();
        let mut path = vec![start as usize];
        let mut current = start;

        loop {
            self.visited[current as usize] = true;

            let next = match graph.successors(current) {
                [only] if graph.in_degree(*only) == 1 => *only,
                _ => break,
            };
            if self.visited[next as usize] {
                break;
            }
            if let Some(&last) = graph.label(next).as_bytes().last() {
                sequence.push(last as char);
            }
            path.push(next as usize);
            current = next;
        }

        (sequence, path)
    }
}

/// Nodes a contig may begin at, in the order they first gained an outgoing edge.
///
/// Branch and source points (unbalanced degrees, or no incoming edge) come
/// first; when there are none the first node with any outgoing edge is used.
pub fn start_nodes(graph: &KmerGraph) -> Vec<NodeId> {
    let candidates = graph.nodes_with_successors();
    let starts: Vec<NodeId> = candidates
        .iter()
        .copied()
        .filter(|&n| {
            let (ind, outd) = (graph.in_degree(n), graph.out_degree(n));
            ind != outd || ind == 0
        })
        .collect();

    if !starts.is_empty() {
        return starts;
    }
    candidates.iter().copied().take(1).collect()
}

/// Emit the non-branching chains of the graph as contigs of length >= k.
///
/// Greedy: a repeat can split a true contig or glue two together, and cycles with
/// no branch point yield only a single walk.
pub fn extract_contigs(graph: &KmerGraph) -> Vec<Contig> {
    info!("Finding contigs...");
    let k = graph.k();
    let mut walk = ContigWalk::new(graph);
    let mut contigs = Vec::new();

    for start in start_nodes(graph) {
        if walk.visited[start as usize] {
            continue;
        }
        let (sequence, path) = walk.walk(start);
        if sequence.len() >= k {
            contigs.push(Contig {
                id: contigs.len(),
                sequence,
                path,
            });
        }
    }

    info!("Found {} contigs", contigs.len());
    contigs
}
