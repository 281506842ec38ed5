//! De Bruijn graph over (k-1)-mers.
//!
//! Nodes are interned to dense `NodeId`s in first-seen order, so every walk over
//! the graph is deterministic for a given read order.

use crate::error::{AssemblyError, Result};
use crate::io::read::Read;
use crate::kmer::kmer::{split_kmer, valid_kmers};
use ahash::AHashMap;
use tracing::{debug, info};

pub type NodeId = u32;

#[derive(Debug, Clone, Default)]
pub struct KmerGraph {
    k: usize,
    index: AHashMap<String, NodeId>,
    labels: Vec<String>,
    successors: Vec<Vec<NodeId>>,
    in_degree: Vec<u32>,
    out_degree: Vec<u32>,
    /// Nodes in the order they first gained an outgoing edge
    sources: Vec<NodeId>,
    edge_count: usize,
}

impl KmerGraph {
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(AssemblyError::InvalidKmerSize { k });
        }
        Ok(Self {
            k,
            ..Default::default()
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn intern(&mut self, label: &str) -> NodeId {
        if let Some(&id) = self.index.get(label) {
            return id;
        }
        let id = self.labels.len() as NodeId;
        self.index.insert(label.to_string(), id);
        self.labels.push(label.to_string());
        self.successors.push(Vec::new());
        self.in_degree.push(0);
        self.out_degree.push(0);
        id
    }

    /// Record the edge prefix -> suffix for one k-mer. Returns false when the edge
    /// already existed; repeated observations do not change degrees.
    pub fn add_kmer(&mut self, kmer: &str) -> bool {
        debug_assert_eq!(kmer.len(), self.k);
        let (prefix, suffix) = split_kmer(kmer);
        let from = self.intern(prefix);
        let to = self.intern(suffix);

        let succ = &mut self.successors[from as usize];
        if succ.contains(&to) {
            return false;
        }
        if succ.is_empty() {
            self.sources.push(from);
        }
        succ.push(to);
        self.out_degree[from as usize] += 1;
        self.in_degree[to as usize] += 1;
        self.edge_count += 1;
        true
    }

    /// Node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        0..self.labels.len() as NodeId
    }

    /// Nodes with at least one successor, in the order each was first seen as a
    /// k-mer prefix. Differs from `nodes()` when a node shows up as a suffix first.
    pub fn nodes_with_successors(&self) -> &[NodeId] {
        &self.sources
    }

    pub fn label(&self, node: NodeId) -> &str {
        &self.labels[node as usize]
    }

    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.index.get(label).copied()
    }

    /// Distinct successors in the order their edges were first observed.
    pub fn successors(&self, node: NodeId) -> &[NodeId] {
        &self.successors[node as usize]
    }

    pub fn in_degree(&self, node: NodeId) -> u32 {
        self.in_degree[node as usize]
    }

    pub fn out_degree(&self, node: NodeId) -> u32 {
        self.out_degree[node as usize]
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_id(from), self.node_id(to)) {
            (Some(a), Some(b)) => self.successors(a).contains(&b),
            _ => false,
        }
    }

    /// All edges as (source, target), grouped by source in node order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes()
            .flat_map(move |n| self.successors(n).iter().map(move |&m| (n, m)))
    }
}

/// Build the de Bruijn graph for `reads` with k-mer size `k`.
///
/// Windows containing characters outside {A,C,G,T} are skipped individually.
pub fn build_kmer_graph(reads: &[Read], k: usize) -> Result<KmerGraph> {
    let mut graph = KmerGraph::new(k)?;
    info!("Building de Bruijn graph with k={} from {} reads", k, reads.len());

    let mut skipped_reads = 0usize;
    for read in reads {
        if read.sequence.len() < k {
            skipped_reads += 1;
            continue;
        }
        for kmer in valid_kmers(&read.sequence, k) {
            graph.add_kmer(kmer);
        }
    }

    if skipped_reads > 0 {
        debug!("{} reads shorter than k={} contributed no k-mers", skipped_reads, k);
    }
    info!(
        "Graph built with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read::reads_from_sequences;

    #[test]
    fn test_zero_k_is_rejected() {
        let reads = reads_from_sequences(&["ACGT"]);
        assert!(matches!(
            build_kmer_graph(&reads, 0),
            Err(AssemblyError::InvalidKmerSize { k: 0 })
        ));
    }

    #[test]
    fn test_scenario_nodes_and_edges() {
        let reads = reads_from_sequences(&["ACGTAC", "GTACTG", "ACTGAA"]);
        let graph = build_kmer_graph(&reads, 4).unwrap();

        for node in ["ACG", "CGT", "GTA", "TAC", "ACT", "CTG", "TGA", "GAA"] {
            assert!(graph.node_id(node).is_some(), "missing node {}", node);
        }
        assert_eq!(graph.node_count(), 8);
        // GTAC is seen in two reads but recorded once
        assert_eq!(graph.edge_count(), 7);
        assert!(graph.has_edge("GTA", "TAC"));
        assert!(graph.has_edge("TAC", "ACT"));
        assert!(!graph.has_edge("ACT", "TAC"));
    }

    #[test]
    fn test_duplicate_edges_do_not_bump_degrees() {
        let reads = reads_from_sequences(&["AAAA", "AAAA"]);
        let graph = build_kmer_graph(&reads, 3).unwrap();
        let aa = graph.node_id("AA").unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.successors(aa), &[aa]);
        assert_eq!(graph.out_degree(aa), 1);
        assert_eq!(graph.in_degree(aa), 1);
    }

    #[test]
    fn test_non_acgt_windows_are_skipped() {
        let reads = reads_from_sequences(&["ACGNTTT"]);
        let graph = build_kmer_graph(&reads, 3).unwrap();
        // ACG and TTT survive; every window touching N is dropped
        assert!(graph.has_edge("AC", "CG"));
        assert!(graph.has_edge("TT", "TT"));
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.node_id("GN").is_none());
    }

    #[test]
    fn test_short_reads_contribute_nothing() {
        let reads = reads_from_sequences(&["ACG", ""]);
        let graph = build_kmer_graph(&reads, 4).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_successor_order_is_insertion_order() {
        let reads = reads_from_sequences(&["ACT", "ACA", "ACG"]);
        let graph = build_kmer_graph(&reads, 3).unwrap();
        let ac = graph.node_id("AC").unwrap();
        let labels: Vec<_> = graph.successors(ac).iter().map(|&n| graph.label(n)).collect();
        assert_eq!(labels, vec!["CT", "CA", "CG"]);
        assert_eq!(graph.out_degree(ac), 3);
    }

    #[test]
    fn test_nodes_with_successors_follow_first_prefix_use() {
        // AT is interned as the suffix of GAT but only gains an edge from ATG
        let reads = reads_from_sequences(&["GAT", "TAT", "CCA", "ATG"]);
        let graph = build_kmer_graph(&reads, 3).unwrap();
        let labels: Vec<_> = graph
            .nodes_with_successors()
            .iter()
            .map(|&n| graph.label(n))
            .collect();
        assert_eq!(labels, vec!["GA", "TA", "CC", "AT"]);
        assert_eq!(graph.label(1), "AT");
    }
}
