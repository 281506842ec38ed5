use crate::graph::overlap::OverlapGraph;
use ahash::AHashMap;
use tracing::{info, warn};

/// An ordered walk through the overlap graph, as working-set read indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPath {
    pub reads: Vec<usize>,
}

impl ReadPath {
    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    /// Consecutive (from, to) read pairs, i.e. the edges the path traverses.
    pub fn steps(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.reads.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Visited-edge bookkeeping for one path cover computation.
struct PathCover {
    /// (edge id, target, overlap) per source read, in edge insertion order
    out_edges: AHashMap<usize, Vec<(usize, usize, usize)>>,
    visited: Vec<bool>,
    /// Every edge below this id is already visited
    cursor: usize,
    paths: Vec<ReadPath>,
}

impl PathCover {
    fn new(graph: &OverlapGraph) -> Self {
        let out_edges = graph
            .nodes()
            .map(|read| (read, graph.out_edges(read)))
            .collect();
        Self {
            out_edges,
            visited: vec![false; graph.edge_count()],
            cursor: 0,
            paths: Vec::new(),
        }
    }

    /// Heaviest unvisited outgoing edge of `read`; ties go to the earliest edge.
    fn best_edge(&self, read: usize) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize, usize)> = None;
        for &(id, target, overlap) in self.out_edges.get(&read).into_iter().flatten() {
            if self.visited[id] {
                continue;
            }
            if best.map_or(true, |(_, _, w)| overlap > w) {
                best = Some((id, target, overlap));
            }
        }
        best.map(|(id, target, _)| (id, target))
    }

    /// Grow `path` greedily from its last read and record it if it has an edge.
    ///
    /// A target already on the path is still appended so the closing edge stays
    /// covered, then extension stops.
    fn extend(&mut self, mut path: Vec<usize>) {
        while let Some(&current) = path.last() {
            let Some((edge, target)) = self.best_edge(current) else {
                break;
            };
            self.visited[edge] = true;
            let revisit = path.contains(&target);
            path.push(target);
            if revisit {
                break;
            }
        }

        if path.len() > 1 {
            self.paths.push(ReadPath { reads: path });
        }
    }

    fn next_unvisited_edge(&mut self) -> Option<usize> {
        while self.cursor < self.visited.len() && self.visited[self.cursor] {
            self.cursor += 1;
        }
        (self.cursor < self.visited.len()).then_some(self.cursor)
    }
}

/// Reads to seed paths from, by priority: sources (no incoming edge); else reads
/// with fewer incoming than outgoing edges; else the first read of maximum
/// out-degree; else the first read.
pub fn start_nodes(graph: &OverlapGraph) -> Vec<usize> {
    let sources: Vec<usize> = graph.nodes().filter(|&n| graph.in_degree(n) == 0).collect();
    if !sources.is_empty() {
        return sources;
    }

    let unbalanced: Vec<usize> = graph
        .nodes()
        .filter(|&n| graph.in_degree(n) < graph.out_degree(n))
        .collect();
    if !unbalanced.is_empty() {
        return unbalanced;
    }

    let mut hub: Option<(usize, usize)> = None;
    for n in graph.nodes() {
        let out = graph.out_degree(n);
        if out > 0 && hub.map_or(true, |(_, best)| out > best) {
            hub = Some((n, out));
        }
    }
    match hub {
        Some((n, _)) => vec![n],
        None => graph.nodes().take(1).collect(),
    }
}

/// Cover every overlap edge exactly once with greedy maximum-overlap paths.
///
/// Paths are seeded from `start_nodes` first, then from whichever edge is still
/// unvisited, lowest edge id first. Only paths of two or more reads are returned.
pub fn find_paths(graph: &OverlapGraph) -> Vec<ReadPath> {
    info!("Finding paths in the overlap graph...");
    if graph.is_empty() {
        warn!("Overlap graph is empty, no paths to find");
        return Vec::new();
    }

    let mut cover = PathCover::new(graph);
    for start in start_nodes(graph) {
        cover.extend(vec![start]);
    }

    let edges = graph.edges();
    while let Some(edge) = cover.next_unvisited_edge() {
        let (source, target, _) = edges[edge];
        cover.visited[edge] = true;
        cover.extend(vec![source, target]);
    }

    info!("Found {} paths", cover.paths.len());
    cover.paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::overlap::OverlapGraphBuilder;
    use crate::io::read::reads_from_sequences;
    use std::collections::HashSet;

    fn graph_for(seqs: &[&str], min_overlap: usize) -> OverlapGraph {
        OverlapGraphBuilder::new(min_overlap)
            .unwrap()
            .build_overlap_graph(&reads_from_sequences(seqs))
    }

    fn assert_partition(graph: &OverlapGraph, paths: &[ReadPath]) {
        let mut seen = HashSet::new();
        for path in paths {
            assert!(path.len() >= 2);
            for step in path.steps() {
                assert!(graph.overlap(step.0, step.1).is_some(), "not an edge: {:?}", step);
                assert!(seen.insert(step), "edge used twice: {:?}", step);
            }
        }
        assert_eq!(seen.len(), graph.edge_count());
    }

    #[test]
    fn test_empty_graph_has_no_paths() {
        let graph = graph_for(&[], 3);
        assert!(find_paths(&graph).is_empty());
    }

    #[test]
    fn test_linear_chain_is_one_path() {
        let graph = graph_for(&["AAAACCCC", "CCCCGGGG", "GGGGTTTT"], 4);
        let paths = find_paths(&graph);
        assert_eq!(paths, vec![ReadPath { reads: vec![0, 1, 2] }]);
        assert_partition(&graph, &paths);
    }

    #[test]
    fn test_heaviest_edge_is_followed_first() {
        // read 0 overlaps read 1 by 5 and read 2 by 3
        let graph = graph_for(&["TTTTTACGTA", "ACGTAGGGGG", "GTACCCCCCC"], 3);
        assert_eq!(graph.overlap(0, 1), Some(5));
        assert_eq!(graph.overlap(0, 2), Some(3));

        let paths = find_paths(&graph);
        assert_eq!(paths[0].reads, vec![0, 1]);
        assert_partition(&graph, &paths);
    }

    #[test]
    fn test_cycle_is_closed_and_covered() {
        // 0 -> 1 -> 2 -> 0, every read with one edge in and one out
        let graph = graph_for(&["AAACCC", "CCCGGG", "GGGAAA"], 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(start_nodes(&graph), vec![0]);

        let paths = find_paths(&graph);
        assert_eq!(paths, vec![ReadPath { reads: vec![0, 1, 2, 0] }]);
        assert_partition(&graph, &paths);
    }

    #[test]
    fn test_leftover_edges_get_their_own_paths() {
        // 0 branches to 1 and 2; the lighter branch is picked up afterwards
        let graph = graph_for(&["GGGGACGTA", "ACGTATTTT", "GTACCCCC"], 3);
        let paths = find_paths(&graph);
        assert_partition(&graph, &paths);
        assert!(paths.len() >= 2);
    }

    #[test]
    fn test_balanced_graph_starts_at_busiest_read() {
        // 0 <-> 1 and 0 <-> 2: no sources, no read with more out- than in-edges
        let graph = graph_for(&["AAAATTTT", "TTTTAAAA", "TTTTCAAAA"], 4);
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.nodes().all(|n| graph.in_degree(n) == graph.out_degree(n)));
        assert_eq!(start_nodes(&graph), vec![0]);

        let paths = find_paths(&graph);
        assert_eq!(
            paths,
            vec![
                ReadPath { reads: vec![0, 1, 0] },
                ReadPath { reads: vec![0, 2, 0] },
            ]
        );
        assert_partition(&graph, &paths);
    }

    #[test]
    fn test_no_source_starts_at_read_with_surplus_out_edges() {
        // 0 -> 1, 0 -> 2, 1 -> 0, 2 -> 1: every read has an incoming edge and
        // only read 0 has more outgoing than incoming
        let graph = graph_for(&["AAAACCCC", "CCCCAAAA", "CCCCGCCCC"], 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.overlap(0, 1), Some(4));
        assert_eq!(graph.overlap(0, 2), Some(4));
        assert_eq!(graph.overlap(1, 0), Some(4));
        assert_eq!(graph.overlap(2, 1), Some(4));
        assert!(graph.nodes().all(|n| graph.in_degree(n) > 0));
        assert_eq!(start_nodes(&graph), vec![0]);

        let paths = find_paths(&graph);
        assert_eq!(
            paths,
            vec![
                ReadPath { reads: vec![0, 1, 0] },
                ReadPath { reads: vec![0, 2, 1] },
            ]
        );
        assert_partition(&graph, &paths);
    }
}
