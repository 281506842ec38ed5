use std::fs::File;
use std::io::{BufWriter, Result, Write};
use std::path::Path;

use crate::error::AssemblyError;
use crate::graph::kmer_graph::KmerGraph;

/// Writes a de Bruijn graph as GFA 1.0: one segment per (k-1)-mer named by its
/// own sequence, one link per edge.
pub struct GfaWriter<W: Write> {
    writer: W,
}

impl GfaWriter<BufWriter<File>> {
    pub fn create(output_path: &Path) -> crate::error::Result<Self> {
        let file = File::create(output_path).map_err(|e| AssemblyError::io(output_path, e))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> GfaWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_header(&mut self) -> Result<()> {
        writeln!(self.writer, "H\tVN:Z:1.0")
    }

    /// Write segments (nodes) in insertion order
    pub fn write_segments(&mut self, graph: &KmerGraph) -> Result<()> {
        for node in graph.nodes() {
            let label = graph.label(node);
            writeln!(self.writer, "S\t{}\t{}", label, label)?;
        }
        Ok(())
    }

    /// Write links (edges); the overlap column is `<k-1>M`
    pub fn write_links(&mut self, graph: &KmerGraph) -> Result<()> {
        let overlap = graph.k().saturating_sub(1);
        for (from, to) in graph.edges() {
            writeln!(
                self.writer,
                "L\t{}\t+\t{}\t+\t{}M",
                graph.label(from),
                graph.label(to),
                overlap
            )?;
        }
        Ok(())
    }

    pub fn write_graph(&mut self, graph: &KmerGraph) -> Result<()> {
        self.write_header()?;
        self.write_segments(graph)?;
        self.write_links(graph)?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Write `graph` to `path` in GFA format.
pub fn write_gfa(graph: &KmerGraph, path: &Path) -> crate::error::Result<()> {
    let mut writer = GfaWriter::create(path)?;
    writer
        .write_graph(graph)
        .map_err(|e| AssemblyError::io(path, e))
}
