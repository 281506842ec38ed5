use crate::error::{AssemblyError, Result};
use crate::eval::metrics::AssemblyStats;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Dbg,
    Olc,
}

/// What one assembly run consumed and produced.
#[derive(Serialize, Debug, Clone)]
pub struct RunMetadata {
    pub strategy: Strategy,
    /// k for DBG runs, the requested minimum overlap for OLC runs
    pub parameter: usize,
    pub input_reads: usize,
    pub graph_nodes: usize,
    pub graph_edges: usize,
    /// OLC only: reads that overlap detection ran on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_reads: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clipped_joins: Option<usize>,
    pub stats: AssemblyStats,
    pub fasta: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gfa: Option<PathBuf>,
}

/// Write run metadata to a JSON file
pub fn write_run_metadata(runs: &[RunMetadata], output: &Path) -> Result<()> {
    let file = File::create(output).map_err(|e| AssemblyError::io(output, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, runs)?;
    writer.flush().map_err(|e| AssemblyError::io(output, e))
}
