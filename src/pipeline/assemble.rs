use crate::config::{AlphabetPolicy, AssemblyConfig};
use crate::error::{AssemblyError, Result};
use crate::eval::metrics::{evaluate, AssemblyStats};
use crate::graph::assembler::{extract_contigs, Contig};
use crate::graph::kmer_graph::{build_kmer_graph, KmerGraph};
use crate::graph::overlap::{OverlapGraph, OverlapGraphBuilder};
use crate::graph::stitch::{Consensus, ConsensusBuilder};
use crate::graph::traverser::{find_paths, ReadPath};
use crate::io::fasta::write_contigs;
use crate::io::gfa::write_gfa;
use crate::io::metadata::{write_run_metadata, RunMetadata, Strategy};
use crate::io::read::{load_reads, Read};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// De Bruijn graph assembler for one k.
#[derive(Debug, Clone, Copy)]
pub struct DbgAssembler {
    k: usize,
}

#[derive(Debug, Clone)]
pub struct DbgAssembly {
    pub graph: KmerGraph,
    pub contigs: Vec<Contig>,
}

impl DbgAssembler {
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(AssemblyError::InvalidKmerSize { k });
        }
        Ok(Self { k })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn assemble(&self, reads: &[Read]) -> Result<DbgAssembly> {
        let graph = build_kmer_graph(reads, self.k)?;
        let contigs = extract_contigs(&graph);
        Ok(DbgAssembly { graph, contigs })
    }
}

/// Overlap-layout-consensus assembler for one minimum overlap.
pub struct OlcAssembler {
    builder: OverlapGraphBuilder,
}

#[derive(Debug, Clone)]
pub struct OlcAssembly {
    pub graph: OverlapGraph,
    pub paths: Vec<ReadPath>,
    pub consensus: Consensus,
}

impl OlcAssembly {
    pub fn contigs(&self) -> &[Contig] {
        &self.consensus.contigs
    }
}

impl OlcAssembler {
    pub fn new(min_overlap: usize) -> Result<Self> {
        Ok(Self {
            builder: OverlapGraphBuilder::new(min_overlap)?,
        })
    }

    pub fn with_alphabet(self, alphabet: AlphabetPolicy) -> Self {
        Self {
            builder: self.builder.with_alphabet(alphabet),
        }
    }

    pub fn min_overlap(&self) -> usize {
        self.builder.min_overlap()
    }

    pub fn assemble(&self, reads: &[Read]) -> OlcAssembly {
        let graph = self.builder.build_overlap_graph(reads);
        let paths = find_paths(&graph);
        let consensus = ConsensusBuilder::new(&graph).build(&paths, reads);
        OlcAssembly {
            graph,
            paths,
            consensus,
        }
    }
}

/// Input file name up to its first '.', used to name the outputs.
pub fn input_basename(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("reads")
        .to_string()
}

pub fn dbg_outputs(output_dir: &Path, basename: &str, k: usize) -> (PathBuf, PathBuf) {
    (
        output_dir.join(format!("{}_dbg_k{}.fasta", basename, k)),
        output_dir.join(format!("{}_dbg_k{}.gfa", basename, k)),
    )
}

pub fn olc_output(output_dir: &Path, basename: &str, min_overlap: usize) -> PathBuf {
    output_dir.join(format!("{}_olc_o{}.fasta", basename, min_overlap))
}

fn log_stats(label: &str, stats: &AssemblyStats) {
    info!(
        "{}: {} contigs, total length {}, largest {}, N50 {}",
        label, stats.contig_count, stats.total_length, stats.largest_contig, stats.n50
    );
}

/// Run every configured strategy over `reads`, writing outputs under
/// `config.output_dir`. Each k and the OLC run are independent of each other.
pub fn assemble_reads(
    reads: &[Read],
    basename: &str,
    config: &AssemblyConfig,
) -> Result<Vec<RunMetadata>> {
    config.validate()?;
    let output_dir = config.output_dir.as_path();
    fs::create_dir_all(output_dir).map_err(|e| AssemblyError::io(output_dir, e))?;

    let mut runs = Vec::new();

    if let Some(dbg) = &config.dbg {
        for &k in &dbg.k_values {
            let start = Instant::now();
            let assembly = DbgAssembler::new(k)?.assemble(reads)?;
            let (fasta, gfa) = dbg_outputs(output_dir, basename, k);
            write_contigs(&fasta, &assembly.contigs)?;
            write_gfa(&assembly.graph, &gfa)?;

            let stats = evaluate(&assembly.contigs);
            log_stats(&format!("DBG k={}", k), &stats);
            info!(
                "Contigs written to {}, graph written to {} ({:.2}s)",
                fasta.display(),
                gfa.display(),
                start.elapsed().as_secs_f32()
            );

            runs.push(RunMetadata {
                strategy: Strategy::Dbg,
                parameter: k,
                input_reads: reads.len(),
                graph_nodes: assembly.graph.node_count(),
                graph_edges: assembly.graph.edge_count(),
                working_reads: None,
                paths: None,
                clipped_joins: None,
                stats,
                fasta,
                gfa: Some(gfa),
            });
        }
    }

    if let Some(olc) = &config.olc {
        let start = Instant::now();
        let assembler = OlcAssembler::new(olc.min_overlap)?.with_alphabet(olc.alphabet);
        let assembly = assembler.assemble(reads);
        let fasta = olc_output(output_dir, basename, olc.min_overlap);
        write_contigs(&fasta, assembly.contigs())?;

        let stats = evaluate(assembly.contigs());
        log_stats(&format!("OLC min_overlap={}", olc.min_overlap), &stats);
        info!(
            "Contigs written to {} ({:.2}s)",
            fasta.display(),
            start.elapsed().as_secs_f32()
        );

        runs.push(RunMetadata {
            strategy: Strategy::Olc,
            parameter: olc.min_overlap,
            input_reads: reads.len(),
            graph_nodes: assembly.graph.node_count(),
            graph_edges: assembly.graph.edge_count(),
            working_reads: Some(assembly.graph.reads().len()),
            paths: Some(assembly.paths.len()),
            clipped_joins: Some(assembly.consensus.clipped_joins),
            stats,
            fasta,
            gfa: None,
        });
    }

    if config.metadata {
        let path = output_dir.join(format!("{}_runs.json", basename));
        write_run_metadata(&runs, &path)?;
        info!("Run metadata written to {}", path.display());
    }

    Ok(runs)
}

/// Load reads from `input` and assemble them as configured.
pub fn run_assembly(input: &Path, config: &AssemblyConfig) -> Result<Vec<RunMetadata>> {
    config.validate()?;
    info!("Starting assembly from: {}", input.display());
    let reads = load_reads(input)?;
    info!("Read {} reads from {}", reads.len(), input.display());
    assemble_reads(&reads, &input_basename(input), config)
}
