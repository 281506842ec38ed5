use clap::{Parser, Subcommand};
use std::path::PathBuf;
use twinasm::config::{AlphabetPolicy, AssemblyConfig, DbgConfig, OlcConfig};

#[derive(Parser, Debug)]
#[command(name = "twinasm", version, about = "De novo assembly with de Bruijn graphs and overlap-layout-consensus", long_about = None)]
pub struct Cli {
    /// Log debug messages
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble reads into contigs
    Assemble {
        /// Input FASTQ/FASTA file, optionally gzipped
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Run the de Bruijn graph assembler
        #[arg(long)]
        dbg: bool,

        /// K-mer size; repeat for one independent run per value
        #[arg(short = 'k', long = "kmer-size", default_values_t = vec![31])]
        k: Vec<usize>,

        /// Run the overlap-layout-consensus assembler
        #[arg(long)]
        olc: bool,

        /// Minimum suffix/prefix overlap for the OLC assembler
        #[arg(long, default_value_t = 20)]
        min_overlap: usize,

        /// Drop reads with non-ACGT characters before overlap detection
        #[arg(long)]
        strict_olc_alphabet: bool,

        /// Write per-run metadata as JSON
        #[arg(long)]
        metadata: bool,

        /// JSON configuration file; replaces the strategy flags above
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Calculate statistics for an assembly FASTA
    Stats {
        /// Input FASTA file
        #[arg(short, long)]
        input: PathBuf,

        /// Print as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Translate assemble flags into a run configuration. With neither `--dbg` nor
/// `--olc`, both strategies run.
pub fn config_from_flags(
    output: PathBuf,
    dbg: bool,
    k: Vec<usize>,
    olc: bool,
    min_overlap: usize,
    strict_olc_alphabet: bool,
    metadata: bool,
) -> AssemblyConfig {
    let (dbg, olc) = if !dbg && !olc { (true, true) } else { (dbg, olc) };
    AssemblyConfig {
        dbg: dbg.then(|| DbgConfig { k_values: k }),
        olc: olc.then(|| OlcConfig {
            min_overlap,
            alphabet: if strict_olc_alphabet {
                AlphabetPolicy::Strict
            } else {
                AlphabetPolicy::Permissive
            },
        }),
        output_dir: output,
        metadata,
    }
}
