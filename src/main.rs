mod cli_main;

use anyhow::{Context, Result};
use clap::Parser;
use cli_main::{config_from_flags, Cli, Commands};
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use twinasm::config::AssemblyConfig;
use twinasm::eval::metrics::evaluate_lengths;
use twinasm::io::fasta::read_fasta;
use twinasm::pipeline::assemble::run_assembly;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Setting tracing default failed")?;

    match cli.command {
        Commands::Assemble {
            input,
            output,
            dbg,
            k,
            olc,
            min_overlap,
            strict_olc_alphabet,
            metadata,
            config,
        } => {
            let config = match config {
                Some(path) => AssemblyConfig::from_json_file(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => config_from_flags(output, dbg, k, olc, min_overlap, strict_olc_alphabet, metadata),
            };

            println!("Running assembly pipeline");
            let start = std::time::Instant::now();
            let runs = run_assembly(&input, &config)
                .with_context(|| format!("Assembly of {} failed", input.display()))?;

            for run in &runs {
                println!("\n{:?} ({}): {}", run.strategy, run.parameter, run.fasta.display());
                println!("{}", run.stats);
            }
            println!("Assembly completed in {:.2}s", start.elapsed().as_secs_f32());
        }

        Commands::Stats { input, json } => {
            info!("Calculating assembly statistics for: {}", input.display());
            let contigs = read_fasta(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let lengths: Vec<usize> = contigs.iter().map(|c| c.len()).collect();
            let stats = evaluate_lengths(&lengths);

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", stats);
            }
        }
    }

    Ok(())
}
