#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates time rider environments.

mod config;
mod output;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use time_riders_system_assembler::{generate_batch, EnvironmentAssembler};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::GridArgs,
    output::{batch_file_name, write_environment, DEFAULT_FILE_NAME},
};

const DEFAULT_SEED: u64 = 10;

/// Procedural generator for multi-rider grid environments.
#[derive(Debug, Parser)]
#[command(name = "time-riders", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generates a single environment and prints its encoding.
    Generate(GenerateArgs),
    /// Generates several environments and reports the success rate.
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[command(flatten)]
    grid: GridArgs,
    /// Seed driving every random decision.
    #[arg(long)]
    seed: Option<u64>,
    /// Directory the encoded environment is written to.
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Name of the written file.
    #[arg(long, default_value = DEFAULT_FILE_NAME)]
    file_name: String,
}

#[derive(Debug, Args)]
struct BatchArgs {
    #[command(flatten)]
    grid: GridArgs,
    /// Number of environments to generate.
    #[arg(long, default_value_t = 10)]
    count: usize,
    /// Largest number of seeds to try before giving up.
    #[arg(long, default_value_t = 1_000)]
    max_attempts: usize,
    /// Seed of the first attempt; later attempts increment it.
    #[arg(long)]
    seed: Option<u64>,
    /// Directory the encoded environments are written to.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

/// Entry point for the time rider command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Generate(args) => run_generate(args),
        Command::Batch(args) => run_batch(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let settings = args.grid.resolve()?;
    let seed = args.seed.or(settings.seed).unwrap_or(DEFAULT_SEED);
    let assembler = EnvironmentAssembler::new(settings.generation)?;

    let environment = match assembler.generate(seed) {
        Ok(environment) => environment,
        Err(error) if error.is_recoverable() => {
            bail!("seed {seed} produced no valid environment: {error}; retry with another seed")
        }
        Err(error) => return Err(error).context("environment generation failed"),
    };
    let text = time_riders_text::encode(environment.grid())?;
    print!("{text}");

    if let Some(directory) = args.out_dir.or(settings.out_dir) {
        let path = write_environment(&directory, &args.file_name, &text)?;
        info!(path = %path.display(), "environment written");
    }

    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<()> {
    let settings = args.grid.resolve()?;
    let seed = args.seed.or(settings.seed).unwrap_or(DEFAULT_SEED);
    let out_dir = args.out_dir.or(settings.out_dir);

    let report = generate_batch(settings.generation, args.count, seed, args.max_attempts)?;

    for (index, entry) in report.environments.iter().enumerate() {
        let text = time_riders_text::encode(entry.environment.grid())?;
        match &out_dir {
            Some(directory) => {
                let path = write_environment(directory, &batch_file_name(index), &text)?;
                info!(seed = entry.seed, path = %path.display(), "environment written");
            }
            None => println!("# seed {}\n{text}", entry.seed),
        }
    }

    println!(
        "generated {}/{} environments in {} attempts ({:.1}% success)",
        report.environments.len(),
        report.requested,
        report.attempts,
        report.success_rate()
    );

    if !report.is_complete() {
        bail!(
            "only {} of {} environments generated within {} attempts",
            report.environments.len(),
            report.requested,
            args.max_attempts
        );
    }

    Ok(())
}
