//! # vecdsp CLI
//!
//! Inspects the dispatch table chosen for this machine, checks every
//! compiled tier against the generic reference and smoke-runs the
//! benchmarked kernels.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// CLI tool for inspecting vecdsp kernel dispatch
#[derive(Parser)]
#[command(name = "vecdsp")]
#[command(about = "Inspect, verify and time vecdsp kernels")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show host capabilities and the tier selected per operation
    Info,

    /// Compare every supported tier against the generic reference
    Selftest {
        /// Highest tier to check (generic, sse2, neon, avx2, avx512)
        #[arg(short, long)]
        tier: Option<String>,

        /// Capabilities to treat as absent, comma separated
        #[arg(short, long)]
        disable: Option<String>,

        /// Relative tolerance
        #[arg(long, default_value = "1e-4")]
        rel: f32,

        /// Absolute tolerance
        #[arg(long, default_value = "1e-6")]
        abs: f32,

        /// Print every mismatch instead of the first few
        #[arg(short, long)]
        verbose: bool,
    },

    /// Smoke-run the benchmarked kernels on each supported tier
    Bench {
        /// Buffer length in samples
        #[arg(short, long, default_value = "4096")]
        len: usize,

        /// Operation to run (all benchmarked operations if omitted)
        #[arg(short, long)]
        op: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info => {
            println!("{}", vecdsp_dispatch::info());
            Ok(())
        }

        Commands::Selftest {
            tier,
            disable,
            rel,
            abs,
            verbose,
        } => commands::selftest::execute(tier.as_deref(), disable.as_deref(), rel, abs, verbose),

        Commands::Bench { len, op } => commands::bench::execute(len, op.as_deref()).map(|_| ()),
    }
}
