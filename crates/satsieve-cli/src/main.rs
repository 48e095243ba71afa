#![doc = include_str!("../README.md")]

mod cli;
mod commands;
mod types;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::generate::{run_generate, GenerateArgs};
use commands::stress::{run_stress, StressArgs};

fn main() -> miette::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            logic,
            vars,
            bv_width,
            seed,
            bv_unsigned,
            bv_no_overflow,
            bv_no_underflow,
            out,
        } => run_generate(GenerateArgs {
            logic,
            vars,
            bv_width,
            seed,
            bv_unsigned,
            bv_no_overflow,
            bv_no_underflow,
            out,
        }),
        Commands::Stress {
            trials,
            logic,
            solver,
            timeout,
            seed,
            format,
            out,
            bv_width,
        } => run_stress(StressArgs {
            trials,
            logic,
            solver,
            timeout,
            seed,
            format,
            out,
            bv_width,
        }),
    }
}
