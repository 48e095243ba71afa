//! CLI argument definitions: top-level `Cli` struct and `Commands` enum.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub(crate) const CLI_LONG_ABOUT: &str =
    "Stress-testing toolkit for SMT solver pipelines.\n\n\
    Typical usage:\n  \
    1. satsieve generate --logic int --seed 7 > case.smt2\n  \
    2. satsieve stress --trials 50 --solver cvc5 --format json --out report.json\n\n\
    `generate` emits one random well-typed SMT-LIB2 script.\n\
    `stress` compares the batched classification strategies against the\n\
    naive one-check-per-candidate baseline on random inputs.";

#[derive(Parser)]
#[command(name = "satsieve")]
#[command(about = "Batch satisfiability classification and SMT formula fuzzing")]
#[command(long_about = CLI_LONG_ABOUT)]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Emit one random SMT-LIB2 script
    #[command(display_order = 10)]
    Generate {
        /// Theory for the seed variables: int | real | bv
        #[arg(long, default_value = "int")]
        logic: String,

        /// Number of seed variables
        #[arg(long, default_value_t = 2)]
        vars: usize,

        /// Bit-vector width for `--logic bv`
        #[arg(long, default_value_t = 32)]
        bv_width: u32,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Interpret bit-vector comparisons and division as unsigned
        #[arg(long, default_value_t = false)]
        bv_unsigned: bool,

        /// Capture no-overflow side-conditions for bit-vector arithmetic
        #[arg(long, default_value_t = false)]
        bv_no_overflow: bool,

        /// Capture no-underflow side-conditions for bit-vector arithmetic
        #[arg(long, default_value_t = false)]
        bv_no_underflow: bool,

        /// Write the script here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Differential stress test of the classification strategies
    #[command(display_order = 20)]
    Stress {
        /// Number of random trials
        #[arg(long, default_value_t = 10)]
        trials: usize,

        /// Theory for the generated formulas: int | real | bv
        #[arg(long, default_value = "int")]
        logic: String,

        /// Solver backend to use: cvc5 | z3
        #[arg(long, default_value = "cvc5")]
        solver: String,

        /// Per-check solver timeout in seconds (0 disables)
        #[arg(long, default_value_t = 0)]
        timeout: u64,

        /// RNG seed for reproducible trials
        #[arg(long)]
        seed: Option<u64>,

        /// Report format: text | json
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the report here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Bit-vector width for `--logic bv`
        #[arg(long, default_value_t = 32)]
        bv_width: u32,
    },
}
