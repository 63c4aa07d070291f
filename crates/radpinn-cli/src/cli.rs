//! CLI - Command Line Interface Definitions
//!
//! Defines the CLI structure using clap derive macros.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use radpinn_data::SamplerKind;

// =============================================================================
// Main CLI Structure
// =============================================================================

/// radpinn - Physics-informed training with residual-adaptive sampling
#[derive(Parser, Debug)]
#[command(
    name = "radpinn",
    author = "AutomataNexus Development Team",
    version,
    about = "Train PINNs with uniform and residual-adaptive collocation samplers"
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file
    Init(InitArgs),

    /// Train a model from configuration
    Train(TrainArgs),

    /// List available samplers
    Samplers,
}

/// Arguments for the `init` command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Where to write the configuration
    #[arg(short, long, default_value = "radpinn.toml")]
    pub path: PathBuf,

    /// Seed written into the configuration
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `train` command
#[derive(Parser, Debug)]
pub struct TrainArgs {
    /// Path to configuration file (defaults to ./radpinn.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of optimization steps
    #[arg(short, long)]
    pub steps: Option<usize>,

    /// Random seed (required without a configuration file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Sampler (uniform, space, time_space, rad, rad2)
    #[arg(long)]
    pub sampler: Option<SamplerKind>,

    /// Resample interval in steps
    #[arg(long)]
    pub resample_every: Option<usize>,

    /// Output directory for the report and diagnostics
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write batch and RAD distribution snapshots at resample boundaries
    #[arg(long)]
    pub plot: bool,
}
