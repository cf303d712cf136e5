//! Core CLI types - Cli, Command, and argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::TuneSpec;

/// Afinar: Bayesian hyperparameter search for a convolutional letter classifier
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "afinar")]
#[command(version)]
#[command(
    about = "Bayesian hyperparameter search over learning rate and L2 strength for a fixed CNN"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the hyperparameter search from a YAML configuration
    Tune(TuneArgs),

    /// Validate a configuration file without training
    Validate(ValidateArgs),

    /// Display the classifier architecture for a configuration
    Info(InfoArgs),

    /// Write speed-changed copies of every WAV file in a directory
    Augment(AugmentArgs),
}

/// Arguments for the tune command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TuneArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Write the JSON search report here
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the search seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the number of exploratory evaluations
    #[arg(long)]
    pub init_points: Option<usize>,

    /// Override the number of guided evaluations
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Override epochs per trial
    #[arg(short, long)]
    pub epochs: Option<usize>,

    /// Dry run (validate config but don't train)
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show detailed validation report
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

/// Arguments for the augment command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct AugmentArgs {
    /// Directory searched recursively for .wav files
    #[arg(value_name = "SRC")]
    pub src: PathBuf,

    /// Output root; files land in OUT/<parent dir>/
    #[arg(value_name = "OUT")]
    pub out: PathBuf,

    /// Sample-rate multiplier
    #[arg(short, long)]
    pub speed: f64,

    /// Silence clip appended before the speed change
    #[arg(long)]
    pub silence: Option<PathBuf>,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a TuneSpec
pub fn apply_overrides(spec: &mut TuneSpec, args: &TuneArgs) {
    if let Some(seed) = args.seed {
        spec.search.seed = seed;
    }
    if let Some(init_points) = args.init_points {
        spec.search.init_points = init_points;
    }
    if let Some(iterations) = args.iterations {
        spec.search.iterations = iterations;
    }
    if let Some(epochs) = args.epochs {
        spec.training.epochs = epochs;
    }
}
