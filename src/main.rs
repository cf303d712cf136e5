//! Afinar CLI
//!
//! # Usage
//!
//! ```bash
//! # Run the search
//! afinar tune tune.yaml --output report.json
//!
//! # Quick search with overrides
//! afinar tune tune.yaml --init-points 2 --iterations 3 --epochs 1
//!
//! # Validate config
//! afinar validate tune.yaml --detailed
//!
//! # Show the classifier architecture
//! afinar info tune.yaml
//!
//! # Speed-augment a WAV corpus
//! afinar augment dataset/wav dataset/tempWav --speed 1.25
//! ```

use afinar::cli::{run_command, Cli};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
