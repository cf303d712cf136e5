//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! afinar tune tune.yaml --output report.json
//! afinar tune tune.yaml --init-points 2 --iterations 3 --dry-run
//! afinar validate tune.yaml --detailed
//! afinar info tune.yaml
//! afinar augment dataset/wav dataset/tempWav --speed 1.25 --silence dataset/silent.wav
//! ```

mod core;

pub use core::{
    apply_overrides, parse_args, AugmentArgs, Cli, Command, InfoArgs, TuneArgs, ValidateArgs,
};
