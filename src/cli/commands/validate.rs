//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, validate_config, TuneSpec, ValidateArgs};
use crate::optim::hpo::Bounds;

fn format_bounds(bounds: &Bounds) -> String {
    let scale = if bounds.log_scale { "log" } else { "linear" };
    format!("[{:e}, {:e}] ({scale})", bounds.low, bounds.high)
}

/// Format search configuration as a string
pub fn format_search_info(spec: &TuneSpec) -> String {
    let search = &spec.search;
    [
        format!("  Learning rate: {}", format_bounds(&search.space.learning_rate)),
        format!(
            "  Regularization strength: {}",
            format_bounds(&search.space.regularization_strength)
        ),
        format!(
            "  Budget: {} exploratory + {} guided",
            search.init_points, search.iterations
        ),
        format!("  Acquisition: {:?}", search.acquisition),
        format!("  Surrogate: {:?}", search.surrogate),
        format!("  Seed: {}", search.seed),
    ]
    .join("\n")
}

/// Format model geometry as a string
pub fn format_model_info(spec: &TuneSpec) -> String {
    let model = &spec.model;
    format!(
        "  Input: {0}x{0}x{1}\n  Classes: {2}\n  Dense units: {3}, {4}\n  Dropout: {5}",
        model.image_size,
        model.channels,
        model.classes,
        model.hidden_units,
        model.bottleneck_units,
        model.dropout
    )
}

/// Format data and training configuration as a string
pub fn format_data_info(spec: &TuneSpec) -> String {
    let mut lines = vec![format!("  Training data: {}", spec.data.train.display())];
    match &spec.data.val {
        Some(val) => lines.push(format!("  Validation data: {}", val.display())),
        None => lines.push(format!("  Validation split: {}", spec.data.validation_split)),
    }
    lines.push(format!("  Epochs: {}", spec.training.epochs));
    lines.push(format!("  Batch size: {}", spec.training.batch_size));
    lines.join("\n")
}

/// Print detailed configuration summary
pub fn print_detailed_summary(spec: &TuneSpec) {
    println!();
    println!("Configuration Summary:");
    println!("{}", format_search_info(spec));
    println!();
    println!("{}", format_model_info(spec));
    println!();
    println!("{}", format_data_info(spec));
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating config: {}", args.config.display()),
    );

    let spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    validate_config(&spec).map_err(|e| format!("Validation failed: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed {
        print_detailed_summary(&spec);
    }

    Ok(())
}
