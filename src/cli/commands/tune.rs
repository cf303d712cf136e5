//! Tune command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{apply_overrides, load_config, tune_from_spec, validate_config, TuneArgs};

pub fn run_tune(args: TuneArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Afinar: Tuning from {}", args.config.display()),
    );

    let mut spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    // Overrides go in before validation so an overridden budget is checked too
    apply_overrides(&mut spec, &args);
    validate_config(&spec).map_err(|e| format!("Validation failed: {e}"))?;

    if args.dry_run {
        log(level, LogLevel::Normal, "Dry run - config validated successfully");
        log(
            level,
            LogLevel::Verbose,
            &format!(
                "  Budget: {} exploratory + {} guided (seed {})",
                spec.search.init_points, spec.search.iterations, spec.search.seed
            ),
        );
        log(
            level,
            LogLevel::Verbose,
            &format!(
                "  Epochs: {}, batch size: {}",
                spec.training.epochs, spec.training.batch_size
            ),
        );
        return Ok(());
    }

    let report = tune_from_spec(&spec, level).map_err(|e| format!("Tuning error: {e}"))?;
    log(level, LogLevel::Normal, &report.to_string());

    if let Some(output) = &args.output {
        let json = report.to_json().map_err(|e| format!("Report error: {e}"))?;
        std::fs::write(output, json)
            .map_err(|e| format!("Failed to write {}: {e}", output.display()))?;
        log(level, LogLevel::Normal, &format!("Report written to {}", output.display()));
    }

    Ok(())
}
