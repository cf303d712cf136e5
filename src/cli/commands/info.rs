//! Info command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, InfoArgs};
use crate::model::Architecture;

pub fn run_info(args: InfoArgs, level: LogLevel) -> Result<(), String> {
    let spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    let architecture = Architecture::new(spec.model).map_err(|e| format!("Model error: {e}"))?;

    log(level, LogLevel::Normal, "Classifier architecture:");
    println!("{}", architecture.summary());
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "Search: lr in [{:e}, {:e}], l2 in [{:e}, {:e}], {} evaluations",
            spec.search.space.learning_rate.low,
            spec.search.space.learning_rate.high,
            spec.search.space.regularization_strength.low,
            spec.search.space.regularization_strength.high,
            spec.search.budget()
        ),
    );

    Ok(())
}
