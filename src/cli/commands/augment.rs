//! Augment command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::AugmentArgs;
use crate::data::{augment_dir, wav_duration};

pub fn run_augment(args: AugmentArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Augmenting {} at speed {:.2} into {}",
            args.src.display(),
            args.speed,
            args.out.display()
        ),
    );

    let written = augment_dir(&args.src, &args.out, args.speed, args.silence.as_deref())
        .map_err(|e| format!("Augmentation error: {e}"))?;

    if level == LogLevel::Verbose {
        for path in &written {
            let seconds = wav_duration(path).map_err(|e| format!("Audio error: {e}"))?;
            log(level, LogLevel::Verbose, &format!("  {} ({seconds:.2}s)", path.display()));
        }
    }
    log(level, LogLevel::Normal, &format!("Wrote {} files", written.len()));
    Ok(())
}
