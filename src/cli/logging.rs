//! Logging utilities for CLI and progress output

/// Log level for CLI output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Suppress all output
    Quiet,
    /// Normal output level
    Normal,
    /// Verbose output with additional details
    Verbose,
}

/// Log a message if the current level permits it
///
/// `Normal` messages print at `Normal` and `Verbose`; `Verbose` messages
/// print only at `Verbose`.
pub fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if enabled(level, required) {
        println!("{msg}");
    }
}

fn enabled(level: LogLevel, required: LogLevel) -> bool {
    level != LogLevel::Quiet && (level == required || required == LogLevel::Normal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_suppresses_everything() {
        assert!(!enabled(LogLevel::Quiet, LogLevel::Normal));
        assert!(!enabled(LogLevel::Quiet, LogLevel::Verbose));
    }

    #[test]
    fn test_verbose_only_at_verbose() {
        assert!(enabled(LogLevel::Verbose, LogLevel::Verbose));
        assert!(enabled(LogLevel::Verbose, LogLevel::Normal));
        assert!(enabled(LogLevel::Normal, LogLevel::Normal));
        assert!(!enabled(LogLevel::Normal, LogLevel::Verbose));
    }
}
