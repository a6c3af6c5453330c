//! Logging setup for `horizon` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag or `HORIZON_LOG` environment variable
//! 2. `--verbose` (debug)
//! 3. `log_level` in the global config
//! 4. default to `warn`
//!
//! Logs are written to stderr so `--format json` output stays parseable.

use tracing_subscriber::fmt;

use crate::storage::LogLevel;

/// Picks the effective level from the sources above
pub fn resolve_level(
    cli_level: Option<LogLevel>,
    verbose: bool,
    config_level: Option<LogLevel>,
) -> tracing::Level {
    match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None if verbose => tracing::Level::DEBUG,
        None => config_level
            .map(level_from_log_level)
            .unwrap_or(tracing::Level::WARN),
    }
}

/// Initialise global logging subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(level: tracing::Level) {
    let _ = fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_everything() {
        let level = resolve_level(Some(LogLevel::Error), true, Some(LogLevel::Trace));
        assert_eq!(level, tracing::Level::ERROR);
    }

    #[test]
    fn verbose_means_debug() {
        assert_eq!(resolve_level(None, true, Some(LogLevel::Error)), tracing::Level::DEBUG);
    }

    #[test]
    fn config_then_default() {
        assert_eq!(resolve_level(None, false, Some(LogLevel::Info)), tracing::Level::INFO);
        assert_eq!(resolve_level(None, false, None), tracing::Level::WARN);
    }
}
