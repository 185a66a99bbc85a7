//! Logging setup for the CLI
//!
//! Logs go to stderr so that CSV written to stdout stays clean. `RUST_LOG`
//! overrides the level picked from the command line.

use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone, Copy)]
pub struct LogConfig {
    pub level: Level,
    /// Colour the output; off when stderr is redirected
    pub with_ansi: bool,
}

impl LogConfig {
    /// Map `-q` and `-v` counts to a level
    ///
    /// - `-q`: errors only
    /// - none: info (run summary)
    /// - `-v`: debug (per group)
    /// - `-vv`: trace (per boundary case)
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        let level = if quiet {
            Level::ERROR
        } else {
            match verbose {
                0 => Level::INFO,
                1 => Level::DEBUG,
                _ => Level::TRACE,
            }
        };
        Self {
            level,
            with_ansi: io::stderr().is_terminal(),
        }
    }
}

/// Install the global subscriber; call once at startup
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string().to_lowercase()));

    let layer = fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(config.with_ansi);

    tracing_subscriber::registry().with(filter).with(layer).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_verbosity() {
        assert_eq!(LogConfig::from_verbosity(0, false).level, Level::INFO);
        assert_eq!(LogConfig::from_verbosity(1, false).level, Level::DEBUG);
        assert_eq!(LogConfig::from_verbosity(5, false).level, Level::TRACE);
        assert_eq!(LogConfig::from_verbosity(3, true).level, Level::ERROR);
    }

    #[test]
    fn test_ansi_follows_stderr() {
        let config = LogConfig::from_verbosity(0, false);
        assert_eq!(config.with_ansi, io::stderr().is_terminal());
    }
}
