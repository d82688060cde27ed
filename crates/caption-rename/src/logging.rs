//! Logging initialization.
//!
//! Uses `tracing-subscriber` with human-readable or JSON output. Everything
//! goes to stderr, alongside the progress bar and per-file lines.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// `RUST_LOG` overrides `level` when set.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section, with CLI overrides.
pub fn init_from_config(
    config: &caption_rename_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let level = effective_level(&config.logging.level, verbose_override);
    let json_format = json_logs_override || config.logging.format == "json";
    init(level, json_format);
}

/// `--verbose` raises the level to debug but never lowers trace.
fn effective_level(configured: &str, verbose: bool) -> &str {
    match (verbose, configured) {
        (_, "trace") => "trace",
        (true, _) => "debug",
        (false, level) => level,
    }
}

/// HTTP client internals stay at warn unless asked for explicitly via RUST_LOG.
fn filter_directive(level: &str) -> String {
    format!("{level},hyper=warn,reqwest=warn")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_level() {
        assert_eq!(effective_level("info", false), "info");
        assert_eq!(effective_level("info", true), "debug");
        assert_eq!(effective_level("warn", true), "debug");
        assert_eq!(effective_level("trace", true), "trace");
        assert_eq!(effective_level("error", false), "error");
    }

    #[test]
    fn test_filter_directive_parses() {
        let directive = filter_directive("debug");
        assert!(directive.starts_with("debug,"));
        assert!(EnvFilter::try_new(directive).is_ok());
    }
}
