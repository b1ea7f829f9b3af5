//! Logging configuration for the calculator.
//!
//! Log lines go to stderr so stdout carries only the report.

use chrono::Local;
use env_logger::{Builder, Env, Target};
use log::debug;
#[cfg(test)]
use log::LevelFilter;
use std::io::Write;

/// Initialize the logging system
pub fn init_logging(level: &str) {
    let env = Env::default()
        .filter_or("LEVERCALC_LOG", level)
        .write_style_or("LEVERCALC_LOG_STYLE", "auto");

    Builder::from_env(env)
        .format(|buf, record| {
            let level = record.level();
            let level_color = match level {
                | log::Level::Error => "\x1b[31m", // Red
                | log::Level::Warn => "\x1b[33m",  // Yellow
                | log::Level::Info => "\x1b[32m",  // Green
                | log::Level::Debug => "\x1b[36m", // Cyan
                | log::Level::Trace => "\x1b[35m", // Magenta
            };
            let reset = "\x1b[0m";

            writeln!(
                buf,
                "{} {}{:5}{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                level_color,
                level,
                reset,
                record.target(),
                record.args()
            )
        })
        .target(Target::Stderr)
        .try_init()
        .ok();

    debug!("Logging initialized at level: {}", level);
}

/// Log level for the CLI verbosity flag
pub fn level_for(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Initialize test logging (for use in tests)
#[cfg(test)]
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).filter_level(LevelFilter::Debug).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{debug, error, info, warn};

    #[test]
    fn test_logging() {
        // Visual test - run with `cargo test -- --nocapture` to see the output
        init_logging("debug");

        error!("This is an error message");
        warn!("This is a warning message");
        info!("This is an info message");
        debug!("This is a debug message");
    }

    #[test]
    fn test_level_for() {
        init_test_logging();
        assert_eq!(level_for(true), "debug");
        assert_eq!(level_for(false), "warn");
    }
}
