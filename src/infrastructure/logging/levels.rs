//! Severity vocabulary shared by sink configuration and the intercept bridge.

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;

/// Level used whenever a name is missing or not recognized.
pub const DEFAULT_LEVEL: Level = Level::INFO;

/// Map a level name to a tracing level.
///
/// Accepts the usual names case-insensitively, plus `SUCCESS` (info),
/// `WARNING` (warn), `CRITICAL` and `FATAL` (error). Anything else maps to
/// [`DEFAULT_LEVEL`]; this never fails.
pub fn level_from_name(name: &str) -> Level {
    match name.trim().to_ascii_uppercase().as_str() {
        "TRACE" => Level::TRACE,
        "DEBUG" => Level::DEBUG,
        "WARN" | "WARNING" => Level::WARN,
        "ERROR" | "CRITICAL" | "FATAL" => Level::ERROR,
        _ => DEFAULT_LEVEL,
    }
}

/// Map a `log` crate level to the equivalent tracing level.
pub const fn level_from_log(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::ERROR,
        log::Level::Warn => Level::WARN,
        log::Level::Info => Level::INFO,
        log::Level::Debug => Level::DEBUG,
        log::Level::Trace => Level::TRACE,
    }
}

/// `log` crate filter that lets through everything `filter` would.
pub fn log_filter_for(filter: LevelFilter) -> log::LevelFilter {
    match filter.into_level() {
        None => log::LevelFilter::Off,
        Some(Level::ERROR) => log::LevelFilter::Error,
        Some(Level::WARN) => log::LevelFilter::Warn,
        Some(Level::INFO) => log::LevelFilter::Info,
        Some(Level::DEBUG) => log::LevelFilter::Debug,
        Some(_) => log::LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_name() {
        assert_eq!(level_from_name("trace"), Level::TRACE);
        assert_eq!(level_from_name("DEBUG"), Level::DEBUG);
        assert_eq!(level_from_name("Info"), Level::INFO);
        assert_eq!(level_from_name("SUCCESS"), Level::INFO);
        assert_eq!(level_from_name("WARNING"), Level::WARN);
        assert_eq!(level_from_name("warn"), Level::WARN);
        assert_eq!(level_from_name("ERROR"), Level::ERROR);
        assert_eq!(level_from_name("CRITICAL"), Level::ERROR);
        assert_eq!(level_from_name(" fatal "), Level::ERROR);
    }

    #[test]
    fn test_unknown_level_defaults_to_info() {
        assert_eq!(level_from_name("NOTICE"), Level::INFO);
        assert_eq!(level_from_name(""), Level::INFO);
        assert_eq!(level_from_name("42"), Level::INFO);
    }

    #[test]
    fn test_level_from_log() {
        assert_eq!(level_from_log(log::Level::Error), Level::ERROR);
        assert_eq!(level_from_log(log::Level::Warn), Level::WARN);
        assert_eq!(level_from_log(log::Level::Trace), Level::TRACE);
    }

    #[test]
    fn test_log_filter_for() {
        assert_eq!(log_filter_for(LevelFilter::OFF), log::LevelFilter::Off);
        assert_eq!(log_filter_for(LevelFilter::WARN), log::LevelFilter::Warn);
        assert_eq!(log_filter_for(LevelFilter::TRACE), log::LevelFilter::Trace);
    }
}
