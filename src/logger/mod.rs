//! Structured logging system for tokenwatch
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tokenwatch::logger::{self, LogTag};
//!
//! logger::error(LogTag::Api, "Connection failed");
//! logger::warning(LogTag::Catalog, "Using stale token catalog");
//! logger::info(LogTag::Webhook, "Analysis stored");
//! logger::debug(LogTag::Detector, "Matched keys: ..."); // Only if --debug-detector
//! logger::verbose(LogTag::Api, "Raw payload: ...");     // Only if --verbose
//! ```
//!
//! Call [`init`] once at startup. Without it, messages still reach the console
//! with default filtering, but nothing is written to disk.

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

use std::path::Path;

/// Install the filtering configuration and start file logging in `logs_dir`
pub fn init(config: LoggerConfig, logs_dir: &Path) {
    config::set_logger_config(config);
    file::init_file_logging(logs_dir);
}

/// Log at ERROR level (always shown, critical issues)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (important issues, hidden by --quiet)
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level, only shown with the matching --debug-<module> flag
///
/// ```rust,ignore
/// // Only shown with --debug-market
/// logger::debug(LogTag::MarketData, "Cache key: 1,1027");
/// ```
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level, only shown with --verbose
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush all pending log writes
///
/// Call this during shutdown to ensure all logs are written to disk.
pub fn flush() {
    file::flush_file_logging();
}
