/// Logger configuration, derived from command-line flags
use super::levels::LogLevel;
use super::tags::LogTag;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Highest level that is printed (Info by default)
    pub min_level: LogLevel,

    /// Tags with debug output enabled via --debug-<tag>
    pub debug_tags: HashSet<LogTag>,

    /// Restrict output to these tags (empty = all tags)
    pub enabled_tags: HashSet<LogTag>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
        }
    }
}

impl LoggerConfig {
    /// Build from the flag set parsed by [`crate::arguments::Arguments`]
    pub fn from_flags(verbose: bool, quiet: bool, debug_keys: &[String]) -> Self {
        let min_level = if verbose {
            LogLevel::Verbose
        } else if quiet {
            LogLevel::Error
        } else if !debug_keys.is_empty() {
            LogLevel::Debug
        } else {
            LogLevel::Info
        };

        let debug_tags = LogTag::all()
            .iter()
            .copied()
            .filter(|tag| {
                debug_keys
                    .iter()
                    .any(|key| key == "all" || key.eq_ignore_ascii_case(tag.to_debug_key()))
            })
            .collect();

        Self {
            min_level,
            debug_tags,
            enabled_tags: HashSet::new(),
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}

pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    LOGGER_CONFIG.read().debug_tags.contains(tag)
}
