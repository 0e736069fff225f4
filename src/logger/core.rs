/// Core logging implementation with automatic filtering
use super::config::{get_logger_config, is_debug_enabled_for_tag};
use super::levels::LogLevel;
use super::tags::LogTag;

/// Check if a log message should be displayed
///
/// Filtering rules:
/// 1. Errors are always shown
/// 2. Check against minimum log level threshold
/// 3. Debug level requires --debug-<module> flag for that tag
/// 4. If enabled_tags is non-empty, tag must be in the set
pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    if level == LogLevel::Error {
        return true;
    }

    let config = get_logger_config();

    if level > config.min_level {
        return false;
    }

    if level == LogLevel::Debug && config.min_level < LogLevel::Verbose {
        return is_debug_enabled_for_tag(tag);
    }

    if !config.enabled_tags.is_empty() && !config.enabled_tags.contains(tag) {
        return false;
    }

    true
}

pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    super::format::format_and_log(tag, level, message);
}

#[cfg(test)]
mod tests {
    use super::super::config::{set_logger_config, LoggerConfig};
    use super::*;

    #[test]
    fn test_filtering_rules() {
        set_logger_config(LoggerConfig::from_flags(false, false, &["catalog".to_string()]));

        assert!(should_log(&LogTag::Api, LogLevel::Error));
        assert!(should_log(&LogTag::Api, LogLevel::Info));
        assert!(should_log(&LogTag::Catalog, LogLevel::Debug));
        assert!(!should_log(&LogTag::Api, LogLevel::Debug));
        assert!(!should_log(&LogTag::Catalog, LogLevel::Verbose));

        set_logger_config(LoggerConfig::from_flags(false, true, &[]));
        assert!(!should_log(&LogTag::Api, LogLevel::Warning));
        assert!(should_log(&LogTag::Api, LogLevel::Error));

        set_logger_config(LoggerConfig::default());
    }
}
