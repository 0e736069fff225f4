/// Subsystem tags attached to every log line
///
/// Each tag maps to a `--debug-<key>` command-line flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Webserver,
    Webhook,
    Api,
    Catalog,
    Detector,
    MarketData,
    Ai,
    Storage,
}

impl LogTag {
    /// Key used by `--debug-<key>` flags
    pub fn to_debug_key(&self) -> &'static str {
        match self {
            LogTag::System => "system",
            LogTag::Config => "config",
            LogTag::Webserver => "webserver",
            LogTag::Webhook => "webhook",
            LogTag::Api => "api",
            LogTag::Catalog => "catalog",
            LogTag::Detector => "detector",
            LogTag::MarketData => "market",
            LogTag::Ai => "ai",
            LogTag::Storage => "storage",
        }
    }

    /// Uppercase label without colors, used for the log file
    pub fn to_plain_string(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Webserver => "WEBSERVER",
            LogTag::Webhook => "WEBHOOK",
            LogTag::Api => "API",
            LogTag::Catalog => "CATALOG",
            LogTag::Detector => "DETECTOR",
            LogTag::MarketData => "MARKET",
            LogTag::Ai => "AI",
            LogTag::Storage => "STORAGE",
        }
    }

    pub fn all() -> &'static [LogTag] {
        &[
            LogTag::System,
            LogTag::Config,
            LogTag::Webserver,
            LogTag::Webhook,
            LogTag::Api,
            LogTag::Catalog,
            LogTag::Detector,
            LogTag::MarketData,
            LogTag::Ai,
            LogTag::Storage,
        ]
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
