/// Command-line arguments for the tokenwatch binary
///
/// Debug output is enabled per subsystem with `--debug-<module>` flags, which
/// map one-to-one onto logger tags.
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "tokenwatch", version, about = "Crypto token mention detection webhook service")]
pub struct Arguments {
    /// Path to the TOML configuration file
    #[arg(long, default_value = crate::config::CONFIG_FILE_PATH)]
    pub config: PathBuf,

    /// Base directory for data and logs (defaults to the platform data dir)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Override the configured bind host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the configured bind port
    #[arg(long)]
    pub port: Option<u16>,

    /// Show verbose output for every module
    #[arg(long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    #[arg(long)]
    pub debug_all: bool,
    #[arg(long)]
    pub debug_api: bool,
    #[arg(long)]
    pub debug_catalog: bool,
    #[arg(long)]
    pub debug_detector: bool,
    #[arg(long)]
    pub debug_market: bool,
    #[arg(long)]
    pub debug_ai: bool,
    #[arg(long)]
    pub debug_storage: bool,
    #[arg(long)]
    pub debug_webserver: bool,
    #[arg(long)]
    pub debug_webhook: bool,
}

impl Arguments {
    /// Logger keys for every `--debug-<module>` flag that was passed
    pub fn debug_keys(&self) -> Vec<String> {
        let flags = [
            (self.debug_all, "all"),
            (self.debug_api, "api"),
            (self.debug_catalog, "catalog"),
            (self.debug_detector, "detector"),
            (self.debug_market, "market"),
            (self.debug_ai, "ai"),
            (self.debug_storage, "storage"),
            (self.debug_webserver, "webserver"),
            (self.debug_webhook, "webhook"),
        ];

        flags
            .iter()
            .filter(|(enabled, _)| *enabled)
            .map(|(_, key)| key.to_string())
            .collect()
    }
}
