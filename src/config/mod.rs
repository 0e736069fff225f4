/// Configuration system
///
/// TOML file + environment overrides, loaded once at startup.
pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::*;
pub use utils::{apply_env_overrides, get_config_clone, load_config_from_path, with_config, CONFIG_FILE_PATH};
