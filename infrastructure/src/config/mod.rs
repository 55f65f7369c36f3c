//! Configuration loading for mindcare
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MINDCARE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./mindcare.toml` or `./.mindcare.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/mindcare/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileGeminiConfig, FileLoggingConfig, FileRelayConfig, FileServerConfig,
    FileSessionsConfig, SAFETY_THRESHOLDS,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
