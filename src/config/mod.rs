//! Configuration module for cartopub
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (CARTOPUB_*)
//! 3. Vault config (`<vault>/.cartopub.toml`) or an explicit `--config` file
//! 4. User config (`<config dir>/cartopub/config.toml`)
//! 5. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::{user_config_path, PROJECT_CONFIG};
pub use types::{
    Config, LibraryConfig, LinksConfig, OutputConfig, RuntimeConfig, ScanConfig, ScanMode,
    TimelineConfig,
};
