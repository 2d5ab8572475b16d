//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::ConfigWarning;
use crate::error::{PublishError, PublishResult};

use super::env_validator::{levenshtein, EnvVarValidator};
use super::types::{Config, ScanMode};

/// Vault-level configuration file name
pub const PROJECT_CONFIG: &str = ".cartopub.toml";

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> PublishResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| PublishError::InvalidConfig {
        file: path.display().to_string(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| {
            let leaf = key.rsplit('.').next().unwrap_or(key.as_str()).to_string();
            ConfigWarning {
                file: path.to_path_buf(),
                line: find_line_number(&content, &leaf),
                suggestion: suggest_key(&leaf),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Explicit file, then `<vault>/.cartopub.toml`, then the user config,
/// then defaults. Environment overrides apply last in every case. The
/// first file found must load; later candidates are not tried.
pub fn load_for_vault(
    vault_root: &Path,
    explicit: Option<&Path>,
) -> PublishResult<(Config, Vec<ConfigWarning>)> {
    let candidates: Vec<PathBuf> = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => [Some(vault_root.join(PROJECT_CONFIG)), user_config_path()]
            .into_iter()
            .flatten()
            .filter(|p| p.exists())
            .collect(),
    };

    match candidates.first() {
        Some(path) => {
            let (config, warnings) = load_with_warnings(path)?;
            Ok((with_env_overrides(config), warnings))
        }
        None => Ok((with_env_overrides(Config::default()), Vec::new())),
    }
}

/// `<config dir>/cartopub/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cartopub").join("config.toml"))
}

/// Apply environment variable overrides (CARTOPUB_* prefix)
pub fn with_env_overrides(mut config: Config) -> Config {
    // CARTOPUB_SCAN_MODE
    if let Ok(mode) = std::env::var("CARTOPUB_SCAN_MODE") {
        config.scan.mode = EnvVarValidator::new("CARTOPUB_SCAN_MODE", &["published", "all"])
            .parse(&mode, ScanMode::parse, config.scan.mode);
    }

    // CARTOPUB_ARTIFACT_DIR
    if let Ok(dir) = std::env::var("CARTOPUB_ARTIFACT_DIR") {
        if !dir.trim().is_empty() {
            config.output.artifact_folder = dir.trim().to_string();
        }
    }

    // CARTOPUB_DEEP_LINKS
    if let Ok(val) = std::env::var("CARTOPUB_DEEP_LINKS") {
        config.links.deep = val.to_lowercase() != "false" && val != "0";
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "scan",
        "mode",
        "block_languages",
        "markers_suffix",
        "publish_key",
        "output",
        "artifact_folder",
        "manifest_path",
        "config_dir",
        "library",
        "path",
        "links",
        "deep",
        "timeline",
        "start_key",
        "end_key",
        "names_key",
        "title_key",
        "summary_key",
        "image_key",
        "settings_path",
        "months",
        "runtime",
        "target",
        "begin_sentinel",
        "end_sentinel",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}
