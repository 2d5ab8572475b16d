//! Configuration type definitions

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ConfigWarning;
use crate::error::PublishResult;

use super::loader;

/// Which notes the scanners consider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Only notes whose frontmatter sets the publish flag
    #[default]
    Published,
    /// Every note
    All,
}

impl ScanMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "published" => Some(ScanMode::Published),
            "all" => Some(ScanMode::All),
            _ => None,
        }
    }
}

/// Source scanning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub mode: ScanMode,

    /// Fenced-block info strings that declare a map
    #[serde(default = "default_block_languages")]
    pub block_languages: Vec<String>,

    /// Appended to the base image path when a block names no marker set
    #[serde(default = "default_markers_suffix")]
    pub markers_suffix: String,

    /// Frontmatter key of the publish flag
    #[serde(default = "default_publish_key")]
    pub publish_key: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::default(),
            block_languages: default_block_languages(),
            markers_suffix: default_markers_suffix(),
            publish_key: default_publish_key(),
        }
    }
}

fn default_block_languages() -> Vec<String> {
    vec!["zoommap".to_string()]
}

fn default_markers_suffix() -> String {
    ".markers.json".to_string()
}

fn default_publish_key() -> String {
    "publish".to_string()
}

/// Where generated output goes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_artifact_folder")]
    pub artifact_folder: String,

    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,

    /// Private configuration namespace; never scanned, never published
    #[serde(default = "default_config_dir")]
    pub config_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            artifact_folder: default_artifact_folder(),
            manifest_path: default_manifest_path(),
            config_dir: default_config_dir(),
        }
    }
}

fn default_artifact_folder() -> String {
    "_publish".to_string()
}

fn default_manifest_path() -> String {
    "_publish/assets.md".to_string()
}

fn default_config_dir() -> String {
    ".obsidian".to_string()
}

/// Icon library location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    #[serde(default = "default_library_path")]
    pub path: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: default_library_path(),
        }
    }
}

fn default_library_path() -> String {
    "ZoomMap/library.json".to_string()
}

/// Link following
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Ship notes linked from markers and swap presets
    #[serde(default = "default_true")]
    pub deep: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self { deep: true }
    }
}

fn default_true() -> bool {
    true
}

/// Timeline metadata keys and month names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "default_start_key")]
    pub start_key: String,

    #[serde(default = "default_end_key")]
    pub end_key: String,

    #[serde(default = "default_names_key")]
    pub names_key: String,

    #[serde(default = "default_title_key")]
    pub title_key: String,

    #[serde(default = "default_summary_key")]
    pub summary_key: String,

    #[serde(default = "default_image_key")]
    pub image_key: String,

    /// Companion timeline-settings JSON with month tables
    #[serde(default = "default_settings_path")]
    pub settings_path: String,

    /// Month names per timeline; wins over the companion settings
    #[serde(default)]
    pub months: HashMap<String, Vec<String>>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            start_key: default_start_key(),
            end_key: default_end_key(),
            names_key: default_names_key(),
            title_key: default_title_key(),
            summary_key: default_summary_key(),
            image_key: default_image_key(),
            settings_path: default_settings_path(),
            months: HashMap::new(),
        }
    }
}

fn default_start_key() -> String {
    "start".to_string()
}

fn default_end_key() -> String {
    "end".to_string()
}

fn default_names_key() -> String {
    "timelines".to_string()
}

fn default_title_key() -> String {
    "title".to_string()
}

fn default_summary_key() -> String {
    "summary".to_string()
}

fn default_image_key() -> String {
    "image".to_string()
}

fn default_settings_path() -> String {
    ".obsidian/plugins/timelines/data.json".to_string()
}

/// Loader script injected into the publish runtime document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_runtime_target")]
    pub target: String,

    #[serde(default = "default_begin_sentinel")]
    pub begin_sentinel: String,

    #[serde(default = "default_end_sentinel")]
    pub end_sentinel: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            target: default_runtime_target(),
            begin_sentinel: default_begin_sentinel(),
            end_sentinel: default_end_sentinel(),
        }
    }
}

fn default_runtime_target() -> String {
    "publish.js".to_string()
}

fn default_begin_sentinel() -> String {
    "/* cartopub:begin */".to_string()
}

fn default_end_sentinel() -> String {
    "/* cartopub:end */".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub links: LinksConfig,

    #[serde(default)]
    pub timeline: TimelineConfig,

    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl Config {
    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> PublishResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Resolve the configuration for a vault: explicit file, vault file,
    /// user file, defaults; then environment overrides
    pub fn load_for_vault(
        vault_root: &Path,
        explicit: Option<&Path>,
    ) -> PublishResult<(Self, Vec<ConfigWarning>)> {
        loader::load_for_vault(vault_root, explicit)
    }

    /// Apply environment variable overrides (CARTOPUB_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }
}
