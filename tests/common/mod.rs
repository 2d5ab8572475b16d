//! Common test utilities for cartopub integration tests.
//!
//! Provides `TestVault`: a vault in a temp directory, a builder for its
//! notes, and helpers to run the `cartopub` binary against it.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// A small published map: one block, one marker set with a sticker
pub const WORLD_NOTE: &str = "---\npublish: true\n---\n# World\n\n```zoommap\nimage: Maps/world.png\n```\n";

pub const WORLD_MARKERS: &str =
    r#"{"markers": [{"type": "sticker", "stickerPath": "Stickers/ship.png", "link": "[[Harbor]]"}]}"#;

pub const LANDING_NOTE: &str =
    "---\npublish: true\ntimelines: [Main]\nstart: 1165-03-01\nend: 1165-03-03\n---\nThe fleet landed at dawn.\n";

/// Result of running the CLI
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated vault plus an isolated config home
pub struct TestVault {
    pub root: TempDir,
    pub home: TempDir,
}

impl TestVault {
    pub fn builder() -> TestVaultBuilder {
        TestVaultBuilder::default()
    }

    /// The standard fixture: map, markers, images, a timeline note
    pub fn standard() -> Self {
        Self::builder()
            .with_file("Atlas/World.md", WORLD_NOTE)
            .with_file("Maps/world.png", "png")
            .with_file("Maps/world.png.markers.json", WORLD_MARKERS)
            .with_file("Stickers/ship.png", "png")
            .with_file("Lore/Harbor.md", "# Harbor\n")
            .with_file("Events/Landing.md", LANDING_NOTE)
            .build()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        write_file(&self.path(relative), content);
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap_or_default()
    }

    /// Files directly inside `folder`, sorted
    pub fn files_in(&self, folder: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path(folder))
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.path().is_file())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        let output = Command::new(env!("CARGO_BIN_EXE_cartopub"))
            .args(args)
            .arg("--vault")
            .arg(self.root.path())
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env_remove("CARTOPUB_LOG")
            .env_remove("CARTOPUB_SCAN_MODE")
            .env_remove("CARTOPUB_ARTIFACT_DIR")
            .env_remove("CARTOPUB_DEEP_LINKS")
            .output()
            .expect("failed to run cartopub");

        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

#[derive(Default)]
pub struct TestVaultBuilder {
    files: Vec<(String, String)>,
}

impl TestVaultBuilder {
    pub fn with_file(mut self, relative: &str, content: &str) -> Self {
        self.files.push((relative.to_string(), content.to_string()));
        self
    }

    pub fn build(self) -> TestVault {
        let vault = TestVault {
            root: TempDir::new().expect("temp vault"),
            home: TempDir::new().expect("temp home"),
        };
        for (relative, content) in &self.files {
            vault.write(relative, content);
        }
        vault
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, content).expect("write fixture");
}
