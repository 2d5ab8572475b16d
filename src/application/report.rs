//! Pass report
//!
//! What a command did: artifacts created, updated, left unchanged and
//! deleted, plus every recovered problem. Serializable for `--json`.

use serde::Serialize;
use tracing::warn;

use crate::error::PublishError;

/// Outcome of writing one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    Created,
    Updated,
    Unchanged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub deleted: Vec<String>,
    /// Records skipped because of a recovered error
    pub skipped: usize,
    /// Writes or deletes the store refused
    pub failed: usize,
    /// Referenced paths that do not exist
    pub missing: Vec<String>,
    /// Entries written to the assets manifest
    pub manifest_entries: usize,
    pub warnings: Vec<String>,
}

impl PassReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: &str, outcome: WriteOutcome) {
        let list = match outcome {
            WriteOutcome::Created => &mut self.created,
            WriteOutcome::Updated => &mut self.updated,
            WriteOutcome::Unchanged => &mut self.unchanged,
        };
        list.push(path.to_string());
    }

    pub fn record_deleted(&mut self, path: &str) {
        self.deleted.push(path.to_string());
    }

    /// A record was skipped; the pass goes on
    pub fn skip(&mut self, err: &PublishError) {
        warn!("{}", err);
        self.skipped += 1;
        if let PublishError::MissingResource { path } = err {
            self.missing.push(path.clone());
        }
        self.warnings.push(err.to_string());
    }

    /// A write or delete failed; the pass goes on
    pub fn fail(&mut self, err: &PublishError) {
        warn!("{}", err);
        self.failed += 1;
        self.warnings.push(err.to_string());
    }

    /// A non-fatal notice that does not skip anything
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.warnings.push(message);
    }

    /// Referenced path that does not exist, without skipping its referrer
    pub fn missing(&mut self, path: &str, referrer: &str) {
        self.missing.push(path.to_string());
        self.warn(format!("missing resource: {} (referenced from {})", path, referrer));
    }

    /// Whether anything in the store was changed
    pub fn wrote_anything(&self) -> bool {
        !self.created.is_empty() || !self.updated.is_empty() || !self.deleted.is_empty()
    }
}
