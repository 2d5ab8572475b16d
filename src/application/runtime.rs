//! Install Runtime Use Case
//!
//! Keeps the bundled loader script inside the host's runtime document
//! current. Only the text between the sentinels is managed.

use tracing::info;

use crate::config::Config;
use crate::domain::ports::{DocumentStore, StoreError};
use crate::domain::services::{upsert_block, Sentinels};
use crate::domain::value_objects::NormalizedKey;
use crate::error::{PublishError, PublishResult};

use super::artifacts::ArtifactWriter;
use super::report::PassReport;

const LOADER_TEMPLATE: &str = include_str!("runtime_loader.js");
const FOLDER_PLACEHOLDER: &str = "__ARTIFACT_FOLDER__";

/// The loader script, pointed at `artifact_folder`
pub fn loader_script(artifact_folder: &str) -> String {
    let folder = NormalizedKey::new(artifact_folder);
    LOADER_TEMPLATE.replace(FOLDER_PLACEHOLDER, &folder.as_str().replace('"', "\\\""))
}

pub struct InstallRuntimeUseCase<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    config: &'a Config,
}

impl<'a, S: DocumentStore + ?Sized> InstallRuntimeUseCase<'a, S> {
    pub fn new(store: &'a S, config: &'a Config) -> Self {
        Self { store, config }
    }

    pub fn execute(&self) -> PublishResult<PassReport> {
        let mut report = PassReport::new();
        self.execute_on(&mut report)?;
        Ok(report)
    }

    /// Upsert the loader block. A runtime document that cannot be read is
    /// left alone and counted as a failure.
    pub fn execute_on(&self, report: &mut PassReport) -> PublishResult<()> {
        let runtime = &self.config.runtime;
        let target = NormalizedKey::new(&runtime.target);

        let existing = match self.store.read(target.as_str()) {
            Ok(text) => text,
            Err(StoreError::NotFound(_)) => String::new(),
            Err(source) => {
                report.fail(&PublishError::Store(source));
                return Ok(());
            }
        };

        let sentinels = Sentinels::new(&runtime.begin_sentinel, &runtime.end_sentinel);
        let updated = upsert_block(
            &existing,
            sentinels,
            &loader_script(&self.config.output.artifact_folder),
        );

        let writer = ArtifactWriter::new(self.store, chrono::Utc::now());
        match writer.write_text(target.as_str(), &updated) {
            Ok(outcome) => {
                info!(path = %target, ?outcome, "runtime block installed");
                report.record(target.as_str(), outcome);
            }
            Err(err) => report.fail(&err),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStore;

    #[test]
    fn loader_points_at_the_artifact_folder() {
        let script = loader_script("out/publish/");
        assert!(script.contains(r#"var FOLDER = "out/publish";"#));
        assert!(!script.contains(FOLDER_PLACEHOLDER));
    }

    #[test]
    fn creates_the_runtime_document() {
        let store = MemoryStore::new();
        let report = InstallRuntimeUseCase::new(&store, &Config::default()).execute().unwrap();
        assert_eq!(report.created, vec!["publish.js"]);

        let text = store.content("publish.js").unwrap();
        assert!(text.starts_with("/* cartopub:begin */\n"));
        assert!(text.ends_with("/* cartopub:end */\n"));
    }

    #[test]
    fn preserves_hand_written_code_and_is_idempotent() {
        let store = MemoryStore::with_files([("publish.js", "console.log('mine');\n")]);
        let config = Config::default();
        InstallRuntimeUseCase::new(&store, &config).execute().unwrap();
        let first = store.content("publish.js").unwrap();
        assert!(first.starts_with("console.log('mine');\n\n/* cartopub:begin */"));

        let report = InstallRuntimeUseCase::new(&store, &config).execute().unwrap();
        assert_eq!(report.unchanged, vec!["publish.js"]);
        assert_eq!(store.content("publish.js").unwrap(), first);
    }

    #[test]
    fn unwritable_target_is_a_failure_not_an_abort() {
        let store = MemoryStore::new();
        store.deny_writes("publish.js");
        let report = InstallRuntimeUseCase::new(&store, &Config::default()).execute().unwrap();
        assert_eq!(report.failed, 1);
    }
}
