//! Full publish pipeline
//!
//! Runs the three commands in sequence over one vault scan.
//!
//! ## Flow
//!
//! 1. Install or refresh the runtime loader block
//! 2. Scan sources once
//! 3. Generate artifacts and collect orphans
//! 4. Write the assets manifest

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::Config;
use crate::domain::ports::{DocumentStore, LibraryProvider};
use crate::error::PublishResult;

use super::generate::GenerateUseCase;
use super::manifest::ManifestUseCase;
use super::report::PassReport;
use super::runtime::InstallRuntimeUseCase;
use super::scan::scan_sources;

pub struct PublishPipeline<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    config: &'a Config,
    provider: Option<&'a dyn LibraryProvider>,
    generated_at: DateTime<Utc>,
}

impl<'a, S: DocumentStore + ?Sized> PublishPipeline<'a, S> {
    pub fn new(store: &'a S, config: &'a Config) -> Self {
        Self {
            store,
            config,
            provider: None,
            generated_at: Utc::now(),
        }
    }

    /// Companion provider asked for a missing library
    pub fn with_provider(mut self, provider: Option<&'a dyn LibraryProvider>) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_clock(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn run(&self) -> PublishResult<PassReport> {
        let mut report = PassReport::new();

        InstallRuntimeUseCase::new(self.store, self.config).execute_on(&mut report)?;

        let scan = scan_sources(self.store, self.config, &mut report)?;
        GenerateUseCase::new(self.store, self.config)
            .with_provider(self.provider)
            .with_clock(self.generated_at)
            .execute_on(&scan, &mut report)?;
        ManifestUseCase::new(self.store, self.config).execute_on(&scan, &mut report)?;

        dedup_in_order(&mut report.warnings);
        dedup_in_order(&mut report.missing);
        info!(
            written = report.created.len() + report.updated.len(),
            deleted = report.deleted.len(),
            warnings = report.warnings.len(),
            "publish pipeline finished"
        );
        Ok(report)
    }
}

fn dedup_in_order(items: &mut Vec<String>) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}
