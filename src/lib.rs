//! cartopub - publish pipeline for map, marker and timeline data
//!
//! Scans a notes vault for map blocks and timeline notes, writes one
//! change-detected artifact per marker set, icon library and timeline,
//! removes artifacts whose sources are gone, and lists every referenced
//! file in an assets manifest.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod parser;

// Re-exports for convenience
pub use application::{PassReport, PublishPipeline};
pub use config::Config;
pub use domain::ports::{DocumentStore, LibraryProvider};
pub use error::{PublishError, PublishResult};
pub use infrastructure::{LocalVault, MemoryStore};
