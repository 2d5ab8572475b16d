//! Application Layer
//!
//! Use cases that orchestrate a publish pass.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `InstallRuntimeUseCase` - Upserts the loader block into the runtime document
//! - `GenerateUseCase` - Writes marker, library and timeline artifacts, then collects orphans
//! - `ManifestUseCase` - Resolves the asset closure and writes the assets manifest
//! - `PublishPipeline` - All three over a single scan

pub mod artifacts;
pub mod generate;
pub mod manifest;
pub mod pipeline;
pub mod report;
pub mod runtime;
pub mod scan;

pub use artifacts::ArtifactWriter;
pub use generate::{ArtifactClaims, GenerateUseCase};
pub use manifest::{render_manifest, ManifestUseCase};
pub use pipeline::PublishPipeline;
pub use report::{PassReport, WriteOutcome};
pub use runtime::{loader_script, InstallRuntimeUseCase};
pub use scan::{scan_sources, SourceScan};
