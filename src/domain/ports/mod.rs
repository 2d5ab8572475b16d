//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod document_store;
pub mod library_provider;

pub use document_store::{DocumentMeta, DocumentStore, StoreError, StoreResult};
pub use library_provider::LibraryProvider;
