//! LibraryProvider port - optional companion that can materialize the
//! icon library on demand.
//!
//! The provider is resolved once when a pass starts. When it is absent, or
//! its call fails, the library is simply treated as missing.

use crate::error::PublishError;

pub trait LibraryProvider {
    /// Ask the companion to write the library document to `path`
    fn export_library(&self, path: &str) -> Result<(), PublishError>;
}
