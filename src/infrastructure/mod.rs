//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Document stores (on disk, in memory)
//! - `lock` - Advisory lock that serializes passes on one vault

pub mod fs;
pub mod lock;

pub use fs::{LocalVault, MemoryStore};
pub use lock::{PassLock, LOCK_FILE};
