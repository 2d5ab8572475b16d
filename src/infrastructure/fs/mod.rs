//! Document Store Implementations
//!
//! Concrete implementations of the DocumentStore port.

mod local;
mod memory;

pub use local::LocalVault;
pub use memory::MemoryStore;
