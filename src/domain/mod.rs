//! Domain Layer
//!
//! The publish model without I/O.
//!
//! ## Structure
//!
//! - `value_objects/` - Normalized keys, artifact ids, calendar dates
//! - `entities/` - Map blocks, marker sets, the library, timelines, artifacts
//! - `services/` - Closure, orphan detection, timeline aggregation, block upsert
//! - `ports/` - Document store and companion provider traits
//!
//! ## Design Principles
//!
//! 1. **No I/O** - Reads and writes go through `ports::DocumentStore`
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Tolerant input** - Malformed fields are dropped, not fatal

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
