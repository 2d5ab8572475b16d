//! Domain Entities
//!
//! - `MapBlock` - a map declared inside a note
//! - `MarkerDocument` - the marker-set JSON behind a map
//! - `LibraryDocument` - shared icons and swap presets
//! - `TimelineEntry` / `Timeline` - chronological entries per named timeline
//! - `GeneratedArtifact` - a published payload and its naming convention

mod artifact;
mod library;
mod map_block;
mod marker_document;
pub mod shape;
mod timeline;

pub use artifact::{parse_artifact_name, ArtifactHeader, ArtifactKind, GeneratedArtifact, GENERATOR};
pub use library::{is_remote_or_inline, IconDef, LibraryDocument, PresetFrame, SwapPreset};
pub use map_block::{MapBlock, MapBlockSpec};
pub use marker_document::{DrawingRecord, MarkerDocument, MarkerRecord, StateLinks};
pub use timeline::{EntryImage, Timeline, TimelineEntry, TimelineRow};
