//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod artifact_id;
mod calendar_date;
mod config_warning;
mod key;

pub use artifact_id::{fnv1a, to_base36, ArtifactId};
pub use calendar_date::CalendarDate;
pub use config_warning::ConfigWarning;
pub use key::{strip_wiki_link, NormalizedKey};
