//! Domain Services
//!
//! Pure publish logic over domain entities. Nothing here touches the
//! document store; callers pass in what was read.

mod asset_closure;
mod block_upsert;
mod link_index;
mod natural_order;
mod orphan_collector;
mod summary;
mod timeline_aggregator;

pub use asset_closure::{
    library_assets, marker_assets, marker_links, AssetSet, ClosureOutput, UnresolvedLink,
};
pub use block_upsert::{upsert_block, Sentinels};
pub use link_index::{is_external, link_target, LinkIndex};
pub use natural_order::natural_cmp;
pub use orphan_collector::{OrphanArtifact, OrphanDetectionResult, OrphanDetector};
pub use summary::{body_images, extract_summary, is_image_path, BodyImages, IMAGE_EXTENSIONS, SUMMARY_LIMIT};
pub use timeline_aggregator::{aggregate, format_display, MonthTables, DEFAULT_MONTHS};
