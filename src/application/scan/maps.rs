//! Map scanner: fenced map blocks in candidate notes

use crate::config::ScanConfig;
use crate::domain::entities::{MapBlock, MapBlockSpec};
use crate::error::PublishError;
use crate::parser::fenced_blocks;

use super::super::report::PassReport;
use super::Candidate;

/// Every map block declared in `notes`, in note order then line order.
///
/// A block whose body is not a YAML mapping, or that names no base image,
/// is skipped with a warning.
pub fn scan_maps(notes: &[Candidate], config: &ScanConfig, report: &mut PassReport) -> Vec<MapBlock> {
    let mut blocks = Vec::new();
    for note in notes {
        for fenced in fenced_blocks(&note.content, &config.block_languages) {
            let location = format!("{}:{}", note.path, fenced.line);
            let spec: MapBlockSpec = match parse_spec(&fenced.body) {
                Ok(spec) => spec,
                Err(message) => {
                    report.skip(&PublishError::malformed(location, message));
                    continue;
                }
            };
            match MapBlock::from_spec(note.path.clone(), &spec, &config.markers_suffix, fenced.line) {
                Some(block) => blocks.push(block),
                None => report.skip(&PublishError::malformed(location, "map block has no base image")),
            }
        }
    }
    blocks
}

fn parse_spec(body: &str) -> Result<MapBlockSpec, String> {
    let value: serde_yaml_ng::Value = serde_yaml_ng::from_str(body).map_err(|e| e.to_string())?;
    if !value.is_mapping() {
        return Err("map block is not a YAML mapping".to_string());
    }
    serde_yaml_ng::from_value(value).map_err(|e| e.to_string())
}
