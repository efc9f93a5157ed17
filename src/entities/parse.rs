use thiserror::Error;

use super::graph::GraphSnapshot;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid graph JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate entity id `{0}` in graph snapshot")]
    DuplicateNodeId(String),
}

/// Decodes a snapshot payload. Absent `nodes`, `edges` and `stats` mean "no graph yet".
pub fn parse_snapshot(raw: &str) -> Result<GraphSnapshot, SnapshotError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(GraphSnapshot::default());
    }
    Ok(serde_json::from_str(trimmed)?)
}
