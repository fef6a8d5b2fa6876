//! JSON snapshot: `{ "tasks": [...], "categories": [...] }` with camelCase fields.

use anyhow::{Context, Result};
use std::path::Path;

use crate::types::Snapshot;

pub fn load_snapshot_json(path: impl AsRef<Path>) -> Result<Snapshot> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_snapshot_json(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_snapshot_json(s: &str) -> Result<Snapshot> {
    Ok(serde_json::from_str(s)?)
}
