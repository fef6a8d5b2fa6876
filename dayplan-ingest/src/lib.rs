//! dayplan-ingest: load task and category snapshots (CSV or JSON) for the planner.

pub mod parsers;
pub mod types;

pub use parsers::categories_csv::{parse_categories_csv, parse_categories_reader};
pub use parsers::fields::{parse_hours, parse_priority, parse_progress, parse_status};
pub use parsers::snapshot_json::{load_snapshot_json, parse_snapshot_json};
pub use parsers::tasks_csv::{parse_tasks_csv, parse_tasks_reader};
pub use types::{Snapshot, SnapshotFormat};

use anyhow::Result;
use std::path::Path;

/// Load tasks from `tasks` (CSV or JSON by extension) plus optional category CSV/JSON.
///
/// A JSON task snapshot may carry its own categories; an explicit
/// `categories` file replaces them.
pub fn load_snapshot(tasks: &Path, categories: Option<&Path>) -> Result<Snapshot> {
    let mut snapshot = match SnapshotFormat::from_path(tasks)? {
        SnapshotFormat::Json => load_snapshot_json(tasks)?,
        SnapshotFormat::Csv => Snapshot {
            tasks: parse_tasks_csv(tasks)?,
            categories: Vec::new(),
        },
    };

    if let Some(path) = categories {
        snapshot.categories = match SnapshotFormat::from_path(path)? {
            SnapshotFormat::Json => load_snapshot_json(path)?.categories,
            SnapshotFormat::Csv => parse_categories_csv(path)?,
        };
    }

    Ok(snapshot)
}
