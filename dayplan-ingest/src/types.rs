use anyhow::{Result, bail};
use dayplan_core::{CategorySetting, ScheduleTask, TaskRecord, schedulable};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Csv,
    Json,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => bail!("unsupported snapshot file {} (expected .csv or .json)", path.display()),
        }
    }
}

/// Point-in-time copy of one user's tasks and category settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub categories: Vec<CategorySetting>,
}

impl Snapshot {
    /// Records that still need hours, ready for the allocator.
    pub fn schedulable_tasks(&self) -> Vec<ScheduleTask> {
        schedulable(&self.tasks)
    }
}
