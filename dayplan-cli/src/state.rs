use anyhow::{Context, Result};
use chrono::NaiveDate;
use dayplan_core::{Allocation, replace_from};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// `$DAYPLAN_HOME`, else `~/.dayplan`.
pub fn dayplan_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("DAYPLAN_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".dayplan"))
}

pub fn ensure_dayplan_home() -> Result<PathBuf> {
    let dir = dayplan_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn schedule_path() -> Result<PathBuf> {
    Ok(ensure_dayplan_home()?.join("schedule.json"))
}

/// Contents of `schedule.json`: saved allocations plus the titles of the tasks they reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedSchedule {
    #[serde(default)]
    pub titles: BTreeMap<String, String>,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
}

impl SavedSchedule {
    /// Replace everything from `from` onward with `fresh`, then keep only titles still referenced.
    pub fn merge(
        self,
        fresh: Vec<Allocation>,
        fresh_titles: impl IntoIterator<Item = (String, String)>,
        from: NaiveDate,
    ) -> Self {
        let allocations = replace_from(self.allocations, fresh, from);
        let mut titles = self.titles;
        titles.extend(fresh_titles);
        titles.retain(|id, _| allocations.iter().any(|a| &a.task_id == id));
        Self { titles, allocations }
    }
}

/// A missing file is an empty schedule.
pub fn read_schedule(path: &Path) -> Result<SavedSchedule> {
    if !path.exists() {
        return Ok(SavedSchedule::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_schedule(path: &Path, saved: &SavedSchedule) -> Result<()> {
    let json = serde_json::to_string_pretty(saved)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, day).unwrap()
    }

    fn alloc(day: u32, task: &str) -> Allocation {
        Allocation {
            date: d(day),
            task_id: task.into(),
            scheduled_hours: 1.0,
            category_name: None,
        }
    }

    #[test]
    fn merge_replaces_tail_and_prunes_titles() {
        let saved = SavedSchedule {
            titles: BTreeMap::from([
                ("old".to_string(), "Old task".to_string()),
                ("gone".to_string(), "Dropped task".to_string()),
            ]),
            allocations: vec![alloc(2, "old"), alloc(5, "gone")],
        };

        let merged = saved.merge(
            vec![alloc(4, "new")],
            [("new".to_string(), "New task".to_string())],
            d(4),
        );

        assert_eq!(merged.allocations, vec![alloc(2, "old"), alloc(4, "new")]);
        assert_eq!(merged.titles.get("old").map(String::as_str), Some("Old task"));
        assert_eq!(merged.titles.get("new").map(String::as_str), Some("New task"));
        assert!(!merged.titles.contains_key("gone"));
    }

    #[test]
    fn write_then_read_keeps_titles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        assert_eq!(read_schedule(&path).unwrap(), SavedSchedule::default());

        let saved = SavedSchedule::default().merge(
            vec![alloc(2, "t1")],
            [("t1".to_string(), "Slides".to_string())],
            d(2),
        );
        write_schedule(&path, &saved).unwrap();

        let back = read_schedule(&path).unwrap();
        assert_eq!(back, saved);
        assert_eq!(back.titles["t1"], "Slides");
    }
}
