//! Task and category records consumed by the allocator, plus the allocation
//! records it produces.
//!
//! `TaskRecord` is the upstream shape (estimate + progress + status). The
//! allocator only ever sees `ScheduleTask`, which carries remaining hours.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

/// A task as handed to the allocator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Hours of effort still to be placed.
    pub remaining_hours: f64,
    #[serde(default)]
    pub priority: Priority,
}

impl ScheduleTask {
    pub fn new(id: impl Into<String>, title: impl Into<String>, remaining_hours: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category_name: None,
            due_date: None,
            remaining_hours,
            priority: Priority::None,
        }
    }

    pub fn with_category(mut self, name: impl Into<String>) -> Self {
        self.category_name = Some(name.into());
        self
    }

    pub fn with_due(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Per-category capacity overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySetting {
    pub name: String,
    #[serde(default)]
    pub daily_limit_hours: Option<f64>,
    #[serde(default)]
    pub weekend_holiday_hours: Option<f64>,
    /// Category-level boost. Nothing upstream fills this in yet, scoring still honors it.
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl CategorySetting {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            daily_limit_hours: None,
            weekend_holiday_hours: None,
            priority: None,
        }
    }

    pub fn with_daily_limit(mut self, hours: f64) -> Self {
        self.daily_limit_hours = Some(hours);
        self
    }

    pub fn with_weekend_holiday(mut self, hours: f64) -> Self {
        self.weekend_holiday_hours = Some(hours);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Global daily limits used when a category has no override.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityDefaults {
    pub weekday_hours: f64,
    /// Falls back to `weekday_hours` when unset.
    pub weekend_holiday_hours: Option<f64>,
}

impl Default for CapacityDefaults {
    fn default() -> Self {
        Self {
            weekday_hours: 8.0,
            weekend_holiday_hours: None,
        }
    }
}

/// One day's slice of work on one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub date: NaiveDate,
    pub task_id: String,
    pub scheduled_hours: f64,
    #[serde(default)]
    pub category_name: Option<String>,
}

/// Upstream task record, before remaining hours are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    /// 0-100.
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: TaskStatus,
}

impl TaskRecord {
    /// `estimated * (1 - progress/100)`, never negative. No estimate means nothing to place.
    pub fn remaining_hours(&self) -> f64 {
        let Some(estimated) = self.estimated_hours else {
            return 0.0;
        };
        let progress = self.progress.unwrap_or(0.0).clamp(0.0, 100.0);
        (estimated * (1.0 - progress / 100.0)).max(0.0)
    }

    pub fn to_schedule_task(&self) -> Option<ScheduleTask> {
        if self.status == TaskStatus::Done {
            return None;
        }
        let remaining = self.remaining_hours();
        if remaining <= 0.0 {
            return None;
        }
        Some(ScheduleTask {
            id: self.id.clone(),
            title: self.title.clone(),
            category_name: self.category_name.clone(),
            due_date: self.due_date,
            remaining_hours: remaining,
            priority: self.priority.unwrap_or_default(),
        })
    }
}

/// Keep only records that still need hours, in input order.
pub fn schedulable(records: &[TaskRecord]) -> Vec<ScheduleTask> {
    records.iter().filter_map(TaskRecord::to_schedule_task).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(estimated: Option<f64>, progress: Option<f64>, status: TaskStatus) -> TaskRecord {
        TaskRecord {
            id: "t1".into(),
            title: "write report".into(),
            category_name: Some("work".into()),
            due_date: None,
            estimated_hours: estimated,
            progress,
            priority: Some(Priority::High),
            status,
        }
    }

    #[test]
    fn remaining_hours_nets_out_progress() {
        let r = record(Some(10.0), Some(40.0), TaskStatus::InProgress);
        assert!((r.remaining_hours() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn progress_over_100_clamps_to_zero_remaining() {
        let r = record(Some(4.0), Some(150.0), TaskStatus::Todo);
        assert_eq!(r.remaining_hours(), 0.0);
        assert!(r.to_schedule_task().is_none());
    }

    #[test]
    fn done_and_unestimated_records_are_dropped() {
        let records = vec![
            record(Some(3.0), None, TaskStatus::Done),
            record(None, None, TaskStatus::Todo),
            record(Some(2.0), Some(50.0), TaskStatus::Todo),
        ];
        let tasks = schedulable(&records);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].remaining_hours, 1.0);
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[0].category_name.as_deref(), Some("work"));
    }

    #[test]
    fn allocation_serializes_camel_case() {
        let a = Allocation {
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            task_id: "t1".into(),
            scheduled_hours: 2.5,
            category_name: None,
        };
        let json = serde_json::to_string(&a).unwrap();
        assert!(json.contains("\"taskId\":\"t1\""));
        assert!(json.contains("\"scheduledHours\":2.5"));
        assert!(json.contains("\"date\":\"2026-03-02\""));
    }
}
