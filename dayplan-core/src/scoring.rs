//! Task scoring: priority + deadline proximity + category boost.
//!
//! Proximity is measured against wall-clock `today`, not the scheduling start.

use chrono::NaiveDate;

use crate::task::{CategorySetting, Priority, ScheduleTask};

pub fn score(task: &ScheduleTask, category: Option<&CategorySetting>, today: NaiveDate) -> i64 {
    let priority = match task.priority {
        Priority::High => 100,
        Priority::Medium => 50,
        Priority::Low => 10,
        Priority::None => 0,
    };

    let proximity = task
        .due_date
        .map(|due| deadline_proximity((due - today).num_days()))
        .unwrap_or(0);

    let category_boost = match category.and_then(|c| c.priority) {
        Some(Priority::High) => 50,
        Some(Priority::Medium) => 25,
        _ => 0,
    };

    priority + proximity + category_boost
}

fn deadline_proximity(days: i64) -> i64 {
    match days {
        d if d < 0 => 1000,
        d if d <= 1 => 500,
        d if d <= 3 => 200,
        d if d <= 7 => 100,
        d => (100 - d).max(0),
    }
}
