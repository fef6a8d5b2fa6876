//! Plain-text views of a plan.

use chrono::NaiveDate;
use dayplan_core::{Allocation, CapacityCalendar, Shortfall, group_by_day, round_hours, totals_by_task};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Per-day listing; `titles` maps task id -> title when known.
pub fn day_table<'a>(
    allocs: impl IntoIterator<Item = &'a Allocation>,
    titles: &BTreeMap<String, String>,
    calendar: &dyn CapacityCalendar,
) -> String {
    let mut s = String::new();
    for (date, entries) in group_by_day(allocs) {
        let total = round_hours(entries.iter().map(|a| a.scheduled_hours).sum());
        let _ = writeln!(s, "{}  [{:.2}h]{}", day_label(date), total, day_tag(date, calendar));
        for a in entries {
            let title = titles.get(&a.task_id).map(String::as_str).unwrap_or("");
            let _ = writeln!(
                s,
                "  {:<10} {:<32} {:>6.2}h  {}",
                a.task_id,
                truncate(title, 32),
                a.scheduled_hours,
                a.category_name.as_deref().unwrap_or("-")
            );
        }
    }
    s
}

pub fn shortfall_report(shortfalls: &[Shortfall]) -> String {
    let mut s = String::new();
    if shortfalls.is_empty() {
        return s;
    }
    let _ = writeln!(s, "Could not fit before deadline:");
    for sf in shortfalls {
        let _ = writeln!(
            s,
            "  {} \"{}\": {:.2}h unscheduled (deadline {})",
            sf.task_id, sf.title, sf.unallocated_hours, sf.deadline
        );
    }
    s
}

pub fn totals<'a>(allocs: impl IntoIterator<Item = &'a Allocation>) -> String {
    let mut s = String::new();
    for (task, hours) in totals_by_task(allocs) {
        let _ = writeln!(s, "  {task:<10} {hours:>6.2}h");
    }
    s
}

pub fn day_label(date: NaiveDate) -> String {
    date.format("%Y-%m-%d (%a)").to_string()
}

fn day_tag(date: NaiveDate, calendar: &dyn CapacityCalendar) -> String {
    if !calendar.is_reduced_capacity_day(date) {
        return String::new();
    }
    match calendar.describe(date) {
        Some(name) => format!("  {name}"),
        None => "  weekend".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
