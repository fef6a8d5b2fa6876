//! Helpers for a persisted plan: full-replace merges and range views.
//!
//! A fresh plan supersedes every stored allocation from its start date on;
//! history before the start date is left alone.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::ledger::round_hours;
use crate::task::Allocation;

/// Drop everything in `existing` dated on/after `from`, then add `fresh`. Date-sorted.
pub fn replace_from(existing: Vec<Allocation>, fresh: Vec<Allocation>, from: NaiveDate) -> Vec<Allocation> {
    let mut out: Vec<Allocation> = existing.into_iter().filter(|a| a.date < from).collect();
    out.extend(fresh);
    out.sort_by_key(|a| a.date);
    out
}

/// Allocations within `[start, end]`; an open `end` means no upper bound.
pub fn in_range(allocs: &[Allocation], start: NaiveDate, end: Option<NaiveDate>) -> Vec<&Allocation> {
    allocs
        .iter()
        .filter(|a| a.date >= start && end.is_none_or(|e| a.date <= e))
        .collect()
}

pub fn group_by_day<'a, I>(allocs: I) -> BTreeMap<NaiveDate, Vec<&'a Allocation>>
where
    I: IntoIterator<Item = &'a Allocation>,
{
    let mut days: BTreeMap<NaiveDate, Vec<&Allocation>> = BTreeMap::new();
    for a in allocs {
        days.entry(a.date).or_default().push(a);
    }
    days
}

pub fn totals_by_task<'a, I>(allocs: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a Allocation>,
{
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for a in allocs {
        let t = totals.entry(a.task_id.clone()).or_insert(0.0);
        *t = round_hours(*t + a.scheduled_hours);
    }
    totals
}
