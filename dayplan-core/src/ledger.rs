//! Capacity ledger: remaining hours per (date, category) for one scheduling run.
//!
//! Buckets are materialized on first touch and never dropped, so repeated
//! lookups see cumulative consumption. Category names that don't resolve to a
//! known setting share the uncategorized bucket.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::calendar::CapacityCalendar;
use crate::task::{CapacityDefaults, CategorySetting};

/// Round to hundredths of an hour.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    limit: f64,
    remaining: f64,
}

impl Bucket {
    fn new(limit: f64) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn has_capacity(&self) -> bool {
        self.remaining > 0.0
    }

    /// Consume `hours` (already rounded by the caller); the remainder stays rounded.
    pub fn consume(&mut self, hours: f64) {
        self.remaining = round_hours(self.remaining - hours);
    }
}

pub struct CapacityLedger<'a, C> {
    calendar: C,
    defaults: CapacityDefaults,
    categories: HashMap<&'a str, &'a CategorySetting>,
    buckets: HashMap<(NaiveDate, Option<&'a str>), Bucket>,
}

impl<'a, C: CapacityCalendar> CapacityLedger<'a, C> {
    pub fn new(calendar: C, defaults: CapacityDefaults, categories: &'a [CategorySetting]) -> Self {
        Self {
            calendar,
            defaults,
            categories: categories.iter().map(|c| (c.name.as_str(), c)).collect(),
            buckets: HashMap::new(),
        }
    }

    pub fn resolve(&self, name: Option<&str>) -> Option<&'a CategorySetting> {
        name.and_then(|n| self.categories.get(n).copied())
    }

    /// Daily limit for `date` under `category` (or the global defaults).
    pub fn limit_for(&self, date: NaiveDate, category: Option<&CategorySetting>) -> f64 {
        daily_limit(&self.calendar, &self.defaults, date, category)
    }

    pub fn bucket(&mut self, date: NaiveDate, category_name: Option<&str>) -> &mut Bucket {
        let setting = self.resolve(category_name);
        let Self {
            calendar,
            defaults,
            buckets,
            ..
        } = self;
        buckets
            .entry((date, setting.map(|s| s.name.as_str())))
            .or_insert_with(|| Bucket::new(daily_limit(calendar, defaults, date, setting)))
    }

    /// Remaining hours of an already-touched bucket.
    pub fn remaining(&self, date: NaiveDate, category_name: Option<&str>) -> Option<f64> {
        let key = (date, self.resolve(category_name).map(|s| s.name.as_str()));
        self.buckets.get(&key).map(Bucket::remaining)
    }

    /// Number of buckets materialized so far.
    pub fn touched(&self) -> usize {
        self.buckets.len()
    }
}

fn daily_limit<C: CapacityCalendar>(
    calendar: &C,
    defaults: &CapacityDefaults,
    date: NaiveDate,
    category: Option<&CategorySetting>,
) -> f64 {
    if calendar.is_reduced_capacity_day(date) {
        category
            .and_then(|c| c.weekend_holiday_hours)
            .or(defaults.weekend_holiday_hours)
            .unwrap_or(defaults.weekday_hours)
    } else {
        category
            .and_then(|c| c.daily_limit_hours)
            .unwrap_or(defaults.weekday_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::WeekendsOnly;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn defaults(weekend: Option<f64>) -> CapacityDefaults {
        CapacityDefaults {
            weekday_hours: 8.0,
            weekend_holiday_hours: weekend,
        }
    }

    #[test]
    fn rounding() {
        assert_eq!(round_hours(2.666_666), 2.67);
        assert_eq!(round_hours(0.004), 0.0);
        assert_eq!(round_hours(8.0 - 2.67), 5.33);
    }

    #[test]
    fn weekday_and_weekend_limits() {
        let cats = vec![CategorySetting::new("study").with_daily_limit(3.0).with_weekend_holiday(1.5)];
        let mut ledger = CapacityLedger::new(WeekendsOnly, defaults(Some(4.0)), &cats);

        let mon = d(2026, 10, 19);
        let sat = d(2026, 10, 17);
        assert_eq!(ledger.bucket(mon, Some("study")).limit(), 3.0);
        assert_eq!(ledger.bucket(sat, Some("study")).limit(), 1.5);
        assert_eq!(ledger.bucket(mon, None).limit(), 8.0);
        assert_eq!(ledger.bucket(sat, None).limit(), 4.0);
    }

    #[test]
    fn weekend_falls_back_to_weekday_default() {
        let cats = vec![CategorySetting::new("home").with_daily_limit(2.0)];
        let mut ledger = CapacityLedger::new(WeekendsOnly, defaults(None), &cats);
        let sun = d(2026, 10, 18);
        assert_eq!(ledger.bucket(sun, Some("home")).limit(), 8.0);
    }

    #[test]
    fn buckets_are_cumulative_and_lazy() {
        let mut ledger = CapacityLedger::new(WeekendsOnly, defaults(None), &[]);
        assert_eq!(ledger.touched(), 0);
        let day = d(2026, 10, 19);
        ledger.bucket(day, None).consume(2.5);
        ledger.bucket(day, None).consume(1.25);
        assert_eq!(ledger.remaining(day, None), Some(4.25));
        assert_eq!(ledger.touched(), 1);
        assert_eq!(ledger.remaining(d(2026, 10, 20), None), None);
    }

    #[test]
    fn unknown_category_shares_default_bucket() {
        let mut ledger = CapacityLedger::new(WeekendsOnly, defaults(None), &[]);
        let day = d(2026, 10, 19);
        ledger.bucket(day, Some("nope")).consume(3.0);
        assert_eq!(ledger.bucket(day, None).remaining(), 5.0);
        assert_eq!(ledger.touched(), 1);
    }
}
