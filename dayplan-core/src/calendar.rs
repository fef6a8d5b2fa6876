//! Calendar classification: ordinary days vs reduced-capacity days.
//!
//! Implementations must be pure and total over every `NaiveDate`; an
//! unknown date is an ordinary day.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};

pub trait CapacityCalendar {
    /// Weekend or holiday.
    fn is_reduced_capacity_day(&self, date: NaiveDate) -> bool;

    /// Human label for a holiday, if the calendar knows one.
    fn describe(&self, _date: NaiveDate) -> Option<String> {
        None
    }
}

impl<T: CapacityCalendar + ?Sized> CapacityCalendar for &T {
    fn is_reduced_capacity_day(&self, date: NaiveDate) -> bool {
        (**self).is_reduced_capacity_day(date)
    }

    fn describe(&self, date: NaiveDate) -> Option<String> {
        (**self).describe(date)
    }
}

impl<T: CapacityCalendar + ?Sized> CapacityCalendar for Box<T> {
    fn is_reduced_capacity_day(&self, date: NaiveDate) -> bool {
        (**self).is_reduced_capacity_day(date)
    }

    fn describe(&self, date: NaiveDate) -> Option<String> {
        (**self).describe(date)
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Saturdays and Sundays only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekendsOnly;

impl CapacityCalendar for WeekendsOnly {
    fn is_reduced_capacity_day(&self, date: NaiveDate) -> bool {
        is_weekend(date)
    }
}

/// Weekends plus an explicit set of dates, optionally layered on another calendar.
pub struct HolidayTable {
    dates: BTreeSet<NaiveDate>,
    base: Option<Box<dyn CapacityCalendar + Send + Sync>>,
}

impl HolidayTable {
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
            base: None,
        }
    }

    pub fn with_base(mut self, base: impl CapacityCalendar + Send + Sync + 'static) -> Self {
        self.base = Some(Box::new(base));
        self
    }

    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.dates.insert(date)
    }
}

impl std::fmt::Debug for HolidayTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HolidayTable")
            .field("dates", &self.dates)
            .field("layered", &self.base.is_some())
            .finish()
    }
}

impl CapacityCalendar for HolidayTable {
    fn is_reduced_capacity_day(&self, date: NaiveDate) -> bool {
        if is_weekend(date) || self.dates.contains(&date) {
            return true;
        }
        self.base
            .as_ref()
            .is_some_and(|b| b.is_reduced_capacity_day(date))
    }

    fn describe(&self, date: NaiveDate) -> Option<String> {
        if let Some(label) = self.base.as_ref().and_then(|b| b.describe(date)) {
            return Some(label);
        }
        self.dates.contains(&date).then(|| "Holiday".to_string())
    }
}
