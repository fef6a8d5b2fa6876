//! Allocation engine: spreads each task's remaining hours over calendar days.
//!
//! Two passes over a run-scoped capacity ledger:
//! 1. fair share: walk the horizon day by day, splitting each day's bucket
//!    evenly across every task still eligible that day (score order).
//! 2. mop-up: each task still carrying hours walks start..=deadline again and
//!    greedily takes whatever its buckets have left.
//!
//! Hours are rounded to hundredths at the moment of assignment, and every
//! remainder stays rounded, so comparisons never see accumulated drift.
//! Anything that can't be placed before the deadline is a `Shortfall`, never
//! an error.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::calendar::CapacityCalendar;
use crate::holidays::JapaneseHolidays;
use crate::ledger::{CapacityLedger, round_hours};
use crate::scoring::score;
use crate::task::{Allocation, CapacityDefaults, CategorySetting, ScheduleTask};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub defaults: CapacityDefaults,
    /// Runaway guard on iterated days, for both passes.
    pub horizon_days: u32,
    /// Deadline for tasks without a due date, counted from the start date.
    pub default_deadline_days: i64,
    /// Assignments at or below this many hours are dropped.
    pub noise_floor_hours: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            defaults: CapacityDefaults::default(),
            horizon_days: 365,
            default_deadline_days: 7,
            noise_floor_hours: 0.01,
        }
    }
}

/// Hours a task could not fit before its resolved deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortfall {
    pub task_id: String,
    pub title: String,
    pub unallocated_hours: f64,
    pub deadline: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    /// Sorted by date; same-day entries keep assignment order.
    pub allocations: Vec<Allocation>,
    pub shortfalls: Vec<Shortfall>,
}

impl ScheduleOutcome {
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    pub fn is_feasible(&self) -> bool {
        self.shortfalls.is_empty()
    }

    pub fn hours_for_task(&self, task_id: &str) -> f64 {
        round_hours(
            self.allocations
                .iter()
                .filter(|a| a.task_id == task_id)
                .map(|a| a.scheduled_hours)
                .sum(),
        )
    }
}

#[derive(Debug)]
struct Pending<'t> {
    task: &'t ScheduleTask,
    score: i64,
    deadline: NaiveDate,
    remaining: f64,
}

impl Pending<'_> {
    fn category(&self) -> Option<&str> {
        self.task.category_name.as_deref()
    }

    fn allocation(&self, date: NaiveDate, hours: f64) -> Allocation {
        Allocation {
            date,
            task_id: self.task.id.clone(),
            scheduled_hours: hours,
            category_name: self.task.category_name.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler<C> {
    calendar: C,
    config: SchedulerConfig,
}

impl<C: CapacityCalendar> Scheduler<C> {
    pub fn new(calendar: C, defaults: CapacityDefaults) -> Self {
        Self::with_config(
            calendar,
            SchedulerConfig {
                defaults,
                ..SchedulerConfig::default()
            },
        )
    }

    pub fn with_config(calendar: C, config: SchedulerConfig) -> Self {
        Self { calendar, config }
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    /// Plan `tasks` from `start` onward. `today` only feeds deadline-proximity scoring.
    pub fn schedule(
        &self,
        tasks: &[ScheduleTask],
        categories: &[CategorySetting],
        start: NaiveDate,
        today: NaiveDate,
    ) -> ScheduleOutcome {
        let mut ledger = CapacityLedger::new(&self.calendar, self.config.defaults, categories);

        let mut pending: Vec<Pending> = tasks
            .iter()
            .filter(|t| t.remaining_hours > 0.0)
            .map(|t| Pending {
                task: t,
                score: score(t, ledger.resolve(t.category_name.as_deref()), today),
                deadline: self.resolve_deadline(t, start),
                remaining: t.remaining_hours,
            })
            .collect();

        if pending.is_empty() {
            return ScheduleOutcome::default();
        }

        // Stable: equal scores keep input order.
        pending.sort_by(|a, b| b.score.cmp(&a.score));

        let horizon_end = pending
            .iter()
            .map(|p| p.deadline)
            .max()
            .unwrap_or(start)
            .max(start);

        let mut allocations = Vec::new();
        self.fair_share_pass(&mut pending, &mut ledger, start, horizon_end, &mut allocations);
        let shortfalls = self.mop_up_pass(&mut pending, &mut ledger, start, &mut allocations);

        allocations.sort_by_key(|a| a.date);

        debug!(
            tasks = pending.len(),
            allocations = allocations.len(),
            buckets = ledger.touched(),
            shortfalls = shortfalls.len(),
            %start,
            %horizon_end,
            "schedule computed"
        );

        ScheduleOutcome {
            allocations,
            shortfalls,
        }
    }

    /// Due date clamped to the start, or start + default window when undated.
    pub fn resolve_deadline(&self, task: &ScheduleTask, start: NaiveDate) -> NaiveDate {
        match task.due_date {
            Some(due) => due.max(start),
            None => start
                .checked_add_signed(Duration::days(self.config.default_deadline_days))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    fn fair_share_pass<K: CapacityCalendar>(
        &self,
        pending: &mut [Pending<'_>],
        ledger: &mut CapacityLedger<'_, K>,
        start: NaiveDate,
        end: NaiveDate,
        out: &mut Vec<Allocation>,
    ) {
        let mut day = start;
        for _ in 0..self.config.horizon_days {
            if day > end {
                break;
            }

            let eligible: Vec<usize> = pending
                .iter()
                .enumerate()
                .filter(|(_, p)| p.remaining > 0.0 && p.deadline >= day)
                .map(|(i, _)| i)
                .collect();

            if !eligible.is_empty() {
                let count = eligible.len() as f64;
                // Each bucket's share is fixed from what it held when the sweep first reached it today.
                let mut opening: HashMap<Option<&str>, f64> = HashMap::new();

                for i in eligible {
                    let p = &mut pending[i];
                    let key = ledger.resolve(p.category()).map(|c| c.name.as_str());
                    let bucket = ledger.bucket(day, p.category());
                    if !bucket.has_capacity() {
                        continue;
                    }
                    let opened = *opening.entry(key).or_insert(bucket.remaining());

                    let cap = p.remaining.min(bucket.remaining());
                    let raw = cap.min(opened / count);
                    let Some(hours) = self.assignable(raw, cap) else {
                        continue;
                    };

                    bucket.consume(hours);
                    p.remaining = round_hours(p.remaining - hours);
                    out.push(p.allocation(day, hours));
                }
            }

            let Some(next) = day.succ_opt() else { break };
            day = next;
        }
    }

    fn mop_up_pass<K: CapacityCalendar>(
        &self,
        pending: &mut [Pending<'_>],
        ledger: &mut CapacityLedger<'_, K>,
        start: NaiveDate,
        out: &mut Vec<Allocation>,
    ) -> Vec<Shortfall> {
        let mut shortfalls = Vec::new();

        for p in pending.iter_mut() {
            if p.remaining <= 0.0 {
                continue;
            }

            let mut day = start;
            for _ in 0..self.config.horizon_days {
                if p.remaining <= 0.0 || day > p.deadline {
                    break;
                }
                let bucket = ledger.bucket(day, p.category());
                let cap = p.remaining.min(bucket.remaining());
                if let Some(hours) = self.assignable(cap, cap) {
                    bucket.consume(hours);
                    p.remaining = round_hours(p.remaining - hours);
                    out.push(p.allocation(day, hours));
                }
                let Some(next) = day.succ_opt() else { break };
                day = next;
            }

            // Sub-floor leftovers are never placed but still reported.
            if p.remaining > 0.0 {
                warn!(
                    task_id = %p.task.id,
                    title = %p.task.title,
                    unallocated_hours = p.remaining,
                    deadline = %p.deadline,
                    "task could not be fully scheduled before its deadline"
                );
                shortfalls.push(Shortfall {
                    task_id: p.task.id.clone(),
                    title: p.task.title.clone(),
                    unallocated_hours: p.remaining,
                    deadline: p.deadline,
                });
            }
        }

        shortfalls
    }

    /// Round `raw` to hundredths, never past `cap`; `None` below the noise floor.
    fn assignable(&self, raw: f64, cap: f64) -> Option<f64> {
        if raw <= self.config.noise_floor_hours {
            return None;
        }
        let hours = round_hours(raw);
        if hours > cap {
            return Some((cap * 100.0).floor() / 100.0);
        }
        Some(hours)
    }
}

/// One-shot plan with the Japanese holiday calendar and the current UTC date as "today".
pub fn schedule(
    tasks: &[ScheduleTask],
    categories: &[CategorySetting],
    weekday_default_hours: f64,
    weekend_holiday_default_hours: Option<f64>,
    start: NaiveDate,
) -> Vec<Allocation> {
    let defaults = CapacityDefaults {
        weekday_hours: weekday_default_hours,
        weekend_holiday_hours: weekend_holiday_default_hours,
    };
    Scheduler::new(JapaneseHolidays, defaults)
        .schedule(tasks, categories, start, Utc::now().date_naive())
        .allocations
}
