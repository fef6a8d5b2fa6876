//! dayplan-core: task-to-day allocation for the dayplan planner.
//!
//! No I/O happens here. Callers hand in task and category snapshots and get
//! back date-sorted allocations plus any shortfalls.

pub mod allocator;
pub mod calendar;
pub mod holidays;
pub mod ledger;
pub mod scoring;
pub mod store;
pub mod task;
pub mod time;

pub use allocator::{ScheduleOutcome, Scheduler, SchedulerConfig, Shortfall, schedule};
pub use calendar::{CapacityCalendar, HolidayTable, WeekendsOnly, is_weekend};
pub use holidays::{JapaneseHolidays, holiday_name};
pub use ledger::{Bucket, CapacityLedger, round_hours};
pub use scoring::score;
pub use store::{group_by_day, in_range, replace_from, totals_by_task};
pub use task::{
    Allocation, CapacityDefaults, CategorySetting, Priority, ScheduleTask, TaskRecord, TaskStatus,
    schedulable,
};
