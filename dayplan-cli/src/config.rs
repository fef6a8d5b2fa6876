use anyhow::{Context, Result};
use chrono::NaiveDate;
use dayplan_core::{
    CapacityCalendar, CapacityDefaults, HolidayTable, JapaneseHolidays, SchedulerConfig, WeekendsOnly,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_dayplan_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub capacity: CapacitySection,
    pub calendar: CalendarSection,
    pub planner: PlannerSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacitySection {
    /// Ordinary-day hours when a category has no override.
    pub weekday_hours: f64,
    /// Weekend/holiday hours; unset means weekday_hours.
    pub weekend_holiday_hours: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidaySet {
    /// Japanese national holidays.
    Jp,
    /// Saturdays and Sundays only.
    Weekends,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSection {
    pub timezone: String,
    pub holidays: HolidaySet,
    /// Personal days off on top of the holiday set.
    pub extra_holidays: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSection {
    pub horizon_days: u32,
    pub default_deadline_days: i64,
}

impl Default for CapacitySection {
    fn default() -> Self {
        Self {
            weekday_hours: 8.0,
            weekend_holiday_hours: None,
        }
    }
}

impl Default for CalendarSection {
    fn default() -> Self {
        Self {
            timezone: "Asia/Tokyo".to_string(),
            holidays: HolidaySet::Jp,
            extra_holidays: Vec::new(),
        }
    }
}

impl Default for PlannerSection {
    fn default() -> Self {
        let engine = SchedulerConfig::default();
        Self {
            horizon_days: engine.horizon_days,
            default_deadline_days: engine.default_deadline_days,
        }
    }
}

impl Config {
    pub fn defaults(&self) -> CapacityDefaults {
        CapacityDefaults {
            weekday_hours: self.capacity.weekday_hours,
            weekend_holiday_hours: self.capacity.weekend_holiday_hours,
        }
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            defaults: self.defaults(),
            horizon_days: self.planner.horizon_days,
            default_deadline_days: self.planner.default_deadline_days,
            ..SchedulerConfig::default()
        }
    }

    pub fn calendar(&self) -> Box<dyn CapacityCalendar + Send + Sync> {
        let extra = self.calendar.extra_holidays.iter().copied();
        match self.calendar.holidays {
            HolidaySet::Jp if self.calendar.extra_holidays.is_empty() => Box::new(JapaneseHolidays),
            HolidaySet::Jp => Box::new(HolidayTable::new(extra).with_base(JapaneseHolidays)),
            HolidaySet::Weekends if self.calendar.extra_holidays.is_empty() => Box::new(WeekendsOnly),
            HolidaySet::Weekends => Box::new(HolidayTable::new(extra)),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_dayplan_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
