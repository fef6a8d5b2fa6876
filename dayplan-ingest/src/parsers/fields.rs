//! Lenient field parsers shared by the CSV loaders.
//!
//! Empty cells mean "not set" and come back as `None`.

use anyhow::{Result, bail};
use chrono::NaiveDate;
use dayplan_core::{Priority, TaskStatus};
use regex::Regex;
use std::sync::LazyLock;

static HOURS_MINUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<h>\d+(?:\.\d+)?)\s*h)?\s*(?:(?P<m>\d+(?:\.\d+)?)\s*m(?:in)?)?$")
        .expect("static regex")
});

/// Hours from "2.5", "2.5h", "90m", "1h30m" or "1h 30min".
pub fn parse_hours(s: &str) -> Result<Option<f64>> {
    let s = s.trim().to_ascii_lowercase();
    if s.is_empty() {
        return Ok(None);
    }
    if let Ok(h) = s.parse::<f64>() {
        return non_negative(h, &s).map(Some);
    }

    let Some(caps) = HOURS_MINUTES.captures(&s) else {
        bail!("invalid duration '{s}'");
    };
    let hours = caps.name("h").map(|m| m.as_str().parse::<f64>()).transpose()?;
    let minutes = caps.name("m").map(|m| m.as_str().parse::<f64>()).transpose()?;
    if hours.is_none() && minutes.is_none() {
        bail!("invalid duration '{s}'");
    }
    let total = hours.unwrap_or(0.0) + minutes.unwrap_or(0.0) / 60.0;
    non_negative(total, &s).map(Some)
}

/// Progress percent from "40" or "40%".
pub fn parse_progress(s: &str) -> Result<Option<f64>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    let n = s.strip_suffix('%').unwrap_or(s).trim();
    let p: f64 = n
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid progress '{s}'"))?;
    if !(0.0..=100.0).contains(&p) {
        bail!("progress out of range 0-100: {s}");
    }
    Ok(Some(p))
}

pub fn parse_priority(s: &str) -> Result<Option<Priority>> {
    let p = match s.trim().to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "high" | "h" => Priority::High,
        "medium" | "med" | "m" => Priority::Medium,
        "low" | "l" => Priority::Low,
        "none" => Priority::None,
        other => bail!("invalid priority '{other}' (expected high|medium|low|none)"),
    };
    Ok(Some(p))
}

pub fn parse_status(s: &str) -> Result<TaskStatus> {
    let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
    Ok(match normalized.as_str() {
        "" | "todo" => TaskStatus::Todo,
        "in_progress" | "doing" => TaskStatus::InProgress,
        "done" | "completed" => TaskStatus::Done,
        _ => bail!("invalid status '{s}' (expected todo|in_progress|done)"),
    })
}

pub fn parse_optional_date(s: &str) -> Result<Option<NaiveDate>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    dayplan_core::time::parse_date(s).map(Some)
}

pub fn optional_text(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn non_negative(h: f64, raw: &str) -> Result<f64> {
    if !h.is_finite() || h < 0.0 {
        bail!("hours must be a non-negative number: {raw}");
    }
    Ok(h)
}
