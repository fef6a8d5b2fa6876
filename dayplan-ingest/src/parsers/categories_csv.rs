//! Category settings CSV.
//!
//!   name,daily_limit,weekend_holiday,priority
//!   work,6,1,
//!   study,2h,4h,medium

use anyhow::{Context, Result};
use dayplan_core::CategorySetting;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use super::fields::{parse_hours, parse_priority};

#[derive(Debug, Deserialize)]
struct CategoryRow {
    name: String,
    #[serde(default)]
    daily_limit: String,
    #[serde(default)]
    weekend_holiday: String,
    #[serde(default)]
    priority: String,
}

pub fn parse_categories_csv(path: impl AsRef<Path>) -> Result<Vec<CategorySetting>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_categories_reader(file).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_categories_reader(reader: impl Read) -> Result<Vec<CategorySetting>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers().context("reading header row")?.clone();

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let row: CategoryRow = record
            .deserialize(Some(&headers))
            .with_context(|| format!("line {line}"))?;
        if row.name.is_empty() {
            continue;
        }

        out.push(CategorySetting {
            daily_limit_hours: parse_hours(&row.daily_limit).with_context(|| format!("line {line}"))?,
            weekend_holiday_hours: parse_hours(&row.weekend_holiday)
                .with_context(|| format!("line {line}"))?,
            priority: parse_priority(&row.priority).with_context(|| format!("line {line}"))?,
            name: row.name,
        });
    }

    Ok(out)
}
