//! Task snapshot CSV.
//!
//! Expected header (column order free, trailing columns optional):
//!   id,title,category,due,estimate,progress,priority,status
//!   t1,Quarterly report,work,2026-11-06,6h,25%,high,in_progress

use anyhow::{Context, Result};
use dayplan_core::TaskRecord;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use super::fields::{
    optional_text, parse_hours, parse_optional_date, parse_priority, parse_progress, parse_status,
};

#[derive(Debug, Deserialize)]
struct TaskRow {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    due: String,
    #[serde(default)]
    estimate: String,
    #[serde(default)]
    progress: String,
    #[serde(default)]
    priority: String,
    #[serde(default)]
    status: String,
}

impl TaskRow {
    fn into_record(self) -> Result<TaskRecord> {
        Ok(TaskRecord {
            title: if self.title.trim().is_empty() {
                self.id.clone()
            } else {
                self.title.trim().to_string()
            },
            id: self.id,
            category_name: optional_text(&self.category),
            due_date: parse_optional_date(&self.due)?,
            estimated_hours: parse_hours(&self.estimate)?,
            progress: parse_progress(&self.progress)?,
            priority: parse_priority(&self.priority)?,
            status: parse_status(&self.status)?,
        })
    }
}

pub fn parse_tasks_csv(path: impl AsRef<Path>) -> Result<Vec<TaskRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_tasks_reader(file).with_context(|| format!("parsing {}", path.display()))
}

/// Rows with a blank id are skipped; any other bad cell fails with its line number.
pub fn parse_tasks_reader(reader: impl Read) -> Result<Vec<TaskRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers().context("reading header row")?.clone();
    let id_col = headers.iter().position(|h| h == "id").unwrap_or(0);

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.get(id_col).is_none_or(|id| id.is_empty()) {
            continue;
        }

        let row: TaskRow = record
            .deserialize(Some(&headers))
            .with_context(|| format!("line {line}"))?;
        out.push(row.into_record().with_context(|| format!("line {line}"))?);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dayplan_core::{Priority, TaskStatus};
    use std::io::Write;

    const SAMPLE: &str = "\
id,title,category,due,estimate,progress,priority,status
t1,Quarterly report,work,2026-11-06,6h,25%,high,in_progress
t2,Read chapter 4,study,,90m,,,
,blank id row,,,,,,
t3,Old chore,home,,2,100,low,done
";

    #[test]
    fn test_parse_sample() {
        let tasks = parse_tasks_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(tasks.len(), 3);

        assert_eq!(tasks[0].id, "t1");
        assert_eq!(tasks[0].category_name.as_deref(), Some("work"));
        assert_eq!(tasks[0].due_date, NaiveDate::from_ymd_opt(2026, 11, 6));
        assert_eq!(tasks[0].estimated_hours, Some(6.0));
        assert_eq!(tasks[0].progress, Some(25.0));
        assert_eq!(tasks[0].priority, Some(Priority::High));
        assert_eq!(tasks[0].status, TaskStatus::InProgress);
        assert!((tasks[0].remaining_hours() - 4.5).abs() < 1e-9);

        assert_eq!(tasks[1].due_date, None);
        assert_eq!(tasks[1].estimated_hours, Some(1.5));
        assert_eq!(tasks[1].priority, None);
        assert_eq!(tasks[1].status, TaskStatus::Todo);

        assert_eq!(tasks[2].status, TaskStatus::Done);
    }

    #[test]
    fn test_missing_optional_columns() {
        let csv = "id,title,estimate\nx,Only estimate,3\n";
        let tasks = parse_tasks_reader(csv.as_bytes()).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].category_name, None);
        assert_eq!(tasks[0].estimated_hours, Some(3.0));
    }

    #[test]
    fn test_bad_cell_names_the_line() {
        let csv = "id,title,due\nok,fine,2026-11-01\nbad,broken,11/02/2026\n";
        let err = parse_tasks_reader(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("line 3"), "{err:#}");
    }

    #[test]
    fn test_parse_from_file() {
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        f.write_all(SAMPLE.as_bytes()).unwrap();
        let tasks = parse_tasks_csv(f.path()).unwrap();
        assert_eq!(tasks.len(), 3);
    }
}
