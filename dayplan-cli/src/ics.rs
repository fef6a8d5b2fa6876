use chrono::{Duration, Utc};
use dayplan_core::Allocation;
use std::collections::BTreeMap;

/// Emit a minimal ICS calendar with one all-day VEVENT per allocation.
///
/// Notes:
/// - UIDs are stable per (task, date), so re-importing a replanned day updates it.
/// - DTEND is exclusive, hence the following day.
pub fn allocations_to_ics<'a>(
    allocs: impl IntoIterator<Item = &'a Allocation>,
    titles: &BTreeMap<String, String>,
) -> String {
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
    let mut s = String::new();
    s.push_str("BEGIN:VCALENDAR\nVERSION:2.0\nPRODID:-//dayplan//EN\n");

    for a in allocs {
        let title = titles.get(&a.task_id).map(String::as_str).unwrap_or(&a.task_id);
        let start = a.date.format("%Y%m%d");
        let end = (a.date + Duration::days(1)).format("%Y%m%d");

        s.push_str("BEGIN:VEVENT\n");
        s.push_str(&format!("UID:dayplan-{}-{}@dayplan\n", escape_ics(&a.task_id), start));
        s.push_str(&format!("DTSTAMP:{}\n", stamp));
        s.push_str(&format!("DTSTART;VALUE=DATE:{}\n", start));
        s.push_str(&format!("DTEND;VALUE=DATE:{}\n", end));
        s.push_str(&format!(
            "SUMMARY:{}\n",
            escape_ics(&format!("{} ({:.2}h)", title, a.scheduled_hours))
        ));
        s.push_str(&format!(
            "DESCRIPTION:{}\n",
            escape_ics(&format!(
                "TaskId: {}\nHours: {:.2}\nCategory: {}\n",
                a.task_id,
                a.scheduled_hours,
                a.category_name.as_deref().unwrap_or("-")
            ))
        ));
        s.push_str("END:VEVENT\n");
    }

    s.push_str("END:VCALENDAR\n");
    s
}

fn escape_ics(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}
