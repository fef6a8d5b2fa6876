pub mod categories_csv;
pub mod fields;
pub mod snapshot_json;
pub mod tasks_csv;
