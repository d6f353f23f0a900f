use serde::{Deserialize, Serialize};

use crate::models::session::Quarter;

/// One loosely-structured spreadsheet row. Every field is optional at the
/// schema level; the import engine rejects incomplete rows with a reason
/// instead of failing deserialization of the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRow {
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub subject_name: Option<String>,
    #[serde(default)]
    pub week: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub class_mode: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportRequest {
    pub section_id: String,
    pub academic_year: String,
    pub quarter: Quarter,
    pub rows: Vec<ImportRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    pub record: ImportRow,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub success_count: usize,
    pub error_count: usize,
    pub skipped: Vec<SkippedRow>,
}
