use std::collections::HashMap;

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    ClassMode, ImportRequest, ImportRow, ImportSummary, NewSessionRequest, Quarter, SkippedRow,
    Subject, Teacher,
};
use crate::services::schedule::ScheduleService;
use crate::services::timefmt::normalize_time;

/// Why an import row was skipped. Rendered into the `skipped` ledger;
/// a skipped row never aborts the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("Missing teacher or subject name")]
    MissingName,
    #[error("Teacher not found")]
    TeacherNotFound,
    #[error("Teacher is inactive")]
    TeacherInactive,
    #[error("Subject not found")]
    SubjectNotFound,
    #[error("Missing day of week")]
    MissingWeek,
    #[error("Missing start or end time")]
    MissingTime,
    #[error("Invalid time format")]
    MalformedTime,
    #[error("Start time must be before end time")]
    InvalidInterval,
    #[error("Missing or invalid class mode")]
    InvalidClassMode,
    #[error("Room is required for face-to-face sessions")]
    RoomRequired,
    #[error("Schedule conflict detected")]
    Conflict,
}

/// Bulk import of spreadsheet rows into one section's schedule.
///
/// Rows are processed sequentially and independently: each row is resolved
/// against a directory snapshot taken once at batch start, conflict-checked,
/// and either inserted or recorded in the ledger with a reason. Later rows
/// see earlier rows' inserts, so duplicates inside one batch are caught.
pub struct ImportService {
    db: SqlitePool,
}

impl ImportService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Row-level failures go to the ledger and the batch always completes.
    /// An infrastructure error (dead database) aborts the remainder of the
    /// batch; rows inserted before the failure remain persisted.
    pub async fn import_batch(&self, req: ImportRequest) -> Result<ImportSummary, AppError> {
        // The target section is a batch-level precondition: nothing is
        // processed when it is missing or inactive.
        let section = repository::find_section_by_id(&self.db, &req.section_id)
            .await?
            .ok_or(AppError::NotFound)?;
        if !section.is_active {
            return Err(AppError::Validation("Section is inactive".to_string()));
        }

        // One directory snapshot for the whole batch. Rows match against the
        // directory as it stood at batch start; mid-batch directory edits are
        // invisible by design.
        let teachers = repository::fetch_teachers(&self.db).await?;
        let subjects = repository::fetch_active_subjects(&self.db).await?;
        let teachers_by_name: HashMap<String, &Teacher> = teachers
            .iter()
            .map(|t| (normalize_name(&t.full_name()), t))
            .collect();
        let subjects_by_name: HashMap<&str, &Subject> = subjects
            .iter()
            .map(|s| (s.subject_name.trim(), s))
            .collect();

        let schedule = ScheduleService::new(self.db.clone());
        let mut summary = ImportSummary {
            success_count: 0,
            error_count: 0,
            skipped: Vec::new(),
        };

        for row in req.rows {
            let resolved = resolve_row(
                &req.section_id,
                &req.academic_year,
                req.quarter,
                &row,
                &teachers_by_name,
                &subjects_by_name,
            );

            let outcome = match resolved {
                Ok(session_req) => match schedule.create(session_req).await {
                    Ok(_) => Ok(()),
                    Err(AppError::Conflict(_)) => Err(SkipReason::Conflict),
                    // infrastructure failure, not a row problem
                    Err(other) => return Err(other),
                },
                Err(reason) => Err(reason),
            };

            match outcome {
                Ok(()) => summary.success_count += 1,
                Err(reason) => {
                    warn!("skipped import row: {}", reason);
                    summary.error_count += 1;
                    summary.skipped.push(SkippedRow {
                        record: row,
                        reason: reason.to_string(),
                    });
                }
            }
        }

        info!(
            "import into section {} finished: {} inserted, {} skipped",
            section.name, summary.success_count, summary.error_count
        );
        Ok(summary)
    }
}

/// Validates one raw row and resolves its human-readable names to directory
/// ids. Pure with respect to the store: conflict checking happens later, on
/// the insert path.
fn resolve_row(
    section_id: &str,
    academic_year: &str,
    quarter: Quarter,
    row: &ImportRow,
    teachers_by_name: &HashMap<String, &Teacher>,
    subjects_by_name: &HashMap<&str, &Subject>,
) -> Result<NewSessionRequest, SkipReason> {
    let teacher_name = non_empty(row.teacher_name.as_deref()).ok_or(SkipReason::MissingName)?;
    let subject_name = non_empty(row.subject_name.as_deref()).ok_or(SkipReason::MissingName)?;

    let teacher = teachers_by_name
        .get(&normalize_name(teacher_name))
        .ok_or(SkipReason::TeacherNotFound)?;
    if !teacher.is_active {
        return Err(SkipReason::TeacherInactive);
    }
    let subject = subjects_by_name
        .get(subject_name)
        .ok_or(SkipReason::SubjectNotFound)?;

    let week = non_empty(row.week.as_deref()).ok_or(SkipReason::MissingWeek)?;
    let start_raw = non_empty(row.start_time.as_deref()).ok_or(SkipReason::MissingTime)?;
    let end_raw = non_empty(row.end_time.as_deref()).ok_or(SkipReason::MissingTime)?;
    let start_time = normalize_time(start_raw).map_err(|_| SkipReason::MalformedTime)?;
    let end_time = normalize_time(end_raw).map_err(|_| SkipReason::MalformedTime)?;
    if start_time >= end_time {
        return Err(SkipReason::InvalidInterval);
    }

    let class_mode = row
        .class_mode
        .as_deref()
        .and_then(ClassMode::from_label)
        .ok_or(SkipReason::InvalidClassMode)?;
    let room = non_empty(row.room.as_deref()).map(str::to_string);
    if class_mode.requires_room() && room.is_none() {
        return Err(SkipReason::RoomRequired);
    }

    Ok(NewSessionRequest {
        section_id: section_id.to_string(),
        subject_id: subject.id.clone(),
        teacher_id: teacher.id.clone(),
        academic_year: academic_year.to_string(),
        quarter,
        week: week.to_string(),
        start_time,
        end_time,
        class_mode,
        room,
    })
}

/// Case-insensitive, whitespace-normalized key for full-name matching.
fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_matching_ignores_case_and_extra_whitespace() {
        assert_eq!(normalize_name("  Maria  Clara  Santos "), "maria clara santos");
        assert_eq!(normalize_name("MARIA CLARA SANTOS"), "maria clara santos");
    }

    #[test]
    fn blank_strings_count_as_missing() {
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(" Math 7 ")), Some("Math 7"));
    }
}
