use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    NewSessionRequest, ScheduleFilter, Session, SessionView, UpdateSessionRequest,
};
use crate::services::conflict;
use crate::services::timefmt::normalize_time;

/// Conflict-checked write access to the schedule store. All session
/// mutations go through here; the conflict check and the write share one
/// transaction so concurrent submissions serialize at the database.
pub struct ScheduleService {
    db: SqlitePool,
}

impl ScheduleService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: NewSessionRequest) -> Result<Session, AppError> {
        let now = Utc::now().to_rfc3339();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            section_id: req.section_id,
            subject_id: req.subject_id,
            teacher_id: req.teacher_id,
            academic_year: req.academic_year,
            quarter: req.quarter,
            week: req.week,
            start_time: normalize_time(&req.start_time)?,
            end_time: normalize_time(&req.end_time)?,
            class_mode: req.class_mode,
            room: normalize_room(req.room),
            created_at: now.clone(),
            updated_at: now,
        };
        validate_session(&session)?;

        // BEGIN IMMEDIATE takes the write lock before the conflict query, so
        // a concurrent submission waits here and then sees the winner's
        // committed row instead of failing its own write.
        let mut tx = self.db.begin_with("BEGIN IMMEDIATE").await?;
        if let Some(found) = conflict::check_conflict(&mut *tx, &session, None).await? {
            return Err(AppError::Conflict(found.message()));
        }
        repository::insert_session(&mut *tx, &session).await?;
        tx.commit().await?;

        info!(
            "created session {} ({} {}-{})",
            session.id, session.week, session.start_time, session.end_time
        );
        Ok(session)
    }

    pub async fn update(&self, id: &str, patch: UpdateSessionRequest) -> Result<Session, AppError> {
        let mut current = repository::find_session_by_id(&self.db, id)
            .await?
            .ok_or(AppError::NotFound)?;

        if let Some(section_id) = patch.section_id {
            current.section_id = section_id;
        }
        if let Some(subject_id) = patch.subject_id {
            current.subject_id = subject_id;
        }
        if let Some(teacher_id) = patch.teacher_id {
            current.teacher_id = teacher_id;
        }
        if let Some(week) = patch.week {
            current.week = week;
        }
        if let Some(start_time) = patch.start_time {
            current.start_time = normalize_time(&start_time)?;
        }
        if let Some(end_time) = patch.end_time {
            current.end_time = normalize_time(&end_time)?;
        }
        if let Some(class_mode) = patch.class_mode {
            current.class_mode = class_mode;
            // switching to a mode without physical presence releases the room
            if !class_mode.requires_room() && patch.room.is_none() {
                current.room = None;
            }
        }
        if let Some(room) = patch.room {
            // a blank room in the patch clears the assignment
            current.room = normalize_room(Some(room));
        }
        current.updated_at = Utc::now().to_rfc3339();
        validate_session(&current)?;

        let mut tx = self.db.begin_with("BEGIN IMMEDIATE").await?;
        if let Some(found) = conflict::check_conflict(&mut *tx, &current, Some(id)).await? {
            return Err(AppError::Conflict(found.message()));
        }
        repository::update_session(&mut *tx, &current).await?;
        tx.commit().await?;

        Ok(current)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        if repository::delete_session(&self.db, id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }

    pub async fn list(&self, filter: &ScheduleFilter) -> Result<Vec<SessionView>, AppError> {
        Ok(repository::fetch_sessions(&self.db, filter).await?)
    }
}

/// Rooms compare by plain string equality in the conflict query, so " 101 "
/// and "101" must not persist as distinct values.
fn normalize_room(room: Option<String>) -> Option<String> {
    room.as_deref()
        .map(str::trim)
        .filter(|room| !room.is_empty())
        .map(str::to_string)
}

fn validate_session(session: &Session) -> Result<(), AppError> {
    if session.start_time >= session.end_time {
        return Err(AppError::Validation(
            "Start time must be before end time".to_string(),
        ));
    }

    let has_room = session
        .room
        .as_deref()
        .map(str::trim)
        .is_some_and(|room| !room.is_empty());
    if session.class_mode.requires_room() && !has_room {
        return Err(AppError::Validation(
            "Room is required for face-to-face sessions".to_string(),
        ));
    }

    Ok(())
}
