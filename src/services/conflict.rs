use sqlx::Sqlite;

use crate::db::repository;
use crate::models::Session;

/// Which field a rejected session collided on. Section, room, and teacher
/// are independent dimensions; sharing any one of them under overlapping
/// times on the same day is a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictDimension {
    Section,
    Room,
    Teacher,
}

impl ConflictDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictDimension::Section => "section",
            ConflictDimension::Room => "room",
            ConflictDimension::Teacher => "teacher",
        }
    }
}

/// Result of a conflict check: the first colliding session found, tagged
/// with the dimension it collided on.
#[derive(Debug, Clone)]
pub struct Conflict {
    pub existing: Session,
    pub dimension: ConflictDimension,
}

impl Conflict {
    pub fn message(&self) -> String {
        format!(
            "Schedule conflict detected: {} is already occupied on {} from {} to {}. Please adjust the schedule.",
            self.dimension.as_str(),
            self.existing.week,
            self.existing.start_time,
            self.existing.end_time,
        )
    }
}

/// Checks the candidate against every persisted session in the same
/// (academic_year, quarter). Sessions in other terms never conflict, no
/// matter how their times overlap. `exclude_id` carries the candidate's
/// own id on update so a session never conflicts with itself.
///
/// Run this on the same immediate transaction as the subsequent insert or
/// update: holding the write lock before the check is what closes the
/// check-then-write window between concurrent submissions.
pub async fn check_conflict<'e, E>(
    db: E,
    candidate: &Session,
    exclude_id: Option<&str>,
) -> Result<Option<Conflict>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let existing = repository::find_conflicting_session(db, candidate, exclude_id).await?;

    Ok(existing.map(|existing| {
        let dimension = classify(candidate, &existing);
        Conflict { existing, dimension }
    }))
}

fn classify(candidate: &Session, existing: &Session) -> ConflictDimension {
    if existing.section_id == candidate.section_id {
        ConflictDimension::Section
    } else if existing.teacher_id == candidate.teacher_id {
        ConflictDimension::Teacher
    } else {
        ConflictDimension::Room
    }
}
