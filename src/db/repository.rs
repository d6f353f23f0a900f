use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::models::{
    NewSectionRequest, NewSubjectRequest, NewTeacherRequest, ScheduleFilter, Section, Session,
    SessionView, Subject, Teacher,
};

const SESSION_COLUMNS: &str = "id, section_id, subject_id, teacher_id, academic_year, quarter, \
     week, start_time, end_time, class_mode, room, created_at, updated_at";

pub async fn insert_session<'e, E>(db: E, session: &Session) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO sessions \
            (id, section_id, subject_id, teacher_id, academic_year, quarter, \
            week, start_time, end_time, class_mode, room, created_at, updated_at) \
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&session.id)
    .bind(&session.section_id)
    .bind(&session.subject_id)
    .bind(&session.teacher_id)
    .bind(&session.academic_year)
    .bind(session.quarter)
    .bind(&session.week)
    .bind(&session.start_time)
    .bind(&session.end_time)
    .bind(session.class_mode)
    .bind(&session.room)
    .bind(&session.created_at)
    .bind(&session.updated_at)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn find_session_by_id<'e, E>(db: E, id: &str) -> Result<Option<Session>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?");
    sqlx::query_as::<_, Session>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn update_session<'e, E>(db: E, session: &Session) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "UPDATE sessions \
        SET subject_id = ?, teacher_id = ?, week = ?, start_time = ?, end_time = ?, \
            class_mode = ?, room = ?, updated_at = ? \
        WHERE id = ?",
    )
    .bind(&session.subject_id)
    .bind(&session.teacher_id)
    .bind(&session.week)
    .bind(&session.start_time)
    .bind(&session.end_time)
    .bind(session.class_mode)
    .bind(&session.room)
    .bind(&session.updated_at)
    .bind(&session.id)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn delete_session(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Looks for any persisted session that collides with the candidate on the
/// section, room, or teacher dimension. The three dimensions are one OR'd
/// query, scoped to the candidate's (academic_year, quarter) and day of
/// week, with half-open interval overlap: touching boundaries do not
/// collide. A NULL room never matches another NULL room.
pub async fn find_conflicting_session<'e, E>(
    db: E,
    candidate: &Session,
    exclude_id: Option<&str>,
) -> Result<Option<Session>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {SESSION_COLUMNS} FROM sessions \
        WHERE academic_year = ? AND quarter = ? AND week = ? \
            AND start_time < ? AND end_time > ? \
            AND (section_id = ? OR teacher_id = ? OR room = ?) \
            AND (? IS NULL OR id <> ?) \
        LIMIT 1"
    );
    sqlx::query_as::<_, Session>(&sql)
        .bind(&candidate.academic_year)
        .bind(candidate.quarter)
        .bind(&candidate.week)
        .bind(&candidate.end_time)
        .bind(&candidate.start_time)
        .bind(&candidate.section_id)
        .bind(&candidate.teacher_id)
        .bind(&candidate.room)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_optional(db)
        .await
}

pub async fn fetch_sessions(
    db: &SqlitePool,
    filter: &ScheduleFilter,
) -> Result<Vec<SessionView>, sqlx::Error> {
    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT s.id, s.section_id, s.subject_id, s.teacher_id, s.academic_year, s.quarter, \
            s.week, s.start_time, s.end_time, s.class_mode, s.room, \
            COALESCE(sub.subject_name, 'Unknown') AS subject_name, \
            COALESCE(t.first_name \
                || CASE WHEN t.middle_name IS NULL OR t.middle_name = '' \
                        THEN '' ELSE ' ' || t.middle_name END \
                || ' ' || t.last_name, 'Unknown') AS teacher_name \
        FROM sessions s \
        LEFT JOIN subjects sub ON sub.id = s.subject_id \
        LEFT JOIN teachers t ON t.id = s.teacher_id \
        WHERE 1 = 1",
    );

    if let Some(section_id) = &filter.section_id {
        query.push(" AND s.section_id = ").push_bind(section_id.as_str());
    }
    if let Some(teacher_id) = &filter.teacher_id {
        query.push(" AND s.teacher_id = ").push_bind(teacher_id.as_str());
    }
    if let Some(academic_year) = &filter.academic_year {
        query
            .push(" AND s.academic_year = ")
            .push_bind(academic_year.as_str());
    }
    if let Some(quarter) = filter.quarter {
        query.push(" AND s.quarter = ").push_bind(quarter);
    }
    query.push(" ORDER BY s.week, s.start_time");

    query
        .build_query_as::<SessionView>()
        .fetch_all(db)
        .await
}

pub async fn insert_teacher(
    db: &SqlitePool,
    req: NewTeacherRequest,
) -> Result<Teacher, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO teachers (id, first_name, middle_name, last_name, email, is_active, created_at) \
        VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&req.first_name)
    .bind(&req.middle_name)
    .bind(&req.last_name)
    .bind(&req.email)
    .bind(req.is_active)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Teacher {
        id,
        first_name: req.first_name,
        middle_name: req.middle_name,
        last_name: req.last_name,
        email: req.email,
        is_active: req.is_active,
        created_at: now,
    })
}

/// Full teacher directory, active and inactive. Import needs inactive
/// entries too so it can report "Teacher is inactive" rather than
/// "Teacher not found".
pub async fn fetch_teachers(db: &SqlitePool) -> Result<Vec<Teacher>, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(
        "SELECT id, first_name, middle_name, last_name, email, is_active, created_at \
        FROM teachers ORDER BY last_name, first_name",
    )
    .fetch_all(db)
    .await
}

pub async fn insert_subject(
    db: &SqlitePool,
    req: NewSubjectRequest,
) -> Result<Subject, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO subjects (id, subject_name, grade_level, is_active, created_at) \
        VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&req.subject_name)
    .bind(req.grade_level)
    .bind(req.is_active)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Subject {
        id,
        subject_name: req.subject_name,
        grade_level: req.grade_level,
        is_active: req.is_active,
        created_at: now,
    })
}

pub async fn fetch_active_subjects(db: &SqlitePool) -> Result<Vec<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(
        "SELECT id, subject_name, grade_level, is_active, created_at \
        FROM subjects WHERE is_active = 1 ORDER BY subject_name",
    )
    .fetch_all(db)
    .await
}

pub async fn insert_section(
    db: &SqlitePool,
    req: NewSectionRequest,
) -> Result<Section, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO sections (id, name, grade, is_active, created_at) \
        VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&req.name)
    .bind(req.grade)
    .bind(req.is_active)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Section {
        id,
        name: req.name,
        grade: req.grade,
        is_active: req.is_active,
        created_at: now,
    })
}

pub async fn find_section_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<Section>, sqlx::Error> {
    sqlx::query_as::<_, Section>(
        "SELECT id, name, grade, is_active, created_at FROM sections WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}
