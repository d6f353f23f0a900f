use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::{patch, post};
use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::db::repository;
use crate::error::AppError;
use crate::models::*;
use crate::services::{ImportService, ScheduleService};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedules", get(list_schedules).post(create_schedule))
        .route("/schedules/{id}", patch(update_schedule).delete(delete_schedule))
        .route("/schedules/import", post(import_schedules))
        .route("/teachers", get(list_teachers).post(create_teacher))
        .route("/subjects", get(list_subjects).post(create_subject))
        .route("/sections", post(create_section))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_schedules(
    State(state): State<AppState>,
    Query(filter): Query<ScheduleFilter>,
) -> Result<Json<Vec<SessionView>>, AppError> {
    let sessions = ScheduleService::new(state.db).list(&filter).await?;
    Ok(Json(sessions))
}

async fn create_schedule(
    State(state): State<AppState>,
    Json(req): Json<NewSessionRequest>,
) -> Result<(StatusCode, Json<Session>), AppError> {
    let session = ScheduleService::new(state.db).create(req).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateSessionRequest>,
) -> Result<Json<Session>, AppError> {
    let session = ScheduleService::new(state.db).update(&id, patch).await?;
    Ok(Json(session))
}

async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    ScheduleService::new(state.db).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn import_schedules(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<ImportSummary>, AppError> {
    let summary = ImportService::new(state.db).import_batch(req).await?;
    Ok(Json(summary))
}

async fn list_teachers(State(state): State<AppState>) -> Result<Json<Vec<Teacher>>, AppError> {
    let teachers = repository::fetch_teachers(&state.db).await?;
    Ok(Json(teachers))
}

async fn create_teacher(
    State(state): State<AppState>,
    Json(req): Json<NewTeacherRequest>,
) -> Result<(StatusCode, Json<Teacher>), AppError> {
    let teacher = repository::insert_teacher(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

async fn list_subjects(State(state): State<AppState>) -> Result<Json<Vec<Subject>>, AppError> {
    let subjects = repository::fetch_active_subjects(&state.db).await?;
    Ok(Json(subjects))
}

async fn create_subject(
    State(state): State<AppState>,
    Json(req): Json<NewSubjectRequest>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    let subject = repository::insert_subject(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

async fn create_section(
    State(state): State<AppState>,
    Json(req): Json<NewSectionRequest>,
) -> Result<(StatusCode, Json<Section>), AppError> {
    let section = repository::insert_section(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(section)))
}
