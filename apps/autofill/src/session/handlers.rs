use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::field::FieldSnapshot;
use crate::models::job::JobContext;
use crate::outcomes::{record_application_result, record_job_description};
use crate::session::{process_field, FieldReport, SessionSummary, Workspace};
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub job: Option<JobContext>,
}

#[derive(Deserialize)]
pub struct FormRequest {
    pub fields: Vec<FieldSnapshot>,
}

#[derive(Serialize)]
pub struct FormResponse {
    pub fields: Vec<FieldReport>,
    pub session: SessionSummary,
}

#[derive(Deserialize)]
pub struct ResultRequest {
    pub success: bool,
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> (StatusCode, Json<SessionSummary>) {
    let mut workspace = state.workspace.lock().await;
    let summary = workspace.open_session(req.job).summary();
    (StatusCode::CREATED, Json(summary))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    let workspace = state.workspace.lock().await;
    let session = workspace.sessions.get(&id).ok_or_else(|| session_not_found(id))?;
    Ok(Json(session.summary()))
}

/// DELETE /api/v1/sessions/:id
/// Abandons a session without recording an outcome.
pub async fn handle_close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut workspace = state.workspace.lock().await;
    workspace
        .close_session(&id)
        .ok_or_else(|| session_not_found(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/fields
pub async fn handle_resolve_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(snapshot): Json<FieldSnapshot>,
) -> Result<Json<FieldReport>, AppError> {
    let mut guard = state.workspace.lock().await;
    let Workspace { store, sessions } = &mut *guard;
    let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;

    let report = process_field(&state.resolver, &snapshot, store, session).await;
    Ok(Json(report))
}

/// POST /api/v1/sessions/:id/form
/// Fields are resolved in the order given; the lock is held for the whole form.
pub async fn handle_resolve_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FormRequest>,
) -> Result<Json<FormResponse>, AppError> {
    let mut guard = state.workspace.lock().await;
    let Workspace { store, sessions } = &mut *guard;
    let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;

    let mut fields = Vec::with_capacity(req.fields.len());
    for snapshot in &req.fields {
        fields.push(process_field(&state.resolver, snapshot, store, session).await);
    }
    info!("Resolved {} fields for session {id}", fields.len());

    Ok(Json(FormResponse {
        fields,
        session: session.summary(),
    }))
}

/// POST /api/v1/sessions/:id/result
/// Records the outcome against the session's job and closes the session.
pub async fn handle_record_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ResultRequest>,
) -> Result<Json<SessionSummary>, AppError> {
    let mut workspace = state.workspace.lock().await;
    let session = workspace.sessions.get(&id).ok_or_else(|| session_not_found(id))?;
    let job = session.job.as_ref().ok_or_else(|| {
        AppError::Validation(format!("Session {id} has no job context to record against"))
    })?;

    let data_dir = state.config.data_dir.as_path();
    record_application_result(data_dir, &job.id, req.success)?;
    if req.success {
        record_job_description(data_dir, job)?;
    }

    let summary = session.summary();
    workspace.sessions.remove(&id);
    info!(
        "Closed session {id} (success: {}, cover letter used: {})",
        req.success, summary.used_cover
    );
    Ok(Json(summary))
}
