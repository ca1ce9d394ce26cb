use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct AnswersResponse {
    pub answers: BTreeMap<String, String>,
    pub count: usize,
}

#[derive(Deserialize)]
pub struct SetAnswerRequest {
    pub label: String,
    pub value: String,
}

/// GET /api/v1/answers
pub async fn handle_list_answers(State(state): State<AppState>) -> Json<AnswersResponse> {
    let workspace = state.workspace.lock().await;
    let answers = workspace.store.answers().clone();
    Json(AnswersResponse {
        count: answers.len(),
        answers,
    })
}

/// PUT /api/v1/answers
/// Manual answer entry. Written through to disk before returning.
pub async fn handle_set_answer(
    State(state): State<AppState>,
    Json(req): Json<SetAnswerRequest>,
) -> Result<StatusCode, AppError> {
    let label = req.label.trim();
    if label.is_empty() {
        return Err(AppError::Validation("label must not be empty".to_string()));
    }

    let mut workspace = state.workspace.lock().await;
    workspace.store.insert(label, req.value);
    workspace.store.flush()?;
    info!("Stored manual answer for '{label}'");
    Ok(StatusCode::NO_CONTENT)
}
