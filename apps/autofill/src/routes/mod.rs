pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::classifier::handlers as classifier;
use crate::session::handlers as sessions;
use crate::state::AppState;
use crate::store::handlers as answers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Field classification
        .route("/api/v1/fields/classify", post(classifier::handle_classify))
        // Sessions
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_close_session),
        )
        .route(
            "/api/v1/sessions/:id/fields",
            post(sessions::handle_resolve_field),
        )
        .route(
            "/api/v1/sessions/:id/form",
            post(sessions::handle_resolve_form),
        )
        .route(
            "/api/v1/sessions/:id/result",
            post(sessions::handle_record_result),
        )
        // Stored answers
        .route(
            "/api/v1/answers",
            get(answers::handle_list_answers).put(answers::handle_set_answer),
        )
        .with_state(state)
}
