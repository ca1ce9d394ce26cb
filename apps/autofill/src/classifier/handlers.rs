use axum::Json;

use crate::classifier::classify;
use crate::models::field::{FieldDescriptor, FieldSnapshot};

/// POST /api/v1/fields/classify
/// Pure classification; touches neither the store nor any session.
pub async fn handle_classify(Json(snapshot): Json<FieldSnapshot>) -> Json<FieldDescriptor> {
    Json(classify(&snapshot))
}
