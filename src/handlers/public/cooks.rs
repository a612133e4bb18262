// handlers/public/cooks.rs - /api/cooks handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::database::models::{Cook, CookFields};
use crate::error::{ApiError, ApiResult};
use crate::handlers::{parse_id, JsonBody};
use crate::state::AppState;

/// POST /api/cooks - create a cook; absent fields are stored empty
pub async fn create_cook(State(state): State<AppState>, JsonBody(fields): JsonBody<CookFields>) -> ApiResult<Json<Cook>> {
    let cook = state.db.create_cook(Cook::new(fields)).await?;
    tracing::info!("Created cook {}", cook.id);
    Ok(Json(cook))
}

/// GET /api/cooks
pub async fn list_cooks(State(state): State<AppState>) -> ApiResult<Json<Vec<Cook>>> {
    Ok(Json(state.db.list_cooks().await?))
}

/// PUT /api/cooks/:cookID - overwrite name, desc and path of an existing cook
pub async fn update_cook(
    State(state): State<AppState>,
    Path(cook_id): Path<String>,
    JsonBody(fields): JsonBody<CookFields>,
) -> ApiResult<Json<Cook>> {
    let mut cook = match parse_id(&cook_id) {
        Some(id) => state.db.find_cook(id).await?,
        None => None,
    }
    .ok_or_else(|| ApiError::not_found("cook not found"))?;

    cook.overwrite(fields);
    Ok(Json(state.db.save_cook(&cook).await?))
}

/// DELETE /api/cooks/:cookID - succeeds whether or not the cook existed.
/// The cook's recipes are left in place.
pub async fn delete_cook(State(state): State<AppState>, Path(cook_id): Path<String>) -> ApiResult<StatusCode> {
    if let Some(id) = parse_id(&cook_id) {
        let removed = state.db.delete_cook(id).await?;
        tracing::debug!("Deleted {} cook row(s) for {}", removed, id);
    }
    Ok(StatusCode::OK)
}
