// handlers/protected/favorites.rs - /api/users favorites handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::database::models::Recipe;
use crate::error::{ApiError, ApiResult};
use crate::handlers::parse_id;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// POST /api/users/add/:recipeID - append to favorites, duplicates allowed
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(recipe_id): Path<String>,
) -> ApiResult<StatusCode> {
    let recipe = match parse_id(&recipe_id) {
        Some(id) => state.db.find_recipe(id).await?,
        None => None,
    }
    .ok_or_else(|| ApiError::not_found("recipe not found"))?;

    state.db.push_favorite(user.id, recipe.id).await?;
    Ok(StatusCode::OK)
}

/// GET /api/users/recipes - favorites in the order they were added
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Recipe>>> {
    Ok(Json(state.db.favorite_recipes(user.id).await?))
}

/// DELETE /api/users/remove/:recipeID - drop every occurrence; absent is fine
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(recipe_id): Path<String>,
) -> ApiResult<StatusCode> {
    if let Some(id) = parse_id(&recipe_id) {
        state.db.pull_favorite(user.id, id).await?;
    }
    Ok(StatusCode::OK)
}
