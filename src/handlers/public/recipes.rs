// handlers/public/recipes.rs - recipe handlers, nested under a cook or global

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::database::models::{Cook, Recipe, RecipeFields};
use crate::error::{ApiError, ApiResult};
use crate::handlers::{parse_id, JsonBody};
use crate::state::AppState;

async fn require_cook(state: &AppState, cook_id: &str) -> ApiResult<Cook> {
    match parse_id(cook_id) {
        Some(id) => state.db.find_cook(id).await?,
        None => None,
    }
    .ok_or_else(|| ApiError::not_found("cook not found"))
}

/// Recipe lookup scoped to both ids from the path
async fn require_cook_recipe(state: &AppState, cook_id: &str, recipe_id: &str) -> ApiResult<Recipe> {
    match (parse_id(cook_id), parse_id(recipe_id)) {
        (Some(cook_id), Some(recipe_id)) => state.db.find_cook_recipe(cook_id, recipe_id).await?,
        _ => None,
    }
    .ok_or_else(|| ApiError::not_found("recipe not found"))
}

/// POST /api/cooks/:cookID/recipes
///
/// The cook must exist. The lookup and the insert are separate statements, so
/// a cook deleted in between still ends up with the new recipe.
pub async fn create_recipe(
    State(state): State<AppState>,
    Path(cook_id): Path<String>,
    JsonBody(fields): JsonBody<RecipeFields>,
) -> ApiResult<Json<Recipe>> {
    let cook = require_cook(&state, &cook_id).await?;
    let recipe = state.db.create_recipe(Recipe::new(cook.id, fields)).await?;
    tracing::info!("Created recipe {} for cook {}", recipe.id, cook.id);
    Ok(Json(recipe))
}

/// GET /api/cooks/:cookID/recipes
pub async fn list_cook_recipes(State(state): State<AppState>, Path(cook_id): Path<String>) -> ApiResult<Json<Vec<Recipe>>> {
    let cook = require_cook(&state, &cook_id).await?;
    Ok(Json(state.db.list_recipes_for_cook(cook.id).await?))
}

/// GET /api/recipes
pub async fn list_recipes(State(state): State<AppState>) -> ApiResult<Json<Vec<Recipe>>> {
    Ok(Json(state.db.list_recipes().await?))
}

/// GET /api/recipes/:recipeID - a missing recipe is answered with 400
pub async fn get_recipe(State(state): State<AppState>, Path(recipe_id): Path<String>) -> ApiResult<Json<Recipe>> {
    let found = match parse_id(&recipe_id) {
        Some(id) => state.db.find_recipe(id).await?,
        None => None,
    };
    found
        .map(Json)
        .ok_or_else(|| ApiError::bad_request("recipe not found"))
}

/// PUT /api/cooks/:cookID/recipes/:recipeID - `cook` is never reassigned
pub async fn update_recipe(
    State(state): State<AppState>,
    Path((cook_id, recipe_id)): Path<(String, String)>,
    JsonBody(fields): JsonBody<RecipeFields>,
) -> ApiResult<Json<Recipe>> {
    let mut recipe = require_cook_recipe(&state, &cook_id, &recipe_id).await?;
    recipe.overwrite(fields);
    Ok(Json(state.db.save_recipe(&recipe).await?))
}

/// DELETE /api/cooks/:cookID/recipes/:recipeID
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path((cook_id, recipe_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let recipe = require_cook_recipe(&state, &cook_id, &recipe_id).await?;
    state.db.delete_recipe(recipe.id).await?;
    tracing::info!("Deleted recipe {}", recipe.id);
    Ok(StatusCode::OK)
}
