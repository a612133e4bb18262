use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Cook, NewUser, Recipe, User};

#[async_trait]
pub trait CookRepository: Send + Sync {
    async fn create_cook(&self, cook: Cook) -> Result<Cook, DatabaseError>;

    async fn find_cook(&self, id: Uuid) -> Result<Option<Cook>, DatabaseError>;

    async fn list_cooks(&self) -> Result<Vec<Cook>, DatabaseError>;

    /// Persist every field of an existing cook. `NotFound` if the row is gone.
    async fn save_cook(&self, cook: &Cook) -> Result<Cook, DatabaseError>;

    /// Returns the number of rows removed (zero or one)
    async fn delete_cook(&self, id: Uuid) -> Result<u64, DatabaseError>;
}

#[async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn create_recipe(&self, recipe: Recipe) -> Result<Recipe, DatabaseError>;

    async fn find_recipe(&self, id: Uuid) -> Result<Option<Recipe>, DatabaseError>;

    /// Lookup scoped to both the recipe id and its owning cook
    async fn find_cook_recipe(&self, cook_id: Uuid, recipe_id: Uuid) -> Result<Option<Recipe>, DatabaseError>;

    async fn list_recipes(&self) -> Result<Vec<Recipe>, DatabaseError>;

    async fn list_recipes_for_cook(&self, cook_id: Uuid) -> Result<Vec<Recipe>, DatabaseError>;

    /// Persist title, desc and path of an existing recipe
    async fn save_recipe(&self, recipe: &Recipe) -> Result<Recipe, DatabaseError>;

    async fn delete_recipe(&self, id: Uuid) -> Result<u64, DatabaseError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// `UniqueViolation` when the username is taken
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    /// Append to the favorites list without de-duplicating
    async fn push_favorite(&self, user_id: Uuid, recipe_id: Uuid) -> Result<(), DatabaseError>;

    /// Remove every occurrence of `recipe_id` from the favorites list
    async fn pull_favorite(&self, user_id: Uuid, recipe_id: Uuid) -> Result<(), DatabaseError>;

    /// Favorites resolved to full recipes in stored order. Ids whose recipe
    /// no longer exists are skipped.
    async fn favorite_recipes(&self, user_id: Uuid) -> Result<Vec<Recipe>, DatabaseError>;
}

/// A complete store: every repository plus lifecycle hooks
#[async_trait]
pub trait Database: CookRepository + RecipeRepository + UserRepository {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    async fn close(&self);
}
