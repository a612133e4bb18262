use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Cook, NewUser, Recipe, User};
use crate::database::repository::{CookRepository, Database, RecipeRepository, UserRepository};

/// Process-local store with the same semantics as the Postgres tables.
/// Used for development without a database and by the test suite.
/// After `close` the health check fails; data stays readable.
#[derive(Default)]
pub struct MemoryDatabase {
    state: RwLock<MemoryState>,
    closed: AtomicBool,
}

#[derive(Default)]
struct MemoryState {
    cooks: Vec<Cook>,
    recipes: Vec<Recipe>,
    users: Vec<User>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CookRepository for MemoryDatabase {
    async fn create_cook(&self, cook: Cook) -> Result<Cook, DatabaseError> {
        let mut state = self.state.write().await;
        state.cooks.push(cook.clone());
        Ok(cook)
    }

    async fn find_cook(&self, id: Uuid) -> Result<Option<Cook>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.cooks.iter().find(|c| c.id == id).cloned())
    }

    async fn list_cooks(&self) -> Result<Vec<Cook>, DatabaseError> {
        Ok(self.state.read().await.cooks.clone())
    }

    async fn save_cook(&self, cook: &Cook) -> Result<Cook, DatabaseError> {
        let mut state = self.state.write().await;
        let stored = state
            .cooks
            .iter_mut()
            .find(|c| c.id == cook.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("cook {}", cook.id)))?;
        *stored = cook.clone();
        Ok(cook.clone())
    }

    async fn delete_cook(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let mut state = self.state.write().await;
        let before = state.cooks.len();
        state.cooks.retain(|c| c.id != id);
        Ok((before - state.cooks.len()) as u64)
    }
}

#[async_trait]
impl RecipeRepository for MemoryDatabase {
    async fn create_recipe(&self, recipe: Recipe) -> Result<Recipe, DatabaseError> {
        let mut state = self.state.write().await;
        state.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn find_recipe(&self, id: Uuid) -> Result<Option<Recipe>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn find_cook_recipe(&self, cook_id: Uuid, recipe_id: Uuid) -> Result<Option<Recipe>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .recipes
            .iter()
            .find(|r| r.id == recipe_id && r.cook_id == cook_id)
            .cloned())
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>, DatabaseError> {
        Ok(self.state.read().await.recipes.clone())
    }

    async fn list_recipes_for_cook(&self, cook_id: Uuid) -> Result<Vec<Recipe>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .recipes
            .iter()
            .filter(|r| r.cook_id == cook_id)
            .cloned()
            .collect())
    }

    async fn save_recipe(&self, recipe: &Recipe) -> Result<Recipe, DatabaseError> {
        let mut state = self.state.write().await;
        let stored = state
            .recipes
            .iter_mut()
            .find(|r| r.id == recipe.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("recipe {}", recipe.id)))?;
        stored.title = recipe.title.clone();
        stored.desc = recipe.desc.clone();
        stored.path = recipe.path.clone();
        Ok(stored.clone())
    }

    async fn delete_recipe(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let mut state = self.state.write().await;
        let before = state.recipes.len();
        state.recipes.retain(|r| r.id != id);
        Ok((before - state.recipes.len()) as u64)
    }
}

#[async_trait]
impl UserRepository for MemoryDatabase {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(DatabaseError::UniqueViolation(format!("username '{}'", user.username)));
        }
        let user = user.into_user();
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn push_favorite(&self, user_id: Uuid, recipe_id: Uuid) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user_id)))?;
        user.recipes.push(recipe_id);
        Ok(())
    }

    async fn pull_favorite(&self, user_id: Uuid, recipe_id: Uuid) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user_id)))?;
        user.recipes.retain(|id| *id != recipe_id);
        Ok(())
    }

    async fn favorite_recipes(&self, user_id: Uuid) -> Result<Vec<Recipe>, DatabaseError> {
        let state = self.state.read().await;
        let Some(user) = state.users.iter().find(|u| u.id == user_id) else {
            return Ok(Vec::new());
        };
        Ok(user
            .recipes
            .iter()
            .filter_map(|id| state.recipes.iter().find(|r| r.id == *id).cloned())
            .collect())
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DatabaseError::Closed);
        }
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
