use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Cook, NewUser, Recipe, User};
use crate::database::repository::{CookRepository, Database, RecipeRepository, UserRepository};

/// Idempotent schema bootstrap. `recipes.cook_id` deliberately has no foreign
/// key: deleting a cook leaves its recipes in place.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS cooks (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT '',
        path TEXT NOT NULL DEFAULT ''
    )"#,
    r#"CREATE TABLE IF NOT EXISTS recipes (
        id UUID PRIMARY KEY,
        cook_id UUID NOT NULL,
        title TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT '',
        path TEXT NOT NULL DEFAULT ''
    )"#,
    "CREATE INDEX IF NOT EXISTS recipes_cook_id_idx ON recipes (cook_id)",
    r#"CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        recipes UUID[] NOT NULL DEFAULT '{}'
    )"#,
];

const COOK_COLUMNS: &str = "id, name, description, path";
const RECIPE_COLUMNS: &str = "id, cook_id, title, description, path";
const USER_COLUMNS: &str = "id, first_name, last_name, username, password, recipes";

pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl CookRepository for PgDatabase {
    async fn create_cook(&self, cook: Cook) -> Result<Cook, DatabaseError> {
        let sql = format!(
            "INSERT INTO cooks ({COOK_COLUMNS}) VALUES ($1, $2, $3, $4) RETURNING {COOK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Cook>(&sql)
            .bind(cook.id)
            .bind(&cook.name)
            .bind(&cook.desc)
            .bind(&cook.path)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_cook(&self, id: Uuid) -> Result<Option<Cook>, DatabaseError> {
        let sql = format!("SELECT {COOK_COLUMNS} FROM cooks WHERE id = $1");
        let row = sqlx::query_as::<_, Cook>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_cooks(&self) -> Result<Vec<Cook>, DatabaseError> {
        let sql = format!("SELECT {COOK_COLUMNS} FROM cooks");
        let rows = sqlx::query_as::<_, Cook>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn save_cook(&self, cook: &Cook) -> Result<Cook, DatabaseError> {
        let sql = format!(
            "UPDATE cooks SET name = $2, description = $3, path = $4 WHERE id = $1 RETURNING {COOK_COLUMNS}"
        );
        sqlx::query_as::<_, Cook>(&sql)
            .bind(cook.id)
            .bind(&cook.name)
            .bind(&cook.desc)
            .bind(&cook.path)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("cook {}", cook.id)))
    }

    async fn delete_cook(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM cooks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RecipeRepository for PgDatabase {
    async fn create_recipe(&self, recipe: Recipe) -> Result<Recipe, DatabaseError> {
        let sql = format!(
            "INSERT INTO recipes ({RECIPE_COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {RECIPE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Recipe>(&sql)
            .bind(recipe.id)
            .bind(recipe.cook_id)
            .bind(&recipe.title)
            .bind(&recipe.desc)
            .bind(&recipe.path)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_recipe(&self, id: Uuid) -> Result<Option<Recipe>, DatabaseError> {
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1");
        let row = sqlx::query_as::<_, Recipe>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_cook_recipe(&self, cook_id: Uuid, recipe_id: Uuid) -> Result<Option<Recipe>, DatabaseError> {
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1 AND cook_id = $2");
        let row = sqlx::query_as::<_, Recipe>(&sql)
            .bind(recipe_id)
            .bind(cook_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>, DatabaseError> {
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes");
        let rows = sqlx::query_as::<_, Recipe>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn list_recipes_for_cook(&self, cook_id: Uuid) -> Result<Vec<Recipe>, DatabaseError> {
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE cook_id = $1");
        let rows = sqlx::query_as::<_, Recipe>(&sql)
            .bind(cook_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn save_recipe(&self, recipe: &Recipe) -> Result<Recipe, DatabaseError> {
        let sql = format!(
            "UPDATE recipes SET title = $2, description = $3, path = $4 WHERE id = $1 RETURNING {RECIPE_COLUMNS}"
        );
        sqlx::query_as::<_, Recipe>(&sql)
            .bind(recipe.id)
            .bind(&recipe.title)
            .bind(&recipe.desc)
            .bind(&recipe.path)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("recipe {}", recipe.id)))
    }

    async fn delete_recipe(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl UserRepository for PgDatabase {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let user = user.into_user();
        let sql = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.recipes.as_slice())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    DatabaseError::UniqueViolation(format!("username '{}'", user.username))
                }
                other => DatabaseError::Sqlx(other),
            })
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn push_favorite(&self, user_id: Uuid, recipe_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE users SET recipes = array_append(recipes, $2) WHERE id = $1")
            .bind(user_id)
            .bind(recipe_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }

    async fn pull_favorite(&self, user_id: Uuid, recipe_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE users SET recipes = array_remove(recipes, $2) WHERE id = $1")
            .bind(user_id)
            .bind(recipe_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }

    async fn favorite_recipes(&self, user_id: Uuid) -> Result<Vec<Recipe>, DatabaseError> {
        let rows = sqlx::query_as::<_, Recipe>(
            "SELECT r.id, r.cook_id, r.title, r.description, r.path
             FROM users u
             CROSS JOIN LATERAL unnest(u.recipes) WITH ORDINALITY AS f(recipe_id, position)
             JOIN recipes r ON r.id = f.recipe_id
             WHERE u.id = $1
             ORDER BY f.position",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
