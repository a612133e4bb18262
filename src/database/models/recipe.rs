use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A dish, owned by the cook it was created under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    #[serde(rename = "cook")]
    pub cook_id: Uuid,
    pub title: String,
    #[sqlx(rename = "description")]
    pub desc: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecipeFields {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub path: Option<String>,
}

impl Recipe {
    pub fn new(cook_id: Uuid, fields: RecipeFields) -> Self {
        let mut recipe = Self {
            id: Uuid::new_v4(),
            cook_id,
            title: String::new(),
            desc: String::new(),
            path: String::new(),
        };
        recipe.overwrite(fields);
        recipe
    }

    /// Replaces title, desc and path. The owning cook never changes.
    pub fn overwrite(&mut self, fields: RecipeFields) {
        self.title = fields.title.unwrap_or_default();
        self.desc = fields.desc.unwrap_or_default();
        self.path = fields.path.unwrap_or_default();
    }
}
