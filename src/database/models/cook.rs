use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A recipe author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Cook {
    pub id: Uuid,
    pub name: String,
    #[sqlx(rename = "description")]
    pub desc: String,
    pub path: String,
}

/// Writable cook fields. Absent fields are stored as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CookFields {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub path: Option<String>,
}

impl Cook {
    pub fn new(fields: CookFields) -> Self {
        let mut cook = Self {
            id: Uuid::new_v4(),
            name: String::new(),
            desc: String::new(),
            path: String::new(),
        };
        cook.overwrite(fields);
        cook
    }

    /// Full-field overwrite, as PUT does
    pub fn overwrite(&mut self, fields: CookFields) {
        self.name = fields.name.unwrap_or_default();
        self.desc = fields.desc.unwrap_or_default();
        self.path = fields.path.unwrap_or_default();
    }
}
