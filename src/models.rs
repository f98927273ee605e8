use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Default color for tasks and categories created without one
pub const DEFAULT_TASK_COLOR: &str = "#b624ff";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub emoji: Option<String>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub deadline: Option<NaiveDateTime>,
    pub emoji: Option<String>,
    pub color: String, // #RRGGBB
    pub category: Option<Vec<Category>>,
    pub done: bool,
    pub created_at: NaiveDateTime,
    pub last_save: Option<NaiveDateTime>,
}

impl Category {
    pub fn new(name: String) -> Self {
        Self {
            id: 0,
            name,
            emoji: None,
            color: DEFAULT_TASK_COLOR.to_string(),
        }
    }
}

impl Task {
    /// Build an unsaved task; `id` is assigned by the database on insert
    pub fn new(name: String) -> Self {
        Self {
            id: 0,
            name,
            description: None,
            deadline: None,
            emoji: None,
            color: DEFAULT_TASK_COLOR.to_string(),
            category: None,
            done: false,
            created_at: chrono::Local::now().naive_local(),
            last_save: None,
        }
    }

    /// Categories as a plain slice, treating an unset field as empty
    pub fn categories(&self) -> &[Category] {
        self.category.as_deref().unwrap_or(&[])
    }
}
