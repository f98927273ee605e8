use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Category, Task};

/// Storage format for timestamps and deadlines
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("Invalid timestamp in column {column}: {value}")]
    TimestampError { column: &'static str, value: String },
    #[error("Task not found: {0}")]
    TaskNotFound(i64),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
}

pub struct Database {
    conn: Connection,
}

/// Row shape read from `tasks` before categories are attached
struct TaskRow {
    id: i64,
    name: String,
    description: Option<String>,
    deadline: Option<String>,
    emoji: Option<String>,
    color: String,
    done: bool,
    created_at: String,
    last_save: Option<String>,
}

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        let db = Database { conn };
        db.initialize_schema()?;
        log::debug!("Opened database at {}", db_path.display());

        Ok(db)
    }

    /// In-memory database, used by tests and dry runs
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let db = Database { conn: Connection::open_in_memory()? };
        db.initialize_schema()?;
        Ok(db)
    }

    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS tasks (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL,
                description     TEXT,
                deadline        TEXT,
                emoji           TEXT,
                color           TEXT NOT NULL,
                done            INTEGER DEFAULT 0,
                created_at      TEXT NOT NULL,
                last_save       TEXT
            );

            CREATE TABLE IF NOT EXISTS categories (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL UNIQUE,
                emoji           TEXT,
                color           TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS task_categories (
                task_id         INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
                category_id     INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
                PRIMARY KEY (task_id, category_id)
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_deadline ON tasks(deadline);",
        )?;
        Ok(())
    }

    /// Insert a task and its category links; returns the new id
    pub fn insert_task(&self, task: &Task) -> Result<i64, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO tasks (name, description, deadline, emoji, color, done, created_at, last_save)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                task.name,
                task.description,
                task.deadline.as_ref().map(format_timestamp),
                task.emoji,
                task.color,
                task.done,
                format_timestamp(&task.created_at),
                task.last_save.as_ref().map(format_timestamp),
            ],
        )?;
        let id = tx.last_insert_rowid();
        replace_task_categories(&tx, id, task.categories())?;
        tx.commit()?;
        log::info!("Inserted task {}", id);
        Ok(id)
    }

    /// Write every editable field of `task` and stamp `last_save`.
    /// Returns the timestamp that was stored.
    pub fn update_task(&self, task: &Task) -> Result<NaiveDateTime, DatabaseError> {
        let now = chrono::Local::now().naive_local();
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE tasks SET name = ?1, description = ?2, deadline = ?3, emoji = ?4,
                color = ?5, done = ?6, last_save = ?7
             WHERE id = ?8",
            params![
                task.name,
                task.description,
                task.deadline.as_ref().map(format_timestamp),
                task.emoji,
                task.color,
                task.done,
                format_timestamp(&now),
                task.id,
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::TaskNotFound(task.id));
        }
        replace_task_categories(&tx, task.id, task.categories())?;
        tx.commit()?;
        log::info!("Updated task {}", task.id);
        // Stored at second precision, so hand back what a reload would see
        parse_timestamp("last_save", &format_timestamp(&now))
    }

    pub fn get_task(&self, id: i64) -> Result<Task, DatabaseError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, description, deadline, emoji, color, done, created_at, last_save
                 FROM tasks WHERE id = ?1",
                params![id],
                read_task_row,
            )
            .optional()?
            .ok_or(DatabaseError::TaskNotFound(id))?;
        let mut links = self.get_category_links()?;
        build_task(row, links.remove(&id).unwrap_or_default())
    }

    /// All tasks, open ones first, then by deadline (no deadline last)
    pub fn get_all_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, deadline, emoji, color, done, created_at, last_save
             FROM tasks
             ORDER BY done ASC, deadline IS NULL, deadline ASC, id ASC",
        )?;
        let rows = stmt
            .query_map([], read_task_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut links = self.get_category_links()?;
        rows.into_iter()
            .map(|row| {
                let categories = links.remove(&row.id).unwrap_or_default();
                build_task(row, categories)
            })
            .collect()
    }

    /// Map of task id to its linked categories
    fn get_category_links(&self) -> Result<HashMap<i64, Vec<Category>>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT tc.task_id, c.id, c.name, c.emoji, c.color
             FROM task_categories tc JOIN categories c ON c.id = tc.category_id
             ORDER BY c.name",
        )?;
        let mut links: HashMap<i64, Vec<Category>> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                Category {
                    id: row.get(1)?,
                    name: row.get(2)?,
                    emoji: row.get(3)?,
                    color: row.get(4)?,
                },
            ))
        })?;
        for row in rows {
            let (task_id, category) = row?;
            links.entry(task_id).or_default().push(category);
        }
        Ok(links)
    }

    pub fn insert_category(&self, category: &Category) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO categories (name, emoji, color) VALUES (?1, ?2, ?3)",
            params![category.name, category.emoji, category.color],
        )?;
        let id = self.conn.last_insert_rowid();
        log::info!("Inserted category {} ({})", category.name, id);
        Ok(id)
    }

    pub fn get_all_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT id, name, emoji, color FROM categories ORDER BY name")?;
        let categories = stmt
            .query_map([], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    emoji: row.get(2)?,
                    color: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    /// Look up categories by name, failing on the first unknown one
    pub fn find_categories_by_name(&self, names: &[String]) -> Result<Vec<Category>, DatabaseError> {
        let all = self.get_all_categories()?;
        names
            .iter()
            .map(|name| {
                all.iter()
                    .find(|c| c.name.eq_ignore_ascii_case(name))
                    .cloned()
                    .ok_or_else(|| DatabaseError::CategoryNotFound(name.clone()))
            })
            .collect()
    }
}

/// Swap the task's category links for `categories`
fn replace_task_categories(conn: &Connection, task_id: i64, categories: &[Category]) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM task_categories WHERE task_id = ?1", params![task_id])?;
    for category in categories {
        conn.execute(
            "INSERT OR IGNORE INTO task_categories (task_id, category_id) VALUES (?1, ?2)",
            params![task_id, category.id],
        )?;
    }
    Ok(())
}

fn read_task_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        deadline: row.get(3)?,
        emoji: row.get(4)?,
        color: row.get(5)?,
        done: row.get(6)?,
        created_at: row.get(7)?,
        last_save: row.get(8)?,
    })
}

fn build_task(row: TaskRow, categories: Vec<Category>) -> Result<Task, DatabaseError> {
    Ok(Task {
        id: row.id,
        name: row.name,
        description: row.description,
        deadline: row.deadline.as_deref().map(|v| parse_timestamp("deadline", v)).transpose()?,
        emoji: row.emoji,
        color: row.color,
        category: if categories.is_empty() { None } else { Some(categories) },
        done: row.done,
        created_at: parse_timestamp("created_at", &row.created_at)?,
        last_save: row.last_save.as_deref().map(|v| parse_timestamp("last_save", v)).transpose()?,
    })
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(column: &'static str, value: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| DatabaseError::TimestampError {
        column,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn seeded() -> (Database, Category, Category) {
        let db = Database::open_in_memory().unwrap();
        let mut home = Category::new("Home".to_string());
        home.id = db.insert_category(&home).unwrap();
        let mut work = Category::new("Work".to_string());
        work.emoji = Some("💼".to_string());
        work.id = db.insert_category(&work).unwrap();
        (db, home, work)
    }

    #[test]
    fn inserted_task_reads_back_with_categories() {
        let (db, home, _) = seeded();
        let mut task = Task::new("Buy milk".to_string());
        task.category = Some(vec![home.clone()]);
        task.deadline = Some(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap().and_hms_opt(12, 0, 0).unwrap());

        let id = db.insert_task(&task).unwrap();
        let loaded = db.get_task(id).unwrap();

        assert_eq!(loaded.name, "Buy milk");
        assert_eq!(loaded.category, Some(vec![home]));
        assert_eq!(loaded.deadline, task.deadline);
        assert_eq!(loaded.last_save, None);
    }

    #[test]
    fn update_replaces_fields_and_stamps_last_save() {
        let (db, home, work) = seeded();
        let mut task = Task::new("Buy milk".to_string());
        task.category = Some(vec![home]);
        task.id = db.insert_task(&task).unwrap();

        task.name = "Buy oat milk".to_string();
        task.emoji = Some("🥛".to_string());
        task.category = Some(vec![work.clone()]);
        let stamped = db.update_task(&task).unwrap();

        let loaded = db.get_task(task.id).unwrap();
        assert_eq!(loaded.name, "Buy oat milk");
        assert_eq!(loaded.emoji.as_deref(), Some("🥛"));
        assert_eq!(loaded.category, Some(vec![work]));
        assert_eq!(loaded.last_save, Some(stamped));
    }

    #[test]
    fn clearing_categories_removes_links() {
        let (db, home, _) = seeded();
        let mut task = Task::new("Sweep".to_string());
        task.category = Some(vec![home]);
        task.id = db.insert_task(&task).unwrap();

        task.category = None;
        db.update_task(&task).unwrap();
        assert_eq!(db.get_task(task.id).unwrap().category, None);
    }

    #[test]
    fn updating_a_missing_task_fails() {
        let db = Database::open_in_memory().unwrap();
        let mut task = Task::new("Ghost".to_string());
        task.id = 42;
        assert!(matches!(db.update_task(&task), Err(DatabaseError::TaskNotFound(42))));
    }

    #[test]
    fn open_tasks_sort_before_done_ones() {
        let db = Database::open_in_memory().unwrap();
        let mut done = Task::new("Done".to_string());
        done.done = true;
        db.insert_task(&done).unwrap();
        db.insert_task(&Task::new("Open".to_string())).unwrap();

        let names: Vec<_> = db.get_all_tasks().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Open", "Done"]);
    }

    #[test]
    fn finds_categories_case_insensitively() {
        let (db, home, _) = seeded();
        let found = db.find_categories_by_name(&["home".to_string()]).unwrap();
        assert_eq!(found, vec![home]);
        assert!(matches!(
            db.find_categories_by_name(&["Garden".to_string()]),
            Err(DatabaseError::CategoryNotFound(_))
        ));
    }

    #[test]
    fn failed_category_link_leaves_task_unchanged() {
        let (db, home, _) = seeded();
        let mut task = Task::new("Buy milk".to_string());
        task.category = Some(vec![home.clone()]);
        task.id = db.insert_task(&task).unwrap();

        let mut stale = Category::new("Gone".to_string());
        stale.id = 999;
        task.name = "changed".to_string();
        task.category = Some(vec![stale]);
        assert!(db.update_task(&task).is_err());

        let loaded = db.get_task(task.id).unwrap();
        assert_eq!(loaded.name, "Buy milk");
        assert_eq!(loaded.last_save, None);
        assert_eq!(loaded.category, Some(vec![home]));
    }

    #[test]
    fn failed_insert_leaves_no_task_behind() {
        let db = Database::open_in_memory().unwrap();
        let mut stale = Category::new("Gone".to_string());
        stale.id = 999;
        let mut task = Task::new("Orphan".to_string());
        task.category = Some(vec![stale]);

        assert!(db.insert_task(&task).is_err());
        assert!(db.get_all_tasks().unwrap().is_empty());
    }
}
