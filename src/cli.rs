use clap::{Parser, Subcommand};
use std::io::Write;
use thiserror::Error;

use crate::database::{Database, DatabaseError};
use crate::models::{Category, Task};
use crate::utils::{format_deadline, parse_deadline};

#[derive(Parser)]
#[command(name = "taskpad")]
#[command(about = "Taskpad - tasks with emoji, colors and categories in your terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Print all tasks
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Quickly add a new task
    AddTask {
        /// Task name
        name: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Deadline (YYYY-MM-DD or "YYYY-MM-DD HH:MM")
        #[arg(long)]
        deadline: Option<String>,
        /// Emoji shown next to the task
        #[arg(long)]
        emoji: Option<String>,
        /// Color as #RRGGBB
        #[arg(long)]
        color: Option<String>,
        /// Comma-separated category names
        #[arg(long)]
        categories: Option<String>,
    },
    /// Add a category tasks can be assigned to
    AddCategory {
        /// Category name
        name: String,
        /// Emoji shown next to the category
        #[arg(long)]
        emoji: Option<String>,
        /// Color as #RRGGBB
        #[arg(long)]
        color: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Failed to parse deadline: {0}")]
    DeadlineParseError(String),
    #[error("Name must not be empty")]
    EmptyName,
    #[error("Failed to write output: {0}")]
    OutputError(#[from] std::io::Error),
    #[error("Failed to serialize tasks: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Split a comma-separated list, dropping empty entries
fn split_names(names: &str) -> Vec<String> {
    names
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Handle the add-task command
pub fn handle_add_task(
    name: String,
    description: Option<String>,
    deadline: Option<String>,
    emoji: Option<String>,
    color: Option<String>,
    categories: Option<String>,
    db: &Database,
) -> Result<i64, CliError> {
    if name.trim().is_empty() {
        return Err(CliError::EmptyName);
    }

    let mut task = Task::new(name);
    task.description = description;
    task.emoji = emoji;
    if let Some(color) = color {
        task.color = color;
    }
    if let Some(deadline) = deadline {
        let parsed = parse_deadline(&deadline)
            .map_err(|e| CliError::DeadlineParseError(format!("Invalid deadline '{}': {}", deadline, e)))?;
        task.deadline = Some(parsed);
    }
    if let Some(names) = categories {
        let found = db.find_categories_by_name(&split_names(&names))?;
        if !found.is_empty() {
            task.category = Some(found);
        }
    }

    let id = db.insert_task(&task)?;
    println!("Task created successfully (ID: {})", id);
    Ok(id)
}

/// Handle the add-category command
pub fn handle_add_category(
    name: String,
    emoji: Option<String>,
    color: Option<String>,
    db: &Database,
) -> Result<i64, CliError> {
    if name.trim().is_empty() {
        return Err(CliError::EmptyName);
    }

    let mut category = Category::new(name);
    category.emoji = emoji;
    if let Some(color) = color {
        category.color = color;
    }

    let id = db.insert_category(&category)?;
    println!("Category created successfully (ID: {})", id);
    Ok(id)
}

/// Handle the list command
pub fn handle_list(json: bool, db: &Database, out: &mut impl Write) -> Result<(), CliError> {
    let tasks = db.get_all_tasks()?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &tasks)?;
        writeln!(out)?;
        return Ok(());
    }

    for task in &tasks {
        let status = if task.done { "✓" } else { "○" };
        let emoji = task.emoji.as_deref().map(|e| format!("{} ", e)).unwrap_or_default();
        let deadline = task
            .deadline
            .as_ref()
            .map(|d| format!(" [{}]", format_deadline(d)))
            .unwrap_or_default();
        let categories = task
            .categories()
            .iter()
            .map(|c| format!("#{}", c.name))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{:>4} {} {}{}{} {}", task.id, status, emoji, task.name, deadline, categories)?;
    }
    Ok(())
}
