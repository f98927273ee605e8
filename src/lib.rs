pub mod cli;
pub mod config;
pub mod database;
pub mod dialog;
pub mod logger;
pub mod models;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use database::Database;
pub use dialog::{DialogAction, EditTaskDialog};
pub use models::{Category, Task};
pub use utils::Profile;
