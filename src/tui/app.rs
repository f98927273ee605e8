use std::path::PathBuf;
use std::time::Instant;

use crossterm::event::KeyEvent;
use ratatui::widgets::ListState;

use crate::dialog::{DialogAction, Notifier};
use crate::models::{Category, Task};
use crate::tui::error::TuiError;
use crate::tui::widgets::edit_task_dialog::{DialogKeys, EditTaskView, dialog_keys};
use crate::{Config, Database};

const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    EditTask,
    Help,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub mode: Mode,
    pub selected_index: usize,
    pub list_state: ListState,
    /// Background list scrolling is frozen while the edit dialog holds it
    pub scroll_locked: bool,
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

impl StatusState {
    pub fn set(&mut self, message: String) {
        self.message = Some(message);
        self.message_time = Some(Instant::now());
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.message_time = None;
    }

    /// Drop the message once it has been shown long enough
    pub fn check_timeout(&mut self) {
        if let Some(time) = self.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear();
            }
        }
    }
}

/// Toasts from the edit dialog land in the status bar
impl Notifier for StatusState {
    fn success(&mut self, message: String) {
        self.set(message);
    }
}

pub struct App {
    pub config: Config,
    /// Where category toggles are persisted
    pub config_path: PathBuf,
    pub database: Database,

    pub tasks: Vec<Task>,
    pub categories: Vec<Category>,

    pub ui: UiState,
    pub status: StatusState,
    pub edit_dialog: EditTaskView,
    pub dialog_keys: DialogKeys,
}

impl App {
    pub fn new(config: Config, config_path: PathBuf, database: Database) -> Result<Self, TuiError> {
        let dialog_keys = dialog_keys(&config).map_err(TuiError::KeyBindingError)?;
        let edit_dialog = EditTaskView::new(config.dialog_settings());

        let mut app = Self {
            config,
            config_path,
            database,
            tasks: Vec::new(),
            categories: Vec::new(),
            ui: UiState {
                mode: Mode::List,
                selected_index: 0,
                list_state: ListState::default(),
                scroll_locked: false,
            },
            status: StatusState::default(),
            edit_dialog,
            dialog_keys,
        };

        app.load_data()?;
        Ok(app)
    }

    pub fn load_data(&mut self) -> Result<(), TuiError> {
        self.tasks = self.database.get_all_tasks()?;
        self.categories = self.database.get_all_categories()?;
        log::debug!("Loaded {} tasks and {} categories", self.tasks.len(), self.categories.len());

        if self.ui.selected_index >= self.tasks.len() {
            self.ui.selected_index = self.tasks.len().saturating_sub(1);
        }
        self.sync_list_state();
        Ok(())
    }

    /// Sync ListState with selected_index for proper scrolling
    pub fn sync_list_state(&mut self) {
        if self.tasks.is_empty() {
            self.ui.list_state.select(None);
        } else {
            self.ui.list_state.select(Some(self.ui.selected_index));
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.ui.selected_index)
    }

    pub fn move_selection_up(&mut self) {
        if self.ui.scroll_locked {
            return;
        }
        if self.ui.selected_index > 0 {
            self.ui.selected_index -= 1;
            self.sync_list_state();
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.ui.scroll_locked {
            return;
        }
        if self.ui.selected_index < self.tasks.len().saturating_sub(1) {
            self.ui.selected_index += 1;
            self.sync_list_state();
        }
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.set(message);
    }

    pub fn check_status_message_timeout(&mut self) {
        self.status.check_timeout();
    }

    pub fn enter_help_mode(&mut self) {
        self.ui.mode = Mode::Help;
    }

    pub fn exit_help_mode(&mut self) {
        self.ui.mode = Mode::List;
    }

    /// Open the edit dialog on the selected task and freeze the list behind it
    pub fn open_edit_dialog(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            self.set_status_message("No task selected".to_string());
            return;
        };
        self.edit_dialog.open(task);
        self.ui.scroll_locked = true;
        self.ui.mode = Mode::EditTask;
    }

    pub fn close_edit_dialog(&mut self) {
        self.edit_dialog.close();
        self.ui.scroll_locked = false;
        self.ui.mode = Mode::List;
    }

    /// Feed a key to the open dialog and act on what it asks for
    pub fn handle_dialog_key(&mut self, key_event: KeyEvent) {
        let scroll_locked = &mut self.ui.scroll_locked;
        let action = self.edit_dialog.handle_key(
            key_event,
            &self.dialog_keys,
            &self.categories,
            || *scroll_locked = false,
            &mut self.status,
        );
        self.apply_dialog_action(action);
    }

    pub fn apply_dialog_action(&mut self, action: DialogAction) {
        match action {
            DialogAction::None => {}
            DialogAction::Close => self.close_edit_dialog(),
            DialogAction::Save(mut task) => match self.database.update_task(&task) {
                Ok(saved_at) => {
                    task.last_save = Some(saved_at);
                    if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                        *slot = task;
                    }
                    self.close_edit_dialog();
                }
                Err(e) => {
                    // Keep the dialog open so the edits are not lost
                    log::error!("Failed to save task {}: {}", task.id, e);
                    self.set_status_message(format!("Failed to save task: {}", e));
                }
            },
        }
    }

    /// Flip the categories feature, persist it and hand it to the dialog
    pub fn toggle_categories(&mut self) {
        self.config.categories_enabled = !self.config.categories_enabled;
        self.edit_dialog.set_settings(self.config.dialog_settings());

        let state = if self.config.categories_enabled { "enabled" } else { "disabled" };
        match self.config.save_to(&self.config_path) {
            Ok(()) => self.set_status_message(format!("Categories {}", state)),
            Err(e) => {
                log::warn!("Failed to save config: {}", e);
                self.set_status_message(format!("Categories {} (not saved: {})", state, e));
            }
        }
    }

    /// Hints shown in the status bar for the current mode
    pub fn key_hints(&self) -> Vec<String> {
        use crate::utils::format_key_binding_for_display as display;
        let kb = &self.config.key_bindings;
        match self.ui.mode {
            Mode::List => vec![
                format!("{}/{}: Move", display(&kb.list_down), display(&kb.list_up)),
                format!("{}: Edit", display(&kb.edit)),
                format!("{}: Toggle categories", display(&kb.toggle_categories)),
                format!("{}: Help", display(&kb.help)),
                format!("{}: Quit", display(&kb.quit)),
            ],
            Mode::EditTask => vec![
                format!("{}: Save", display(&kb.save)),
                "Esc: Cancel".to_string(),
            ],
            Mode::Help => vec![format!("{}/Esc: Close help", display(&kb.help))],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app_with_tasks(names: &[&str]) -> App {
        let database = Database::open_in_memory().unwrap();
        for name in names {
            database.insert_task(&Task::new(name.to_string())).unwrap();
        }
        let config_path = std::env::temp_dir().join(format!("taskpad-app-test-{}.toml", std::process::id()));
        App::new(Config::default(), config_path, database).unwrap()
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        app.handle_dialog_key(KeyEvent::new(code, modifiers));
    }

    #[test]
    fn opening_the_dialog_locks_list_scrolling() {
        let mut app = app_with_tasks(&["one", "two"]);
        app.open_edit_dialog();

        assert!(app.edit_dialog.is_open());
        assert!(app.ui.scroll_locked);
        app.move_selection_down();
        assert_eq!(app.ui.selected_index, 0);
    }

    #[test]
    fn saving_persists_and_closes() {
        let mut app = app_with_tasks(&["Buy milk"]);
        app.open_edit_dialog();

        press(&mut app, KeyCode::Char('!'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL);

        assert!(!app.edit_dialog.is_open());
        assert!(!app.ui.scroll_locked);
        assert_eq!(app.ui.mode, Mode::List);
        assert_eq!(app.tasks[0].name, "Buy milk!");
        assert!(app.tasks[0].last_save.is_some());
        assert_eq!(app.status.message.as_deref(), Some("Task \"Buy milk!\" updated"));

        let stored = app.database.get_task(app.tasks[0].id).unwrap();
        assert_eq!(stored.name, "Buy milk!");
    }

    #[test]
    fn blocked_save_unlocks_scroll_but_keeps_dialog_open() {
        let mut app = app_with_tasks(&["ab"]);
        app.open_edit_dialog();

        press(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        press(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL);

        assert!(app.edit_dialog.is_open());
        assert!(!app.ui.scroll_locked);
        assert_eq!(app.tasks[0].name, "ab");
    }

    #[test]
    fn escape_discards_edits() {
        let mut app = app_with_tasks(&["Buy milk"]);
        app.open_edit_dialog();
        press(&mut app, KeyCode::Char('x'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);

        assert!(!app.edit_dialog.is_open());
        assert!(!app.ui.scroll_locked);
        assert_eq!(app.tasks[0].name, "Buy milk");
    }

    #[test]
    fn open_without_tasks_reports_it() {
        let mut app = app_with_tasks(&[]);
        app.open_edit_dialog();
        assert!(!app.edit_dialog.is_open());
        assert_eq!(app.status.message.as_deref(), Some("No task selected"));
    }

    #[test]
    fn toggling_categories_updates_the_dialog() {
        let mut app = app_with_tasks(&["one"]);
        assert!(app.edit_dialog.dialog.categories_visible());

        app.toggle_categories();
        assert!(!app.config.categories_enabled);
        assert!(!app.edit_dialog.dialog.categories_visible());

        let saved = Config::load_with_profile(crate::Profile::Dev, Some(app.config_path.as_path())).unwrap();
        assert!(!saved.categories_enabled);
        let _ = std::fs::remove_file(&app.config_path);
    }

    #[test]
    fn status_message_times_out() {
        let mut status = StatusState::default();
        status.success("Saved".to_string());
        status.check_timeout();
        assert_eq!(status.message.as_deref(), Some("Saved"));

        status.message_time = Instant::now().checked_sub(std::time::Duration::from_secs(4));
        status.check_timeout();
        assert!(status.message.is_none());
    }
}
