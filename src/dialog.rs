//! Editing state for a single task.
//!
//! [`EditTaskDialog`] owns a draft copy of the task supplied by its caller.
//! Field edits mutate the draft only; the caller gets the finished task back
//! from [`EditTaskDialog::save`] and decides how to persist it.
//! Nothing in here knows about the terminal.

use thiserror::Error;

use crate::models::{Category, Task};
use crate::utils;

/// Length limits applied to the text fields, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLimits {
    pub task_name_max_length: usize,
    pub description_max_length: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            task_name_max_length: crate::config::TASK_NAME_MAX_LENGTH,
            description_max_length: crate::config::DESCRIPTION_MAX_LENGTH,
        }
    }
}

/// User settings the dialog reads but never changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogSettings {
    pub categories_enabled: bool,
    pub limits: FieldLimits,
}

impl Default for DialogSettings {
    fn default() -> Self {
        Self {
            categories_enabled: true,
            limits: FieldLimits::default(),
        }
    }
}

/// A change to one of the text-backed fields of the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEdit {
    Name(String),
    Description(String),
    /// Raw deadline text; empty clears the deadline
    Deadline(String),
}

/// What the caller should do after a dialog interaction
#[derive(Debug, Clone, PartialEq)]
pub enum DialogAction {
    None,
    Close,
    Save(Task),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No task loaded")]
    NoTask,
    #[error("Name is required")]
    NameRequired,
    #[error("Name is too long (max {max} characters)")]
    NameTooLong { max: usize },
    #[error("Description is too long (max {max} characters)")]
    DescriptionTooLong { max: usize },
    #[error("Deadline must look like YYYY-MM-DD or YYYY-MM-DD HH:MM")]
    InvalidDeadline,
}

/// Sink for transient success messages (toasts)
pub trait Notifier {
    fn success(&mut self, message: String);
}

#[derive(Debug, Clone)]
pub struct EditTaskDialog {
    settings: DialogSettings,
    open: bool,
    task: Option<Task>,
    draft: Option<Task>,
    selected_categories: Vec<Category>,
    name_error: bool,
    description_error: bool,
    deadline_error: bool,
}

impl EditTaskDialog {
    pub fn new(settings: DialogSettings) -> Self {
        Self {
            settings,
            open: false,
            task: None,
            draft: None,
            selected_categories: Vec::new(),
            name_error: false,
            description_error: false,
            deadline_error: false,
        }
    }

    pub fn settings(&self) -> DialogSettings {
        self.settings
    }

    /// Replace the settings, e.g. after the user toggles categories
    pub fn set_settings(&mut self, settings: DialogSettings) {
        self.settings = settings;
        self.check_lengths();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Supply the task to edit. Any pending edits are discarded and the
    /// draft becomes a fresh copy of `task`.
    pub fn set_task(&mut self, task: Option<Task>) {
        self.task = task;
        self.reset_draft();
    }

    /// The task as supplied by the caller, untouched by edits
    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    pub fn draft(&self) -> Option<&Task> {
        self.draft.as_ref()
    }

    pub fn selected_categories(&self) -> &[Category] {
        &self.selected_categories
    }

    pub fn name_error(&self) -> bool {
        self.name_error
    }

    pub fn description_error(&self) -> bool {
        self.description_error
    }

    pub fn deadline_error(&self) -> bool {
        self.deadline_error
    }

    /// Whitespace-only names count as empty, so "   " gets the
    /// required-name message rather than being saved as a blank title.
    pub fn name_is_empty(&self) -> bool {
        self.draft
            .as_ref()
            .map(|draft| draft.name.trim().is_empty())
            .unwrap_or(true)
    }

    /// Whether the category section is part of the form
    pub fn categories_visible(&self) -> bool {
        self.settings.categories_enabled
    }

    /// Whether the deadline clear affordance should be offered
    pub fn has_deadline(&self) -> bool {
        self.draft.as_ref().is_some_and(|draft| draft.deadline.is_some())
    }

    /// Header text for the last-saved timestamp, if the task has one
    pub fn last_save_label(&self) -> Option<String> {
        self.draft
            .as_ref()
            .and_then(|draft| draft.last_save.as_ref())
            .map(|ts| format!("Last edited {}", utils::format_timestamp(ts)))
    }

    /// First problem that blocks saving, if any
    pub fn validation_error(&self) -> Option<ValidationError> {
        let limits = self.settings.limits;
        if self.draft.is_none() {
            Some(ValidationError::NoTask)
        } else if self.name_is_empty() {
            Some(ValidationError::NameRequired)
        } else if self.name_error {
            Some(ValidationError::NameTooLong { max: limits.task_name_max_length })
        } else if self.description_error {
            Some(ValidationError::DescriptionTooLong { max: limits.description_max_length })
        } else if self.deadline_error {
            Some(ValidationError::InvalidDeadline)
        } else {
            None
        }
    }

    /// Drives the enabled state of the Save button
    pub fn can_save(&self) -> bool {
        self.validation_error().is_none()
    }

    /// Apply a text-field edit to the draft and refresh that field's flag
    pub fn apply_edit(&mut self, edit: TaskEdit) {
        let limits = self.settings.limits;
        let Some(draft) = self.draft.as_mut() else {
            return;
        };

        match edit {
            TaskEdit::Name(name) => {
                self.name_error = name.chars().count() > limits.task_name_max_length;
                draft.name = name;
            }
            TaskEdit::Description(description) => {
                self.description_error = description.chars().count() > limits.description_max_length;
                // A task without a description stays without one until text is typed
                if !(description.is_empty() && draft.description.is_none()) {
                    draft.description = Some(description);
                }
            }
            TaskEdit::Deadline(text) => {
                if text.trim().is_empty() {
                    self.deadline_error = false;
                    draft.deadline = None;
                } else {
                    match utils::parse_deadline(&text) {
                        Ok(deadline) => {
                            self.deadline_error = false;
                            draft.deadline = Some(deadline);
                        }
                        // Keep the last valid deadline until the text parses again
                        Err(_) => self.deadline_error = true,
                    }
                }
            }
        }
    }

    /// Emoji picked in the emoji picker; `None` clears it
    pub fn set_emoji(&mut self, emoji: Option<String>) {
        if let Some(draft) = self.draft.as_mut() {
            draft.emoji = emoji;
        }
    }

    pub fn set_color(&mut self, color: String) {
        if let Some(draft) = self.draft.as_mut() {
            draft.color = color;
        }
    }

    /// New selection reported by the category selector.
    /// Ignored while categories are disabled, since the selector is hidden.
    pub fn set_selected_categories(&mut self, categories: Vec<Category>) {
        if !self.settings.categories_enabled {
            return;
        }
        if let Some(draft) = self.draft.as_mut() {
            draft.category = if categories.is_empty() {
                None
            } else {
                Some(categories.clone())
            };
        }
        self.selected_categories = categories;
    }

    pub fn clear_deadline(&mut self) {
        if let Some(draft) = self.draft.as_mut() {
            draft.deadline = None;
            self.deadline_error = false;
        }
    }

    /// Hand the draft to the caller if it is valid.
    /// `release_scroll_lock` always runs first, even when validation fails.
    pub fn save(
        &mut self,
        release_scroll_lock: impl FnOnce(),
        notifier: &mut dyn Notifier,
    ) -> Result<DialogAction, ValidationError> {
        release_scroll_lock();

        if let Some(error) = self.validation_error() {
            log::debug!("Save blocked: {}", error);
            return Err(error);
        }
        let Some(draft) = self.draft.clone() else {
            return Err(ValidationError::NoTask);
        };

        log::info!("Saving task {}", draft.id);
        notifier.success(format!("Task \"{}\" updated", draft.name));
        Ok(DialogAction::Save(draft))
    }

    /// Cancel button: close and throw away unsaved edits
    pub fn cancel(&mut self) -> DialogAction {
        log::debug!("Edit cancelled");
        self.reset_draft();
        DialogAction::Close
    }

    /// Esc / backdrop dismissal; same contract as cancel
    pub fn dismiss(&mut self) -> DialogAction {
        self.cancel()
    }

    fn reset_draft(&mut self) {
        self.draft = self.task.clone();
        self.selected_categories = self
            .task
            .as_ref()
            .map(|task| task.categories().to_vec())
            .unwrap_or_default();
        self.deadline_error = false;
        self.check_lengths();
    }

    /// Recompute the length flags from the draft as it stands
    fn check_lengths(&mut self) {
        let limits = self.settings.limits;
        let (name_len, description_len) = self
            .draft
            .as_ref()
            .map(|draft| {
                (
                    draft.name.chars().count(),
                    draft.description.as_deref().map_or(0, |d| d.chars().count()),
                )
            })
            .unwrap_or((0, 0));
        self.name_error = name_len > limits.task_name_max_length;
        self.description_error = description_len > limits.description_max_length;
    }
}
