use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::dialog::{DialogAction, DialogSettings, EditTaskDialog, Notifier, TaskEdit, ValidationError};
use crate::models::{Category, Task};
use crate::tui::widgets::category_selector::CategorySelector;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::color_picker::ColorPicker;
use crate::tui::widgets::editor::Editor;
use crate::tui::widgets::emoji_picker::EmojiPicker;
use crate::tui::widgets::{PickerOutcome, popup_area};
use crate::utils::{ParsedKeyBinding, format_deadline, format_key_binding_for_display, has_primary_modifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogField {
    Name,
    Description,
    Deadline,
    Emoji,
    Color,
    Categories,
    Save,
    Cancel,
}

/// Sub-widget currently owning the keyboard
#[derive(Debug, Clone)]
pub enum ActivePicker {
    Emoji(EmojiPicker),
    Color(ColorPicker),
    Categories(CategorySelector),
}

/// Key bindings the dialog reacts to, parsed once from config
#[derive(Debug, Clone)]
pub struct DialogKeys {
    pub save: ParsedKeyBinding,
    pub clear_deadline: ParsedKeyBinding,
    pub paste: ParsedKeyBinding,
    pub save_label: String,
    pub clear_deadline_label: String,
}

/// Terminal front end for [`EditTaskDialog`]
#[derive(Debug, Clone)]
pub struct EditTaskView {
    pub dialog: EditTaskDialog,
    pub focus: DialogField,
    name: Editor,
    description: Editor,
    deadline: Editor,
    picker: Option<ActivePicker>,
}

impl EditTaskView {
    pub fn new(settings: DialogSettings) -> Self {
        Self {
            dialog: EditTaskDialog::new(settings),
            focus: DialogField::Name,
            name: Editor::new(false),
            description: Editor::new(true),
            deadline: Editor::new(false),
            picker: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.dialog.is_open()
    }

    /// Load `task` and show the dialog
    pub fn open(&mut self, task: Task) {
        log::debug!("Opening edit dialog for task {}", task.id);
        self.dialog.set_task(Some(task));
        self.dialog.set_open(true);
        self.focus = DialogField::Name;
        self.picker = None;
        self.sync_editors();
    }

    pub fn close(&mut self) {
        self.dialog.set_open(false);
        self.picker = None;
    }

    pub fn set_settings(&mut self, settings: DialogSettings) {
        self.dialog.set_settings(settings);
        if !settings.categories_enabled {
            if self.focus == DialogField::Categories {
                self.focus = DialogField::Save;
            }
            if matches!(self.picker, Some(ActivePicker::Categories(_))) {
                self.picker = None;
            }
        }
    }

    pub fn picker(&self) -> Option<&ActivePicker> {
        self.picker.as_ref()
    }

    /// Rebuild the text editors from the draft after it was reset
    fn sync_editors(&mut self) {
        let draft = self.dialog.draft();
        let name = draft.map(|t| t.name.as_str()).unwrap_or_default();
        let description = draft.and_then(|t| t.description.as_deref()).unwrap_or_default();
        let deadline = draft.and_then(|t| t.deadline.as_ref()).map(format_deadline).unwrap_or_default();
        self.name = Editor::from_string(name, false);
        self.description = Editor::from_string(description, true);
        self.deadline = Editor::from_string(&deadline, false);
    }

    /// Focus ring in display order; the category field only exists when enabled
    pub fn fields(&self) -> Vec<DialogField> {
        let mut fields = vec![
            DialogField::Name,
            DialogField::Description,
            DialogField::Deadline,
            DialogField::Emoji,
            DialogField::Color,
        ];
        if self.dialog.categories_visible() {
            fields.push(DialogField::Categories);
        }
        fields.push(DialogField::Save);
        fields.push(DialogField::Cancel);
        fields
    }

    pub fn focus_next(&mut self, forward: bool) {
        let fields = self.fields();
        let len = fields.len();
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward { (current + 1) % len } else { (current + len - 1) % len };
        self.focus = fields[next];
    }

    fn focused_editor(&mut self) -> Option<&mut Editor> {
        match self.focus {
            DialogField::Name => Some(&mut self.name),
            DialogField::Description => Some(&mut self.description),
            DialogField::Deadline => Some(&mut self.deadline),
            _ => None,
        }
    }

    /// Push the focused editor's text into the draft
    fn commit_focused_editor(&mut self) {
        let edit = match self.focus {
            DialogField::Name => TaskEdit::Name(self.name.to_string()),
            DialogField::Description => TaskEdit::Description(self.description.to_string()),
            DialogField::Deadline => TaskEdit::Deadline(self.deadline.to_string()),
            _ => return,
        };
        self.dialog.apply_edit(edit);
    }

    /// Insert text into the focused text field
    pub fn paste(&mut self, text: &str) {
        if let Some(editor) = self.focused_editor() {
            editor.insert_str(text);
            self.commit_focused_editor();
        }
    }

    pub fn clear_deadline(&mut self) {
        self.dialog.clear_deadline();
        self.deadline.clear();
    }

    fn cancel(&mut self) -> DialogAction {
        let action = self.dialog.cancel();
        self.sync_editors();
        action
    }

    fn dismiss(&mut self) -> DialogAction {
        let action = self.dialog.dismiss();
        self.sync_editors();
        action
    }

    fn save(&mut self, release_scroll_lock: impl FnOnce(), notifier: &mut dyn Notifier) -> DialogAction {
        // Validation problems are already shown inline next to the fields
        self.dialog.save(release_scroll_lock, notifier).unwrap_or(DialogAction::None)
    }

    fn open_picker(&mut self, all_categories: &[Category]) {
        let Some(draft) = self.dialog.draft() else {
            return;
        };
        self.picker = match self.focus {
            DialogField::Emoji => Some(ActivePicker::Emoji(EmojiPicker::new(draft.emoji.as_deref(), &draft.color))),
            DialogField::Color => Some(ActivePicker::Color(ColorPicker::new(&draft.color))),
            DialogField::Categories if self.dialog.categories_visible() => Some(ActivePicker::Categories(
                CategorySelector::new(all_categories.to_vec(), self.dialog.selected_categories()),
            )),
            _ => None,
        };
    }

    fn handle_picker_key(&mut self, key_event: KeyEvent) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        match picker {
            ActivePicker::Emoji(emoji_picker) => match emoji_picker.handle_key(key_event) {
                PickerOutcome::Picked(emoji) => {
                    self.dialog.set_emoji(emoji);
                    self.picker = None;
                }
                PickerOutcome::Closed => self.picker = None,
                PickerOutcome::Pending => {}
            },
            ActivePicker::Color(color_picker) => match color_picker.handle_key(key_event) {
                PickerOutcome::Picked(color) => {
                    self.dialog.set_color(color);
                    self.picker = None;
                }
                PickerOutcome::Closed => self.picker = None,
                PickerOutcome::Pending => {}
            },
            ActivePicker::Categories(selector) => match selector.handle_key(key_event) {
                PickerOutcome::Picked(selection) => self.dialog.set_selected_categories(selection),
                PickerOutcome::Closed => self.picker = None,
                PickerOutcome::Pending => {}
            },
        }
    }

    /// Route a key press. `release_scroll_lock` runs whenever a save is attempted.
    pub fn handle_key(
        &mut self,
        key_event: KeyEvent,
        keys: &DialogKeys,
        all_categories: &[Category],
        release_scroll_lock: impl FnOnce(),
        notifier: &mut dyn Notifier,
    ) -> DialogAction {
        if !self.is_open() {
            return DialogAction::None;
        }

        if self.picker.is_some() {
            self.handle_picker_key(key_event);
            return DialogAction::None;
        }

        if matches_binding(key_event, &keys.save) {
            return self.save(release_scroll_lock, notifier);
        }
        if matches_binding(key_event, &keys.clear_deadline) {
            self.clear_deadline();
            return DialogAction::None;
        }
        if matches_binding(key_event, &keys.paste) {
            match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
                Ok(text) => self.paste(&text),
                Err(e) => log::warn!("Clipboard unavailable: {}", e),
            }
            return DialogAction::None;
        }

        match key_event.code {
            KeyCode::Esc => return self.dismiss(),
            KeyCode::Tab => {
                self.focus_next(true);
                return DialogAction::None;
            }
            KeyCode::BackTab => {
                self.focus_next(false);
                return DialogAction::None;
            }
            _ => {}
        }

        match self.focus {
            DialogField::Name | DialogField::Description | DialogField::Deadline => {
                self.handle_text_key(key_event);
                DialogAction::None
            }
            DialogField::Emoji | DialogField::Color | DialogField::Categories => {
                if key_event.code == KeyCode::Enter {
                    self.open_picker(all_categories);
                }
                DialogAction::None
            }
            DialogField::Save => match key_event.code {
                // The button is disabled while the draft is invalid
                KeyCode::Enter if self.dialog.can_save() => self.save(release_scroll_lock, notifier),
                KeyCode::Left => {
                    self.focus = DialogField::Cancel;
                    DialogAction::None
                }
                _ => DialogAction::None,
            },
            DialogField::Cancel => match key_event.code {
                KeyCode::Enter => self.cancel(),
                KeyCode::Right => {
                    self.focus = DialogField::Save;
                    DialogAction::None
                }
                _ => DialogAction::None,
            },
        }
    }

    fn handle_text_key(&mut self, key_event: KeyEvent) {
        let Some(editor) = self.focused_editor() else {
            return;
        };
        let before = editor.to_string();

        match key_event.code {
            KeyCode::Char('z') if has_primary_modifier(key_event.modifiers) => {
                editor.undo();
            }
            // Other modified chars are bindings we do not handle here
            KeyCode::Char(_) if has_primary_modifier(key_event.modifiers) => return,
            KeyCode::Char(c) => editor.insert_char(c),
            KeyCode::Enter if editor.is_multiline() => editor.insert_newline(),
            KeyCode::Enter => {
                self.focus_next(true);
                return;
            }
            KeyCode::Backspace => editor.delete_char(),
            KeyCode::Delete => editor.delete_forward(),
            KeyCode::Left => editor.move_cursor_left(),
            KeyCode::Right => editor.move_cursor_right(),
            KeyCode::Up => editor.move_cursor_up(),
            KeyCode::Down => editor.move_cursor_down(),
            KeyCode::Home => editor.move_cursor_home(),
            KeyCode::End => editor.move_cursor_end(),
            _ => return,
        }
        // Cursor moves leave the draft alone
        if editor.to_string() != before {
            self.commit_focused_editor();
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, config: &Config, keys: &DialogKeys) {
        if !self.is_open() {
            return;
        }

        let theme = config.get_active_theme();
        let fg = parse_color(&theme.fg);
        let bg = parse_color(&theme.bg);
        let muted = parse_color(&theme.muted_fg);
        let error_fg = parse_color(&theme.error_fg);
        let base = Style::default().fg(fg).bg(bg);

        let popup = popup_area(area, 70, 90);
        f.render_widget(Clear, popup);

        let Some(draft) = self.dialog.draft().cloned() else {
            let block = Block::default().borders(Borders::ALL).title("Edit Task").style(base);
            f.render_widget(Paragraph::new("No task selected").block(block), popup);
            return;
        };

        let task_color = parse_color(&draft.color);
        let title = match draft.emoji.as_deref() {
            Some(emoji) => format!(" {} Edit Task ", emoji),
            None => " Edit Task ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(task_color))
            .style(base);
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let categories_visible = self.dialog.categories_visible();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),                                  // Last saved
                Constraint::Length(3),                                  // Name
                Constraint::Length(1),                                  // Name helper
                Constraint::Min(3),                                     // Description
                Constraint::Length(1),                                  // Description helper
                Constraint::Length(3),                                  // Deadline
                Constraint::Length(1),                                  // Deadline helper
                Constraint::Length(1),                                  // Emoji
                Constraint::Length(1),                                  // Color
                Constraint::Length(if categories_visible { 1 } else { 0 }), // Categories
                Constraint::Length(1),                                  // Spacer
                Constraint::Length(1),                                  // Buttons
                Constraint::Length(1),                                  // Hints
            ])
            .split(inner);

        if let Some(label) = self.dialog.last_save_label() {
            f.render_widget(
                Paragraph::new(label).style(Style::default().fg(muted)).alignment(Alignment::Center),
                chunks[0],
            );
        }

        let limits = self.dialog.settings().limits;

        // Name
        self.render_text_field(f, chunks[1], DialogField::Name, "Name", None, task_color, base);
        let name_len = self.name.to_string().chars().count();
        let name_helper = if self.dialog.name_is_empty() {
            Some(ValidationError::NameRequired.to_string())
        } else if self.dialog.name_error() {
            Some(ValidationError::NameTooLong { max: limits.task_name_max_length }.to_string())
        } else {
            None
        };
        render_helper(f, chunks[2], name_helper, format!("{}/{}", name_len, limits.task_name_max_length), error_fg, muted);

        // Description
        self.render_text_field(f, chunks[3], DialogField::Description, "Description", None, task_color, base);
        let description_len = self.description.to_string().chars().count();
        let description_helper = self
            .dialog
            .description_error()
            .then(|| ValidationError::DescriptionTooLong { max: limits.description_max_length }.to_string());
        render_helper(
            f,
            chunks[4],
            description_helper,
            format!("{}/{}", description_len, limits.description_max_length),
            error_fg,
            muted,
        );

        // Deadline, with the inline clear affordance when set
        let clear_hint = self
            .dialog
            .has_deadline()
            .then(|| format!("[{} clear]", keys.clear_deadline_label));
        self.render_text_field(f, chunks[5], DialogField::Deadline, "Deadline", clear_hint, task_color, base);
        let deadline_helper = self.dialog.deadline_error().then(|| ValidationError::InvalidDeadline.to_string());
        render_helper(f, chunks[6], deadline_helper, "YYYY-MM-DD HH:MM".to_string(), error_fg, muted);

        // Emoji
        let emoji_text = draft.emoji.clone().unwrap_or_else(|| "none".to_string());
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Emoji: ", field_label_style(self.focus == DialogField::Emoji, task_color, base)),
                Span::styled(emoji_text, base),
            ])),
            chunks[7],
        );

        // Color swatch
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Color: ", field_label_style(self.focus == DialogField::Color, task_color, base)),
                Span::styled("    ", Style::default().bg(task_color)),
                Span::styled(format!(" {}", draft.color), base),
            ])),
            chunks[8],
        );

        if categories_visible {
            let selected = self.dialog.selected_categories();
            let mut spans = vec![Span::styled(
                "Categories: ",
                field_label_style(self.focus == DialogField::Categories, task_color, base),
            )];
            if selected.is_empty() {
                spans.push(Span::styled("none", Style::default().fg(muted)));
            }
            for category in selected {
                let chip_bg = parse_color(&category.color);
                let emoji = category.emoji.as_deref().map(|e| format!("{} ", e)).unwrap_or_default();
                spans.push(Span::styled(
                    format!(" {}{} ", emoji, category.name),
                    Style::default().fg(get_contrast_text_color(chip_bg)).bg(chip_bg),
                ));
                spans.push(Span::raw(" "));
            }
            f.render_widget(Paragraph::new(Line::from(spans)), chunks[9]);
        }

        // Buttons
        let can_save = self.dialog.can_save();
        let cancel_style = button_style(self.focus == DialogField::Cancel, task_color, base);
        let save_style = if can_save {
            button_style(self.focus == DialogField::Save, task_color, base)
        } else {
            Style::default().fg(muted).add_modifier(Modifier::CROSSED_OUT)
        };
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("[ Cancel ]", cancel_style),
                Span::raw("   "),
                Span::styled("[ Save ]", save_style),
            ]))
            .alignment(Alignment::Right),
            chunks[11],
        );

        f.render_widget(
            Paragraph::new(format!(
                "Tab next • Shift+Tab prev • Enter open/confirm • {} save • Esc cancel",
                keys.save_label
            ))
            .style(Style::default().fg(muted)),
            chunks[12],
        );

        if self.picker.is_none() {
            self.place_cursor(f, &chunks);
        }
        match self.picker.as_mut() {
            Some(ActivePicker::Emoji(picker)) => picker.render(f, area, config),
            Some(ActivePicker::Color(picker)) => picker.render(f, area, config),
            Some(ActivePicker::Categories(selector)) => selector.render(f, area, config),
            None => {}
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render_text_field(
        &mut self,
        f: &mut Frame,
        area: Rect,
        field: DialogField,
        title: &str,
        right_title: Option<String>,
        focus_color: ratatui::style::Color,
        base: Style,
    ) {
        let focused = self.focus == field;
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(if focused { Style::default().fg(focus_color) } else { base });
        if let Some(hint) = right_title {
            block = block.title(Line::from(hint).right_aligned());
        }

        let viewport = area.height.saturating_sub(2) as usize;
        let editor = match field {
            DialogField::Name => &mut self.name,
            DialogField::Description => &mut self.description,
            _ => &mut self.deadline,
        };
        editor.update_scroll(viewport);
        let lines: Vec<Line> = editor.visible_lines(viewport).iter().map(|l| Line::from(l.clone())).collect();
        f.render_widget(Paragraph::new(lines).block(block).style(base), area);
    }

    fn place_cursor(&self, f: &mut Frame, chunks: &[Rect]) {
        let (editor, area) = match self.focus {
            DialogField::Name => (&self.name, chunks[1]),
            DialogField::Description => (&self.description, chunks[3]),
            DialogField::Deadline => (&self.deadline, chunks[5]),
            _ => return,
        };
        let (col, row) = editor.cursor_offset();
        let x = area.x + 1 + col.min(area.width.saturating_sub(3) as usize) as u16;
        let y = area.y + 1 + row as u16;
        if y < area.y + area.height.saturating_sub(1) {
            f.set_cursor_position((x, y));
        }
    }
}

fn matches_binding(key_event: KeyEvent, binding: &ParsedKeyBinding) -> bool {
    binding.requires_ctrl == has_primary_modifier(key_event.modifiers)
        && binding.key_code == key_event.code
        && !key_event.modifiers.contains(KeyModifiers::SHIFT)
}

fn render_helper(
    f: &mut Frame,
    area: Rect,
    error: Option<String>,
    hint: String,
    error_fg: ratatui::style::Color,
    muted: ratatui::style::Color,
) {
    let paragraph = match error {
        Some(message) => Paragraph::new(message).style(Style::default().fg(error_fg)),
        None => Paragraph::new(hint).style(Style::default().fg(muted)).alignment(Alignment::Right),
    };
    f.render_widget(paragraph, area);
}

fn field_label_style(focused: bool, focus_color: ratatui::style::Color, base: Style) -> Style {
    if focused {
        Style::default().fg(focus_color).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        base
    }
}

fn button_style(focused: bool, focus_color: ratatui::style::Color, base: Style) -> Style {
    if focused {
        Style::default()
            .fg(get_contrast_text_color(focus_color))
            .bg(focus_color)
            .add_modifier(Modifier::BOLD)
    } else {
        base
    }
}

/// Build the dialog key set from config bindings
pub fn dialog_keys(config: &Config) -> Result<DialogKeys, String> {
    let bindings = &config.key_bindings;
    Ok(DialogKeys {
        save: crate::utils::parse_key_binding(&bindings.save)?,
        clear_deadline: crate::utils::parse_key_binding(&bindings.clear_deadline)?,
        paste: crate::utils::parse_key_binding(&bindings.paste)?,
        save_label: format_key_binding_for_display(&bindings.save),
        clear_deadline_label: format_key_binding_for_display(&bindings.clear_deadline),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[derive(Default)]
    struct Toasts(Vec<String>);

    impl Notifier for Toasts {
        fn success(&mut self, message: String) {
            self.0.push(message);
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn keys() -> DialogKeys {
        dialog_keys(&Config::default()).unwrap()
    }

    fn task() -> Task {
        let mut task = Task::new("Buy milk".to_string());
        task.id = 1;
        task.color = "#ffffff".to_string();
        task.created_at = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        task
    }

    fn home() -> Category {
        Category { id: 1, name: "Home".to_string(), emoji: None, color: "#ff0000".to_string() }
    }

    /// Feed a key and return the action plus whether the scroll lock was released
    fn press(view: &mut EditTaskView, key_event: KeyEvent, toasts: &mut Toasts) -> (DialogAction, bool) {
        let mut released = false;
        let action = view.handle_key(key_event, &keys(), &[home()], || released = true, toasts);
        (action, released)
    }

    fn open_view(settings: DialogSettings) -> EditTaskView {
        let mut view = EditTaskView::new(settings);
        view.open(task());
        view
    }

    #[test]
    fn typing_updates_the_draft_and_ctrl_s_saves() {
        let mut view = open_view(DialogSettings::default());
        let mut toasts = Toasts::default();

        for c in " now".chars() {
            press(&mut view, key(KeyCode::Char(c)), &mut toasts);
        }
        assert_eq!(view.dialog.draft().unwrap().name, "Buy milk now");

        let (action, released) = press(&mut view, ctrl('s'), &mut toasts);
        let DialogAction::Save(saved) = action else {
            panic!("expected save");
        };
        assert_eq!(saved.name, "Buy milk now");
        assert!(released);
        assert_eq!(toasts.0.len(), 1);
    }

    #[test]
    fn blocked_save_still_releases_scroll_lock() {
        let mut view = open_view(DialogSettings::default());
        let mut toasts = Toasts::default();
        for _ in 0.."Buy milk".len() {
            press(&mut view, key(KeyCode::Backspace), &mut toasts);
        }
        assert!(!view.dialog.can_save());

        let (action, released) = press(&mut view, ctrl('s'), &mut toasts);
        assert_eq!(action, DialogAction::None);
        assert!(released);
        assert!(toasts.0.is_empty());
    }

    #[test]
    fn escape_dismisses_and_resets_editors() {
        let mut view = open_view(DialogSettings::default());
        let mut toasts = Toasts::default();
        press(&mut view, key(KeyCode::Char('!')), &mut toasts);

        let (action, released) = press(&mut view, key(KeyCode::Esc), &mut toasts);
        assert_eq!(action, DialogAction::Close);
        assert!(!released);
        assert_eq!(view.dialog.draft(), Some(&task()));
        assert_eq!(view.name.to_string(), "Buy milk");
    }

    #[test]
    fn cancel_button_closes() {
        let mut view = open_view(DialogSettings::default());
        let mut toasts = Toasts::default();
        press(&mut view, key(KeyCode::BackTab), &mut toasts);
        assert_eq!(view.focus, DialogField::Cancel);
        assert_eq!(press(&mut view, key(KeyCode::Enter), &mut toasts).0, DialogAction::Close);
    }

    #[test]
    fn focus_ring_skips_categories_when_disabled() {
        let settings = DialogSettings { categories_enabled: false, ..DialogSettings::default() };
        let view = open_view(settings);
        assert!(!view.fields().contains(&DialogField::Categories));

        let view = open_view(DialogSettings::default());
        assert!(view.fields().contains(&DialogField::Categories));
    }

    #[test]
    fn emoji_picker_sets_the_draft_emoji() {
        let mut view = open_view(DialogSettings::default());
        let mut toasts = Toasts::default();
        view.focus = DialogField::Emoji;

        press(&mut view, key(KeyCode::Enter), &mut toasts);
        assert!(matches!(view.picker(), Some(ActivePicker::Emoji(_))));
        press(&mut view, key(KeyCode::Right), &mut toasts);
        press(&mut view, key(KeyCode::Enter), &mut toasts);

        assert!(view.picker().is_none());
        assert_eq!(view.dialog.draft().unwrap().emoji.as_deref(), Some("✅"));
    }

    #[test]
    fn category_selector_updates_selection() {
        let mut view = open_view(DialogSettings::default());
        let mut toasts = Toasts::default();
        view.focus = DialogField::Categories;

        press(&mut view, key(KeyCode::Enter), &mut toasts);
        press(&mut view, key(KeyCode::Char(' ')), &mut toasts);
        press(&mut view, key(KeyCode::Esc), &mut toasts);

        assert!(view.is_open(), "Esc inside the selector only closes the selector");
        assert_eq!(view.dialog.draft().unwrap().category, Some(vec![home()]));
    }

    #[test]
    fn clear_deadline_binding_empties_the_field() {
        let mut with_deadline = task();
        with_deadline.deadline = Some(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap().and_hms_opt(3, 4, 0).unwrap());
        let mut view = EditTaskView::new(DialogSettings::default());
        view.open(with_deadline);
        assert_eq!(view.deadline.to_string(), "2026-01-02 03:04");

        let mut toasts = Toasts::default();
        press(&mut view, ctrl('d'), &mut toasts);

        assert!(view.deadline.is_empty());
        assert_eq!(view.dialog.draft(), Some(&task()));
    }

    #[test]
    fn enter_on_disabled_save_does_nothing() {
        let settings = DialogSettings {
            limits: crate::dialog::FieldLimits { task_name_max_length: 3, description_max_length: 10 },
            ..DialogSettings::default()
        };
        let mut view = open_view(settings);
        let mut toasts = Toasts::default();
        assert!(view.dialog.name_error());

        view.focus = DialogField::Save;
        let (action, released) = press(&mut view, key(KeyCode::Enter), &mut toasts);
        assert_eq!(action, DialogAction::None);
        assert!(!released);
    }

    #[test]
    fn paste_inserts_into_focused_field() {
        let mut view = open_view(DialogSettings::default());
        view.focus = DialogField::Description;
        view.paste("line one\nline two");
        assert_eq!(
            view.dialog.draft().unwrap().description.as_deref(),
            Some("line one\nline two")
        );
    }

    #[test]
    fn cursor_keys_leave_the_draft_untouched() {
        let mut original = task();
        original.deadline = Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(10, 0, 30).unwrap());
        let mut view = EditTaskView::new(DialogSettings::default());
        view.open(original.clone());
        let mut toasts = Toasts::default();

        for field in [DialogField::Name, DialogField::Description, DialogField::Deadline] {
            view.focus = field;
            for code in [KeyCode::Left, KeyCode::Right, KeyCode::Home, KeyCode::End, KeyCode::Up, KeyCode::Down] {
                press(&mut view, key(code), &mut toasts);
            }
        }

        assert_eq!(view.dialog.draft(), Some(&original));
        assert!(view.dialog.can_save());
    }

    #[test]
    fn undo_without_history_keeps_missing_description() {
        let mut view = open_view(DialogSettings::default());
        let mut toasts = Toasts::default();
        view.focus = DialogField::Description;

        press(&mut view, ctrl('z'), &mut toasts);
        press(&mut view, key(KeyCode::Backspace), &mut toasts);

        assert_eq!(view.dialog.draft().unwrap().description, None);
    }
}
