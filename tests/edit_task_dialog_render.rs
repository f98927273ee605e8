use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use taskpad::dialog::{DialogSettings, Notifier};
use taskpad::tui::widgets::edit_task_dialog::{EditTaskView, dialog_keys};
use taskpad::{Category, Config, Database, Task};

struct NoToasts;

impl Notifier for NoToasts {
    fn success(&mut self, _message: String) {}
}

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

fn sample_task() -> Task {
    let mut task = Task::new("Buy milk".to_string());
    task.id = 1;
    task.emoji = Some("🥛".to_string());
    task.color = "#3da5ff".to_string();
    task.category = Some(vec![Category {
        id: 1,
        name: "Groceries".to_string(),
        emoji: None,
        color: "#3ae836".to_string(),
    }]);
    task.last_save = Some(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap().and_hms_opt(18, 5, 9).unwrap());
    task
}

fn render_view(view: &mut EditTaskView) -> String {
    let config = Config::default();
    let keys = dialog_keys(&config).unwrap();
    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    terminal
        .draw(|f| view.render(f, Rect::new(0, 0, 100, 40), &config, &keys))
        .unwrap();
    buffer_text(&terminal)
}

#[test]
fn renders_fields_and_last_edited_header() {
    let mut view = EditTaskView::new(DialogSettings::default());
    view.open(sample_task());

    let text = render_view(&mut view);
    assert!(text.contains("Edit Task"));
    assert!(text.contains("Buy milk"));
    assert!(text.contains("Last edited 2026-10-01 at 18:05:09"));
    assert!(text.contains("Categories:"));
    assert!(text.contains("Groceries"));
    assert!(text.contains("#3da5ff"));
}

#[test]
fn category_section_is_absent_when_disabled() {
    let settings = DialogSettings { categories_enabled: false, ..DialogSettings::default() };
    let mut view = EditTaskView::new(settings);
    view.open(sample_task());

    let text = render_view(&mut view);
    assert!(!text.contains("Categories"));
    assert!(!text.contains("Groceries"));
}

#[test]
fn empty_name_shows_required_helper() {
    let config = Config::default();
    let keys = dialog_keys(&config).unwrap();
    let mut view = EditTaskView::new(DialogSettings::default());
    view.open(sample_task());

    for _ in 0.."Buy milk".len() {
        view.handle_key(
            KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE),
            &keys,
            &[],
            || {},
            &mut NoToasts,
        );
    }

    assert!(!view.dialog.can_save());
    let text = render_view(&mut view);
    assert!(text.contains("Name is required"));
}

#[test]
fn deadline_shows_clear_hint_only_when_set() {
    let mut task = sample_task();
    task.deadline = Some(NaiveDate::from_ymd_opt(2026, 11, 2).unwrap().and_hms_opt(8, 30, 0).unwrap());
    let mut view = EditTaskView::new(DialogSettings::default());
    view.open(task);

    let text = render_view(&mut view);
    assert!(text.contains("2026-11-02 08:30"));
    assert!(text.contains("Ctrl+d clear"));

    view.clear_deadline();
    let text = render_view(&mut view);
    assert!(!text.contains("Ctrl+d clear"));
}

#[test]
fn open_dialog_without_task_does_not_panic() {
    let mut view = EditTaskView::new(DialogSettings::default());
    view.dialog.set_open(true);

    let text = render_view(&mut view);
    assert!(text.contains("No task selected"));
}

#[test]
fn closed_dialog_draws_nothing() {
    let mut view = EditTaskView::new(DialogSettings::default());
    view.open(sample_task());
    view.close();

    let text = render_view(&mut view);
    assert!(!text.contains("Edit Task"));
}

#[test]
fn whole_app_renders_with_dialog_open() {
    let database = Database::open_in_memory().unwrap();
    database.insert_task(&Task::new("Water plants".to_string())).unwrap();
    let config_path = std::env::temp_dir().join("taskpad-render-test.toml");
    let mut app = taskpad::tui::App::new(Config::default(), config_path, database).unwrap();
    app.open_edit_dialog();

    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    terminal
        .draw(|f| {
            let layout = taskpad::tui::Layout::calculate(f.area());
            taskpad::tui::render(f, &mut app, &layout);
        })
        .unwrap();

    let text = buffer_text(&terminal);
    assert!(text.contains("Taskpad"));
    assert!(text.contains("Edit Task"));
    assert!(text.contains("Water plants"));
}
