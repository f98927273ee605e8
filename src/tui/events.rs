use std::io;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size as terminal_size};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::tui::App;
use crate::tui::app::Mode;
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::utils::{ParsedKeyBinding, has_primary_modifier, parse_key_binding};

/// Guard that ensures terminal state is restored even on panic.
/// If the terminal is left in raw mode or the alternate screen, the
/// user's shell is unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore on normal exit; the guard does nothing on drop afterwards
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Already cleaning up, errors have nowhere to go
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check size before entering the alternate screen so the error stays visible
    let (width, height) = terminal_size()?;
    if width < Layout::MIN_WIDTH || height < Layout::MIN_HEIGHT {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width,
            height,
            Layout::MIN_WIDTH,
            Layout::MIN_HEIGHT
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    log::info!("TUI started with {} tasks", app.tasks.len());

    loop {
        app.check_status_message_timeout();

        let terminal_size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, terminal_size.width, terminal_size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(terminal_rect);
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(std::time::Duration::from_millis(16))? {
            match event::read()? {
                // Only Press events; Windows also reports releases
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    if handle_key_event(&mut app, key_event)? {
                        break;
                    }
                }
                Event::Mouse(mouse_event) => match mouse_event.kind {
                    MouseEventKind::ScrollUp => app.move_selection_up(),
                    MouseEventKind::ScrollDown => app.move_selection_down(),
                    _ => {}
                },
                _ => {}
            }
        }
    }

    guard.restore()?;
    log::info!("TUI exited");
    Ok(())
}

fn key_matches(key_event: &KeyEvent, binding: &ParsedKeyBinding) -> bool {
    key_event.code == binding.key_code && has_primary_modifier(key_event.modifiers) == binding.requires_ctrl
}

fn binding(key_str: &str) -> Result<ParsedKeyBinding, TuiError> {
    parse_key_binding(key_str).map_err(TuiError::KeyBindingError)
}

/// Returns true when the user asked to quit
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match app.ui.mode {
        // The dialog owns the keyboard while open
        Mode::EditTask => {
            app.handle_dialog_key(key_event);
            Ok(false)
        }
        Mode::Help => {
            let help = binding(&app.config.key_bindings.help)?;
            if key_event.code == KeyCode::Esc || key_matches(&key_event, &help) {
                app.exit_help_mode();
            }
            Ok(false)
        }
        Mode::List => handle_list_key(app, key_event),
    }
}

fn handle_list_key(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let kb = app.config.key_bindings.clone();

    if key_matches(&key_event, &binding(&kb.quit)?) {
        return Ok(true);
    }
    if key_matches(&key_event, &binding(&kb.help)?) {
        app.enter_help_mode();
    } else if key_matches(&key_event, &binding(&kb.list_up)?) || key_event.code == KeyCode::Up {
        app.move_selection_up();
    } else if key_matches(&key_event, &binding(&kb.list_down)?) || key_event.code == KeyCode::Down {
        app.move_selection_down();
    } else if key_matches(&key_event, &binding(&kb.edit)?) || key_event.code == KeyCode::Enter {
        app.open_edit_dialog();
    } else if key_matches(&key_event, &binding(&kb.toggle_categories)?) {
        app.toggle_categories();
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use crate::{Config, Database};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let database = Database::open_in_memory().unwrap();
        database.insert_task(&Task::new("one".to_string())).unwrap();
        database.insert_task(&Task::new("two".to_string())).unwrap();
        App::new(Config::default(), std::env::temp_dir().join("taskpad-events-test.toml"), database).unwrap()
    }

    #[test]
    fn list_keys_move_and_open_the_dialog() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('j'))).unwrap();
        assert_eq!(app.ui.selected_index, 1);

        handle_key_event(&mut app, key(KeyCode::Char('e'))).unwrap();
        assert_eq!(app.ui.mode, Mode::EditTask);
        assert_eq!(app.edit_dialog.dialog.task().map(|t| t.name.as_str()), Some("two"));
    }

    #[test]
    fn quit_is_ignored_while_editing() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(!handle_key_event(&mut app, key(KeyCode::Char('q'))).unwrap());
        assert_eq!(app.edit_dialog.dialog.draft().map(|t| t.name.as_str()), Some("oneq"));

        handle_key_event(&mut app, key(KeyCode::Esc)).unwrap();
        assert!(handle_key_event(&mut app, key(KeyCode::Char('q'))).unwrap());
    }

    #[test]
    fn help_toggles() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::F(1))).unwrap();
        assert_eq!(app.ui.mode, Mode::Help);
        handle_key_event(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.ui.mode, Mode::List);
    }
}
