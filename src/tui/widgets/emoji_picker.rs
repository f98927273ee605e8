use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::widgets::PickerOutcome;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::popup_area;

const EMOJIS: &[&str] = &[
    "✅", "📝", "📌", "⭐", "🔥", "⏰", "📅", "💡",
    "🛒", "🥛", "🍎", "🍳", "🏠", "🧹", "🧺", "🪴",
    "💼", "💻", "📧", "📞", "📚", "🎓", "✏️", "📊",
    "🏋️", "🏃", "🧘", "💊", "🎵", "🎮", "🎨", "✈️",
    "🎁", "🎉", "❤️", "🐶", "🚗", "💰", "🔧", "🌱",
];

/// Cells per grid row
const COLUMNS: usize = 8;

/// Grid of emojis; the first cell clears the emoji
#[derive(Debug, Clone)]
pub struct EmojiPicker {
    entries: Vec<Option<String>>,
    selected: usize,
    color: String,
}

impl EmojiPicker {
    /// `current` is preselected; `color` is the task color used for the highlight
    pub fn new(current: Option<&str>, color: &str) -> Self {
        let mut entries: Vec<Option<String>> = std::iter::once(None)
            .chain(EMOJIS.iter().map(|e| Some(e.to_string())))
            .collect();

        // Emojis set elsewhere (e.g. from the CLI) stay pickable
        if let Some(current) = current {
            if !EMOJIS.contains(&current) {
                entries.insert(1, Some(current.to_string()));
            }
        }

        let selected = entries
            .iter()
            .position(|e| e.as_deref() == current)
            .unwrap_or(0);

        Self {
            entries,
            selected,
            color: color.to_string(),
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.entries.get(self.selected).and_then(|e| e.as_deref())
    }

    pub fn handle_key(&mut self, key_event: KeyEvent) -> PickerOutcome<Option<String>> {
        let last = self.entries.len().saturating_sub(1);
        match key_event.code {
            KeyCode::Left => self.selected = self.selected.saturating_sub(1),
            KeyCode::Right => self.selected = (self.selected + 1).min(last),
            KeyCode::Up => self.selected = self.selected.saturating_sub(COLUMNS),
            KeyCode::Down => self.selected = (self.selected + COLUMNS).min(last),
            KeyCode::Enter => {
                return PickerOutcome::Picked(self.entries.get(self.selected).cloned().flatten());
            }
            KeyCode::Esc => return PickerOutcome::Closed,
            _ => {}
        }
        PickerOutcome::Pending
    }

    pub fn render(&self, f: &mut Frame, area: Rect, config: &Config) {
        let theme = config.get_active_theme();
        let fg = parse_color(&theme.fg);
        let bg = parse_color(&theme.bg);
        let highlight_bg = parse_color(&self.color);
        let highlight_fg = get_contrast_text_color(highlight_bg);

        let popup = popup_area(area, 50, 50);
        f.render_widget(Clear, popup);

        let mut lines: Vec<Line> = self
            .entries
            .chunks(COLUMNS)
            .enumerate()
            .map(|(row, chunk)| {
                let spans: Vec<Span> = chunk
                    .iter()
                    .enumerate()
                    .map(|(col, entry)| {
                        let text = format!(" {} ", entry.as_deref().unwrap_or("∅"));
                        if row * COLUMNS + col == self.selected {
                            Span::styled(text, Style::default().fg(highlight_fg).bg(highlight_bg).add_modifier(Modifier::BOLD))
                        } else {
                            Span::styled(text, Style::default().fg(fg).bg(bg))
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Arrows move • Enter picks • ∅ removes the emoji • Esc closes",
            Style::default().fg(parse_color(&theme.muted_fg)),
        )));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Choose Emoji")
                    .title_alignment(Alignment::Center),
            )
            .style(Style::default().fg(fg).bg(bg))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, popup);
    }
}
