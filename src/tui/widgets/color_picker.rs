use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::widgets::PickerOutcome;
use crate::tui::widgets::color::{TASK_COLOR_PALETTE, get_contrast_text_color, parse_color};
use crate::tui::widgets::popup_area;

const COLUMNS: usize = 4;

#[derive(Debug, Clone)]
pub struct ColorPicker {
    colors: Vec<String>,
    selected: usize,
}

impl ColorPicker {
    pub fn new(current: &str) -> Self {
        let mut colors: Vec<String> = TASK_COLOR_PALETTE.iter().map(|c| c.to_string()).collect();
        let selected = match colors.iter().position(|c| c.eq_ignore_ascii_case(current)) {
            Some(index) => index,
            None => {
                colors.insert(0, current.to_string());
                0
            }
        };
        Self { colors, selected }
    }

    pub fn selected(&self) -> &str {
        &self.colors[self.selected]
    }

    pub fn handle_key(&mut self, key_event: KeyEvent) -> PickerOutcome<String> {
        let last = self.colors.len() - 1;
        match key_event.code {
            KeyCode::Left => self.selected = self.selected.saturating_sub(1),
            KeyCode::Right => self.selected = (self.selected + 1).min(last),
            KeyCode::Up => self.selected = self.selected.saturating_sub(COLUMNS),
            KeyCode::Down => self.selected = (self.selected + COLUMNS).min(last),
            KeyCode::Enter => return PickerOutcome::Picked(self.selected().to_string()),
            KeyCode::Esc => return PickerOutcome::Closed,
            _ => {}
        }
        PickerOutcome::Pending
    }

    pub fn render(&self, f: &mut Frame, area: Rect, config: &Config) {
        let theme = config.get_active_theme();
        let fg = parse_color(&theme.fg);
        let bg = parse_color(&theme.bg);

        let popup = popup_area(area, 50, 50);
        f.render_widget(Clear, popup);

        let mut lines: Vec<Line> = self
            .colors
            .chunks(COLUMNS)
            .enumerate()
            .map(|(row, chunk)| {
                let spans: Vec<Span> = chunk
                    .iter()
                    .enumerate()
                    .flat_map(|(col, color)| {
                        let swatch = parse_color(color);
                        let marker = if row * COLUMNS + col == self.selected { "▶" } else { " " };
                        let mut style = Style::default().fg(get_contrast_text_color(swatch)).bg(swatch);
                        if marker != " " {
                            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                        }
                        [
                            Span::styled(marker, Style::default().fg(fg).bg(bg)),
                            Span::styled(format!(" {} ", color), style),
                        ]
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Arrows move • Enter picks • Esc closes",
            Style::default().fg(parse_color(&theme.muted_fg)),
        )));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Choose Color")
                    .title_alignment(Alignment::Center),
            )
            .style(Style::default().fg(fg).bg(bg))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, popup);
    }
}
