use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

use crate::Config;
use crate::models::Category;
use crate::tui::widgets::PickerOutcome;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::popup_area;

/// Multi-select list of categories.
/// Every toggle is reported right away; Enter or Esc only closes.
#[derive(Debug, Clone)]
pub struct CategorySelector {
    categories: Vec<Category>,
    selected: Vec<Category>,
    list_state: ListState,
}

impl CategorySelector {
    pub fn new(categories: Vec<Category>, selected: &[Category]) -> Self {
        let mut list_state = ListState::default();
        if !categories.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            categories,
            selected: selected.to_vec(),
            list_state,
        }
    }

    pub fn is_selected(&self, category: &Category) -> bool {
        self.selected.iter().any(|c| c.id == category.id)
    }

    pub fn handle_key(&mut self, key_event: KeyEvent) -> PickerOutcome<Vec<Category>> {
        match key_event.code {
            KeyCode::Up => {
                if let Some(i) = self.list_state.selected() {
                    self.list_state.select(Some(i.saturating_sub(1)));
                }
            }
            KeyCode::Down => {
                let next = self.list_state.selected().map_or(0, |i| i + 1);
                if next < self.categories.len() {
                    self.list_state.select(Some(next));
                }
            }
            KeyCode::Char(' ') => {
                if let Some(category) = self.list_state.selected().and_then(|i| self.categories.get(i)) {
                    let category = category.clone();
                    if self.is_selected(&category) {
                        self.selected.retain(|c| c.id != category.id);
                    } else {
                        self.selected.push(category);
                    }
                    return PickerOutcome::Picked(self.selected.clone());
                }
            }
            KeyCode::Enter | KeyCode::Esc => return PickerOutcome::Closed,
            _ => {}
        }
        PickerOutcome::Pending
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, config: &Config) {
        let theme = config.get_active_theme();
        let fg = parse_color(&theme.fg);
        let bg = parse_color(&theme.bg);
        let highlight_bg = parse_color(&theme.highlight_bg);
        let highlight_fg = get_contrast_text_color(highlight_bg);

        let popup = popup_area(area, 50, 60);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Categories")
            .title_alignment(Alignment::Center)
            .style(Style::default().fg(fg).bg(bg));
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        if self.categories.is_empty() {
            f.render_widget(
                Paragraph::new("No categories yet. Add one with `taskpad add-category`."),
                chunks[0],
            );
        } else {
            let items: Vec<ListItem> = self
                .categories
                .iter()
                .map(|category| {
                    let check = if self.is_selected(category) { "[x]" } else { "[ ]" };
                    let emoji = category.emoji.as_deref().map(|e| format!("{} ", e)).unwrap_or_default();
                    ListItem::new(Line::from(vec![
                        Span::raw(format!("{} ", check)),
                        Span::styled("● ", Style::default().fg(parse_color(&category.color))),
                        Span::raw(format!("{}{}", emoji, category.name)),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .style(Style::default().fg(fg).bg(bg))
                .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg).add_modifier(Modifier::BOLD));
            f.render_stateful_widget(list, chunks[0], &mut self.list_state);
        }

        f.render_widget(
            Paragraph::new("Space toggles • Enter/Esc done").style(Style::default().fg(parse_color(&theme.muted_fg))),
            chunks[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn categories() -> Vec<Category> {
        ["Home", "Work", "Errands"]
            .iter()
            .enumerate()
            .map(|(i, name)| Category {
                id: i as i64 + 1,
                name: name.to_string(),
                emoji: None,
                color: "#ffffff".to_string(),
            })
            .collect()
    }

    #[test]
    fn toggling_reports_the_new_selection() {
        let all = categories();
        let mut selector = CategorySelector::new(all.clone(), &[all[0].clone()]);

        selector.handle_key(key(KeyCode::Down));
        assert_eq!(
            selector.handle_key(key(KeyCode::Char(' '))),
            PickerOutcome::Picked(vec![all[0].clone(), all[1].clone()])
        );

        selector.handle_key(key(KeyCode::Up));
        assert_eq!(
            selector.handle_key(key(KeyCode::Char(' '))),
            PickerOutcome::Picked(vec![all[1].clone()])
        );
        assert_eq!(selector.handle_key(key(KeyCode::Enter)), PickerOutcome::Closed);
    }

    #[test]
    fn down_stops_at_the_last_category() {
        let all = categories();
        let mut selector = CategorySelector::new(all.clone(), &[]);
        for _ in 0..10 {
            selector.handle_key(key(KeyCode::Down));
        }
        assert_eq!(
            selector.handle_key(key(KeyCode::Char(' '))),
            PickerOutcome::Picked(vec![all[2].clone()])
        );
    }

    #[test]
    fn empty_list_never_picks() {
        let mut selector = CategorySelector::new(Vec::new(), &[]);
        assert_eq!(selector.handle_key(key(KeyCode::Char(' '))), PickerOutcome::Pending);
    }
}
