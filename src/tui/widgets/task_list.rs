use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget,
};

use crate::Config;
use crate::models::Task;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::utils::format_deadline;

/// Text of the first row of a task entry: status, emoji, name and deadline
pub fn task_title(task: &Task, max_width: usize) -> String {
    let status = if task.done { "✓" } else { "○" };
    let emoji = task.emoji.as_deref().map(|e| format!("{} ", e)).unwrap_or_default();
    let due = task
        .deadline
        .as_ref()
        .map(|d| format!(" [{}]", format_deadline(d)))
        .unwrap_or_default();

    let title = format!("{} {}{}{}", status, emoji, task.name, due);
    if title.chars().count() > max_width {
        title.chars().take(max_width.saturating_sub(3)).collect::<String>() + "..."
    } else {
        title
    }
}

pub fn render_task_list(
    f: &mut Frame,
    area: Rect,
    tasks: &[Task],
    list_state: &mut ListState,
    show_categories: bool,
    config: &Config,
) {
    // 2 for borders, 2 for the color marker
    let max_width = area.width.saturating_sub(5) as usize;

    let active_theme = config.get_active_theme();
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);
    let muted = parse_color(&active_theme.muted_fg);

    let rows_per_item = if show_categories { 2 } else { 1 };
    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let mut lines = vec![Line::from(vec![
                Span::styled("▌ ", Style::default().fg(parse_color(&task.color))),
                Span::raw(task_title(task, max_width)),
            ])];
            if show_categories {
                let categories = task.categories();
                let mut spans = vec![Span::raw("    ")];
                if categories.is_empty() {
                    spans.push(Span::styled("[Uncategorized]", Style::default().fg(muted)));
                }
                for category in categories {
                    spans.push(Span::styled(
                        format!("[{}]", category.name),
                        Style::default().fg(parse_color(&category.color)),
                    ));
                    spans.push(Span::raw(" "));
                }
                lines.push(Line::from(spans));
            }
            let item = ListItem::new(lines);
            if task.done {
                item.style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            } else {
                item
            }
        })
        .collect();

    let list_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let list_area = list_areas[0];
    let scrollbar_area = list_areas[1];

    let total_items = items.len();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!("Tasks ({})", tasks.len())))
        .style(Style::default().fg(parse_color(&active_theme.fg)))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));

    StatefulWidget::render(list, list_area, f.buffer_mut(), list_state);

    let visible_items = (list_area.height.saturating_sub(2) as usize) / rows_per_item;
    if total_items > visible_items && visible_items > 0 && scrollbar_area.width > 0 {
        let scrollbar_inner_area = Rect::new(
            scrollbar_area.x,
            list_area.y + 1,
            scrollbar_area.width,
            list_area.height.saturating_sub(2),
        );
        let selected_index = list_state.selected().unwrap_or(0);
        let scroll_position = selected_index.saturating_sub(visible_items - 1);

        let mut scrollbar_state = ScrollbarState::new(total_items)
            .viewport_content_length(visible_items)
            .position(scroll_position);
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");

        f.render_stateful_widget(scrollbar, scrollbar_inner_area, &mut scrollbar_state);
    }
}
