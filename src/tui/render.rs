use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::Config;
use crate::models::Task;
use crate::tui::app::Mode;
use crate::tui::widgets::{
    color::parse_color, help::render_help, status_bar::render_status_bar, task_list::render_task_list,
};
use crate::tui::{App, Layout};
use crate::utils::{format_deadline, format_timestamp};

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Taskpad")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    render_task_list(
        f,
        layout.list_area,
        &app.tasks,
        &mut app.ui.list_state,
        app.config.categories_enabled,
        &app.config,
    );
    render_task_detail(f, layout.detail_area, app.selected_task(), &app.config);

    let hints = app.key_hints();
    render_status_bar(f, layout.status_area, app.status.message.as_deref(), &hints, &app.config);

    // Overlays go last so they sit on top of the list
    match app.ui.mode {
        Mode::Help => render_help(f, layout.inner_area, &app.config),
        Mode::EditTask => app.edit_dialog.render(f, layout.inner_area, &app.config, &app.dialog_keys),
        Mode::List => {}
    }
}

fn render_task_detail(f: &mut Frame, area: Rect, task: Option<&Task>, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let muted = parse_color(&active_theme.muted_fg);
    let block = Block::default().borders(Borders::ALL).title("Details");

    let Some(task) = task else {
        let paragraph = Paragraph::new("No tasks yet. Add one with `taskpad add-task`.")
            .block(block)
            .style(Style::default().fg(muted))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    };

    let label = Style::default().fg(muted);
    let emoji = task.emoji.as_deref().map(|e| format!("{} ", e)).unwrap_or_default();
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{}{}", emoji, task.name),
            Style::default().fg(parse_color(&task.color)).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    match task.description.as_deref().filter(|d| !d.is_empty()) {
        Some(description) => lines.extend(description.lines().map(|l| Line::from(l.to_string()))),
        None => lines.push(Line::from(Span::styled("No description", label))),
    }
    lines.push(Line::from(""));

    let deadline = task.deadline.as_ref().map(format_deadline).unwrap_or_else(|| "none".to_string());
    lines.push(Line::from(vec![Span::styled("Deadline: ", label), Span::raw(deadline)]));

    if config.categories_enabled {
        let names: Vec<&str> = task.categories().iter().map(|c| c.name.as_str()).collect();
        let names = if names.is_empty() { "none".to_string() } else { names.join(", ") };
        lines.push(Line::from(vec![Span::styled("Categories: ", label), Span::raw(names)]));
    }

    if let Some(last_save) = task.last_save.as_ref() {
        lines.push(Line::from(vec![
            Span::styled("Last edited: ", label),
            Span::raw(format_timestamp(last_save)),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(fg_color))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
