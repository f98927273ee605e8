use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display as display;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 60, 70);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

pub fn build_help_text(config: &Config) -> String {
    let kb = &config.key_bindings;
    let mut text = String::new();

    text.push_str("Task list:\n");
    text.push_str(&format!("  {} / {}: Move up/down\n", display(&kb.list_up), display(&kb.list_down)));
    text.push_str(&format!("  {} / Enter: Edit selected task\n", display(&kb.edit)));
    text.push_str(&format!(
        "  {}: Turn categories {}\n",
        display(&kb.toggle_categories),
        if config.categories_enabled { "off" } else { "on" }
    ));
    text.push('\n');

    text.push_str("Edit dialog:\n");
    text.push_str("  Tab / Shift+Tab: Next/previous field\n");
    text.push_str("  Enter: Open picker or press button\n");
    text.push_str(&format!("  {}: Save\n", display(&kb.save)));
    text.push_str(&format!("  {}: Clear deadline\n", display(&kb.clear_deadline)));
    text.push_str(&format!("  {}: Paste\n", display(&kb.paste)));
    text.push_str("  Esc: Discard changes and close\n");
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Show/hide help\n", display(&kb.help)));
    text.push_str(&format!("  {}: Quit\n", display(&kb.quit)));

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_reflects_category_toggle_state() {
        let mut config = Config::default();
        config.categories_enabled = true;
        assert!(build_help_text(&config).contains("c: Turn categories off"));

        config.categories_enabled = false;
        assert!(build_help_text(&config).contains("c: Turn categories on"));
    }
}
