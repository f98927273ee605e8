use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    /// Area inside the outer border
    pub inner_area: Rect,
    pub list_area: Rect,
    pub detail_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Smallest terminal the edit dialog still fits in
    pub const MIN_WIDTH: u16 = 50;
    pub const MIN_HEIGHT: u16 = 24;

    pub fn calculate(size: Rect) -> Self {
        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner_area);

        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(vertical[0]);

        Self {
            inner_area,
            list_area: horizontal[0],
            detail_area: horizontal[1],
            status_area: vertical[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bar_is_last_inner_row() {
        let layout = Layout::calculate(Rect::new(0, 0, 80, 30));
        assert_eq!(layout.status_area, Rect::new(1, 28, 78, 1));
        assert_eq!(layout.list_area.height, 27);
        assert_eq!(layout.list_area.width + layout.detail_area.width, 78);
    }
}
