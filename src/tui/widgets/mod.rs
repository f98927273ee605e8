use ratatui::layout::{Constraint, Flex, Layout, Rect};

pub mod category_selector;
pub mod color;
pub mod color_picker;
pub mod edit_task_dialog;
pub mod editor;
pub mod emoji_picker;
pub mod help;
pub mod status_bar;
pub mod task_list;

/// Result of feeding a key to one of the pickers
#[derive(Debug, Clone, PartialEq)]
pub enum PickerOutcome<T> {
    /// Still open, nothing chosen yet
    Pending,
    Picked(T),
    Closed,
}

/// Centered rect covering a percentage of `area`.
/// Based on ratatui popup example: https://ratatui.rs/examples/apps/popup/
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
