// Screen layout: panel arrangement and overlay placement.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Username Form (3 rows)                            |
// +--------------------------------------------------+
// | Result Panel (fill)                               |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// Toasts float in the top-right corner of the result panel; dialogs are
// centered over the whole screen.

use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};

/// Toast size in cells.
pub const TOAST_WIDTH: u16 = 46;
pub const TOAST_HEIGHT: u16 = 3;

/// Dialog size in cells.
pub const MODAL_WIDTH: u16 = 52;
pub const MODAL_HEIGHT: u16 = 9;

#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: usage counter and last check time.
    pub status_bar: Rect,
    /// Username input with its submit button.
    pub form: Rect,
    /// Loading message or the revealed result card.
    pub results: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(3), // form
            Constraint::Min(6),    // results
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        form: vertical[1],
        results: vertical[2],
        help_bar: vertical[3],
    }
}

/// Compute a centered rectangle of the given size within `area`, clamped to
/// the available space.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width);
    let clamped_height = height.min(area.height);

    let vertical = Layout::vertical([Constraint::Length(clamped_height)])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(clamped_width)])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

/// Dialog box for an open modal.
pub fn modal_rect(area: Rect) -> Rect {
    centered_rect(MODAL_WIDTH, MODAL_HEIGHT, area)
}

/// Toast box anchored to the top-right corner of `area`.
///
/// `offset` pushes the box right by that many cells (slide in/out); the box
/// is clipped at the right edge.
pub fn toast_rect(area: Rect, offset: u16) -> Rect {
    let width = TOAST_WIDTH.min(area.width);
    let height = TOAST_HEIGHT.min(area.height);
    let x = area.x + area.width.saturating_sub(width) + offset.min(width);
    let visible = (area.x + area.width).saturating_sub(x);
    Rect::new(x, area.y, width.min(visible), height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_stacks_rows_top_to_bottom() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = build_layout(area);

        assert_eq!(layout.status_bar, Rect::new(0, 0, 80, 1));
        assert_eq!(layout.form, Rect::new(0, 1, 80, 3));
        assert_eq!(layout.results, Rect::new(0, 4, 80, 19));
        assert_eq!(layout.help_bar, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(MODAL_WIDTH, MODAL_HEIGHT, area);
        assert_eq!(rect.width, MODAL_WIDTH);
        assert_eq!(rect.height, MODAL_HEIGHT);
        assert_eq!(rect.x, (80 - MODAL_WIDTH) / 2);
        assert_eq!(rect.y, (24 - MODAL_HEIGHT) / 2);
    }

    #[test]
    fn centered_rect_clamps_to_small_area() {
        let rect = centered_rect(MODAL_WIDTH, MODAL_HEIGHT, Rect::new(0, 0, 20, 4));
        assert_eq!(rect.width, 20);
        assert_eq!(rect.height, 4);
    }

    #[test]
    fn toast_hugs_right_edge_and_slides_off() {
        let area = Rect::new(0, 4, 80, 19);
        let rest = toast_rect(area, 0);
        assert_eq!(rest, Rect::new(80 - TOAST_WIDTH, 4, TOAST_WIDTH, TOAST_HEIGHT));

        let sliding = toast_rect(area, 10);
        assert_eq!(sliding.x, 80 - TOAST_WIDTH + 10);
        assert_eq!(sliding.width, TOAST_WIDTH - 10);
        assert!(sliding.right() <= area.right());
    }
}
