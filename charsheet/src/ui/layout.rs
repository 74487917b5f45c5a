//! Layout helpers

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen frame: title line, body, status line.
pub struct ScreenLayout {
    pub title: Rect,
    pub body: Rect,
    pub status: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);
        Self {
            title: chunks[0],
            body: chunks[1],
            status: chunks[2],
        }
    }
}

/// A rectangle of fixed size centered in `area`, shrunk to fit.
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Split `area` into equal columns.
pub fn columns(area: Rect, count: u32) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..count).map(|_| Constraint::Ratio(1, count)))
        .split(area)
        .to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fits_small_area() {
        let area = Rect::new(0, 0, 20, 10);
        let popup = centered_rect_fixed(50, 4, area);
        assert_eq!(popup, Rect::new(0, 3, 20, 4));
    }

    #[test]
    fn test_screen_layout_rows() {
        let layout = ScreenLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.title.height, 1);
        assert_eq!(layout.status.y, 23);
        assert_eq!(layout.body.height, 22);
    }
}
