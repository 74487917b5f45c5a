//! Hit point bar widget

use charsheet_core::character::HitPoints;
use charsheet_core::rules::hp_bar::hp_bar_segments;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::ui::theme::SheetTheme;

/// One-line bar of current, temporary and missing HP followed by the numbers.
pub struct HpBarWidget<'a> {
    hit_points: &'a HitPoints,
    theme: &'a SheetTheme,
    width: u16,
}

impl<'a> HpBarWidget<'a> {
    pub fn new(hit_points: &'a HitPoints, theme: &'a SheetTheme) -> Self {
        Self {
            hit_points,
            theme,
            width: 20,
        }
    }

    /// Bar width in columns, excluding the label.
    pub fn width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    fn label(&self) -> String {
        let hp = self.hit_points;
        if hp.temporary > 0 {
            format!(" {}/{} (+{})", hp.current, hp.maximum, hp.temporary)
        } else {
            format!(" {}/{}", hp.current, hp.maximum)
        }
    }
}

impl Widget for HpBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label = self.label();
        let budget = self
            .width
            .min(area.width.saturating_sub(label.len() as u16));
        let hp = self.hit_points;
        let segments = hp_bar_segments(hp.current, hp.maximum, hp.temporary, budget);
        let hp_color = self.theme.hp_color(hp.ratio());

        let line = Line::from(vec![
            Span::styled(
                "█".repeat(segments.current as usize),
                Style::default().fg(hp_color),
            ),
            Span::styled(
                "█".repeat(segments.temporary as usize),
                Style::default().fg(self.theme.hp_temporary),
            ),
            Span::styled(
                "░".repeat(segments.empty as usize),
                Style::default().fg(self.theme.hp_empty),
            ),
            Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(hp: &HitPoints, width: u16) -> String {
        let theme = SheetTheme::default();
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        HpBarWidget::new(hp, &theme).width(width).render(area, &mut buf);
        (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_bar_fills_budget() {
        let mut hp = HitPoints::new(20);
        hp.current = 10;
        let text = rendered(&hp, 10);
        assert!(text.starts_with("█████░░░░░ 10/20"));
    }

    #[test]
    fn test_temporary_shown_in_label() {
        let mut hp = HitPoints::new(20);
        hp.temporary = 5;
        let text = rendered(&hp, 10);
        assert!(text.contains("20/20 (+5)"));
    }
}
