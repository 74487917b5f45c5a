//! Status bar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::screens::StatusMessage;
use crate::ui::theme::SheetTheme;

/// Bottom line: the one-shot status message, or key hints when there is none.
pub struct StatusBarWidget<'a> {
    message: Option<&'a StatusMessage>,
    hints: &'a str,
    theme: &'a SheetTheme,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(theme: &'a SheetTheme) -> Self {
        Self {
            message: None,
            hints: "",
            theme,
        }
    }

    pub fn message(mut self, message: Option<&'a StatusMessage>) -> Self {
        self.message = message;
        self
    }

    pub fn hints(mut self, hints: &'a str) -> Self {
        self.hints = hints;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = match self.message {
            Some(message) => Line::from(Span::styled(
                format!(" {}", message.text),
                self.theme.status_style(message.is_error),
            )),
            None => Line::from(Span::styled(
                format!(" {}", self.hints),
                self.theme.muted_style(),
            )),
        };
        Paragraph::new(line).render(area, buf);
    }
}
