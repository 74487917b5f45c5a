//! Text field widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::SheetTheme;

/// Single-line text field with a block cursor at the end.
pub struct InputWidget<'a> {
    content: &'a str,
    title: &'a str,
    placeholder: &'a str,
    theme: &'a SheetTheme,
    is_active: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(content: &'a str, theme: &'a SheetTheme) -> Self {
        Self {
            content,
            title: "",
            placeholder: "",
            theme,
            is_active: true,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.is_active));

        let inner = block.inner(area);
        block.render(area, buf);

        let cursor = Span::styled(
            " ",
            Style::default().add_modifier(Modifier::REVERSED),
        );
        let line = if self.content.is_empty() {
            Line::from(vec![
                Span::raw("> "),
                cursor,
                Span::styled(self.placeholder, self.theme.muted_style()),
            ])
        } else {
            Line::from(vec![Span::raw("> "), Span::raw(self.content), cursor])
        };

        Paragraph::new(line).render(inner, buf);
    }
}
