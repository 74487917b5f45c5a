//! Bordered list panel with a cursor row.

use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::focus;
use crate::ui::theme::SheetTheme;

pub fn block<'a>(title: impl Into<String>, focused: bool, theme: &SheetTheme) -> Block<'a> {
    Block::default()
        .title(Line::styled(
            format!(" {} ", title.into()),
            theme.title_style(focused),
        ))
        .borders(Borders::ALL)
        .border_style(theme.border_style(focused))
}

/// Render `rows` inside a titled block, highlighting the (clamped) cursor.
/// An empty list shows `placeholder` instead.
#[allow(clippy::too_many_arguments)]
pub fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: impl Into<String>,
    rows: Vec<Line<'_>>,
    cursor: usize,
    focused: bool,
    placeholder: &str,
    theme: &SheetTheme,
) {
    let block = block(title, focused, theme);
    if rows.is_empty() {
        let text = Paragraph::new(Line::styled(placeholder.to_string(), theme.muted_style()))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(text, area);
        return;
    }

    let selected = focus::clamp(cursor, rows.len());
    let list = List::new(rows.into_iter().map(ListItem::new))
        .block(block)
        .highlight_style(theme.cursor_style(focused));
    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render a paragraph of lines inside a titled block.
pub fn render_text(
    frame: &mut Frame,
    area: Rect,
    title: impl Into<String>,
    lines: Vec<Line<'_>>,
    focused: bool,
    theme: &SheetTheme,
) {
    let paragraph = Paragraph::new(lines)
        .block(block(title, focused, theme))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
