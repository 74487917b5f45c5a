//! Render orchestration

use ratatui::{
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::ui::layout::ScreenLayout;
use crate::ui::widgets::{modal::render_modals, StatusBarWidget};

/// Draw the active screen: title line, body, modals over the body, status line.
pub fn render(frame: &mut Frame, app: &App) {
    let layout = ScreenLayout::new(frame.area());
    let theme = &app.theme;
    let screen = app.screen().as_screen();

    let mut title = vec![Span::styled(format!(" {} ", screen.kind().title()), theme.title_style(true))];
    if let Some(session) = app.screen().session() {
        let character = &session.character;
        title.push(Span::styled(
            format!("{}, level {} {}", character.name, character.level, character.class_summary()),
            theme.muted_style(),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), layout.title);

    screen.render(frame, layout.body, theme);
    render_modals(frame, &screen.state().modals, layout.body, theme);

    frame.render_widget(
        StatusBarWidget::new(theme)
            .message(screen.state().status.as_ref())
            .hints(screen.hints()),
        layout.status,
    );
}
