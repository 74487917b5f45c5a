//! Modal popups drawn over the active screen.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use crate::modal::{
    CastResolution, Confirmation, HelpOverlay, ListPicker, Modal, ModalStack, NumericEntry,
    RestFlow, RestPhase, SearchModal,
};
use crate::ui::layout::centered_rect_fixed;
use crate::ui::theme::SheetTheme;
use crate::ui::widgets::{panel, InputWidget};

/// Draw every open modal, bottom first, so the active one ends on top.
pub fn render_modals(frame: &mut Frame, stack: &ModalStack, area: Rect, theme: &SheetTheme) {
    for modal in stack.iter() {
        render_modal(frame, modal, area, theme);
    }
}

fn render_modal(frame: &mut Frame, modal: &Modal, area: Rect, theme: &SheetTheme) {
    match modal {
        Modal::NumericEntry(entry) => render_numeric(frame, entry, area, theme),
        Modal::Confirmation(confirm) => render_confirmation(frame, confirm, area, theme),
        Modal::ListPicker(picker) => render_picker(frame, picker, area, theme),
        Modal::Search(search) => render_search(frame, search, area, theme),
        Modal::Cast(cast) => render_cast(frame, cast, area, theme),
        Modal::Rest(rest) => render_rest(frame, rest, area, theme),
        Modal::Help(help) => render_help(frame, help, area, theme),
    }
}

fn popup(frame: &mut Frame, width: u16, height: u16, area: Rect) -> Rect {
    let popup_area = centered_rect_fixed(width, height, area);
    frame.render_widget(Clear, popup_area);
    popup_area
}

fn hint(text: &str, theme: &SheetTheme) -> Line<'static> {
    Line::styled(text.to_string(), theme.muted_style())
}

fn render_numeric(frame: &mut Frame, entry: &NumericEntry, area: Rect, theme: &SheetTheme) {
    let popup_area = popup(frame, 36, 6, area);
    let mut lines = vec![
        Line::from(vec![
            Span::raw("> "),
            Span::styled(entry.buffer.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
        ]),
        Line::from(""),
    ];
    lines.push(if entry.purpose.accepts_arrows() {
        hint("Enter apply  ↑/↓ adjust  Esc cancel", theme)
    } else {
        hint("Enter apply  Esc cancel", theme)
    });
    panel::render_text(frame, popup_area, entry.purpose.title(), lines, true, theme);
}

fn render_confirmation(frame: &mut Frame, confirm: &Confirmation, area: Rect, theme: &SheetTheme) {
    let width = (confirm.prompt.chars().count() as u16 + 6).clamp(30, 60);
    let popup_area = popup(frame, width, 6, area);
    let lines = vec![
        Line::from(confirm.prompt.clone()),
        Line::from(""),
        hint("y confirm  any other key cancels", theme),
    ];
    panel::render_text(frame, popup_area, "Confirm", lines, true, theme);
}

fn render_picker(frame: &mut Frame, picker: &ListPicker, area: Rect, theme: &SheetTheme) {
    let height = (picker.options.len() as u16 + 3).clamp(6, 20);
    let popup_area = popup(frame, 44, height, area);
    let multi = picker.selected.is_some();
    let rows = picker
        .options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            if multi {
                let mark = if picker.is_marked(index) { "[x]" } else { "[ ]" };
                Line::from(format!("{mark} {option}"))
            } else {
                Line::from(option.clone())
            }
        })
        .collect();
    let title = if multi {
        format!("{} (Space toggle, Enter confirm)", picker.title)
    } else {
        picker.title.clone()
    };
    panel::render_list(frame, popup_area, title, rows, picker.cursor, true, "Nothing to choose", theme);
}

fn render_search(frame: &mut Frame, search: &SearchModal, area: Rect, theme: &SheetTheme) {
    let popup_area = popup(frame, 56, 18, area);
    let [query_area, results_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(popup_area);

    frame.render_widget(
        InputWidget::new(&search.query, theme)
            .title("Search items")
            .placeholder("type at least 2 letters"),
        query_area,
    );

    let rows = search
        .results
        .iter()
        .map(|hit| {
            Line::from(vec![
                Span::styled(format!("{:<7}", hit.group.label()), theme.muted_style()),
                Span::raw(hit.item.name.clone()),
            ])
        })
        .collect();
    panel::render_list(frame, results_area, "Results", rows, search.cursor, true, "No matches", theme);
}

fn render_cast(frame: &mut Frame, cast: &CastResolution, area: Rect, theme: &SheetTheme) {
    let height = (cast.labels.len() as u16 + 3).clamp(5, 14);
    let popup_area = popup(frame, 56, height, area);
    let rows = cast.labels.iter().map(|label| Line::from(label.clone())).collect();
    panel::render_list(
        frame,
        popup_area,
        format!("Cast {}", cast.spell),
        rows,
        cast.cursor,
        true,
        "No way to cast this now",
        theme,
    );
}

fn render_rest(frame: &mut Frame, rest: &RestFlow, area: Rect, theme: &SheetTheme) {
    let popup_area = popup(frame, 48, 10, area);
    let (title, lines) = match rest.phase {
        RestPhase::Menu => (
            "Rest",
            vec![
                Line::from("s  Short rest"),
                Line::from("l  Long rest"),
                Line::from(""),
                hint("Esc close", theme),
            ],
        ),
        RestPhase::Short => (
            "Short Rest",
            vec![
                Line::from(vec![
                    Span::raw("Hit dice to spend: "),
                    Span::styled(
                        rest.dice_to_spend.to_string(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(""),
                hint("↑/↓ adjust  Enter rest  Esc back", theme),
            ],
        ),
        RestPhase::Long => (
            "Long Rest",
            vec![
                Line::from("Take a long rest?"),
                Line::from(""),
                hint("Enter/y rest  Esc back", theme),
            ],
        ),
        RestPhase::Result => {
            let mut lines: Vec<Line> = rest.summary.iter().map(|s| Line::from(s.clone())).collect();
            lines.push(Line::from(""));
            lines.push(hint("Press any key", theme));
            ("Rested", lines)
        }
    };
    panel::render_text(frame, popup_area, title, lines, true, theme);
}

fn render_help(frame: &mut Frame, help: &HelpOverlay, area: Rect, theme: &SheetTheme) {
    let height = help.bindings.len() as u16 + 5;
    let popup_area = popup(frame, 56, height, area);

    let mut lines = vec![Line::from(Span::styled(
        "Keys:",
        Style::default().add_modifier(Modifier::UNDERLINED),
    ))];
    for (keys, action) in &help.bindings {
        lines.push(Line::from(format!("  {keys:<14} {action}")));
    }
    lines.push(Line::from(""));
    lines.push(hint("Press any key to close", theme));

    let paragraph = Paragraph::new(lines)
        .block(panel::block(help.title, true, theme))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup_area);
}
