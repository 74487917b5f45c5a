//! Color theme and styling for the character sheet

use charsheet_core::character::ProficiencyLevel;
use ratatui::style::{Color, Modifier, Style};

/// Sheet color theme
#[derive(Debug, Clone)]
pub struct SheetTheme {
    // Base colors
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub highlight: Color,

    // HP colors
    pub hp_healthy: Color,
    pub hp_wounded: Color,
    pub hp_critical: Color,
    pub hp_temporary: Color,
    pub hp_empty: Color,

    // Status line
    pub info: Color,
    pub error: Color,

    // Sheet markers
    pub proficient: Color,
    pub expertise: Color,
    pub equipped: Color,
}

impl Default for SheetTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            highlight: Color::Yellow,

            hp_healthy: Color::Green,
            hp_wounded: Color::Yellow,
            hp_critical: Color::Red,
            hp_temporary: Color::LightBlue,
            hp_empty: Color::DarkGray,

            info: Color::Green,
            error: Color::LightRed,

            proficient: Color::Cyan,
            expertise: Color::LightMagenta,
            equipped: Color::LightGreen,
        }
    }
}

impl SheetTheme {
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::DIM)
    }

    /// Get HP bar color based on ratio
    pub fn hp_color(&self, ratio: f32) -> Color {
        if ratio > 0.5 {
            self.hp_healthy
        } else if ratio > 0.25 {
            self.hp_wounded
        } else {
            self.hp_critical
        }
    }

    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    pub fn title_style(&self, focused: bool) -> Style {
        let style = Style::default().fg(if focused {
            self.border_focused
        } else {
            self.foreground
        });

        if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    /// Cursor row. Unfocused panels keep a dim marker so the position is visible.
    pub fn cursor_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.highlight)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::UNDERLINED)
        }
    }

    pub fn proficiency_style(&self, level: ProficiencyLevel) -> Style {
        match level {
            ProficiencyLevel::None => self.text_style(),
            ProficiencyLevel::Half => Style::default().fg(self.foreground).add_modifier(Modifier::ITALIC),
            ProficiencyLevel::Proficient => Style::default().fg(self.proficient),
            ProficiencyLevel::Expertise => Style::default()
                .fg(self.expertise)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn status_style(&self, is_error: bool) -> Style {
        Style::default().fg(if is_error { self.error } else { self.info })
    }

    pub fn equipped_style(&self) -> Style {
        Style::default().fg(self.equipped)
    }
}
