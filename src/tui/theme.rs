//! TUI theming and colors.

use ratatui::style::{Color, Modifier, Style};

/// Application theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Name of the theme.
    pub name: String,
    /// Foreground color.
    pub foreground: Color,
    /// Primary accent color.
    pub primary: Color,
    /// Secondary accent color.
    pub secondary: Color,
    /// Border color (unfocused).
    pub border: Color,
    /// Border color (focused).
    pub border_focused: Color,
    /// Selection highlight.
    pub selection: Color,
    /// Chart line color.
    pub series: Color,
    /// Badge background.
    pub badge: Color,
    /// User message color.
    pub user: Color,
    /// Assistant message color.
    pub assistant: Color,
    /// Error color.
    pub error: Color,
    /// Warning color.
    pub warning: Color,
    /// Success color.
    pub success: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create the default dark theme.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            foreground: Color::White,
            primary: Color::Cyan,
            secondary: Color::Magenta,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            selection: Color::DarkGray,
            series: Color::LightBlue,
            badge: Color::Blue,
            user: Color::Green,
            assistant: Color::LightBlue,
            error: Color::Red,
            warning: Color::Yellow,
            success: Color::Green,
        }
    }

    /// Create a light theme.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            foreground: Color::Black,
            primary: Color::Blue,
            secondary: Color::Magenta,
            border: Color::Gray,
            border_focused: Color::Blue,
            selection: Color::LightBlue,
            series: Color::Blue,
            badge: Color::LightBlue,
            user: Color::Green,
            assistant: Color::Blue,
            error: Color::Red,
            warning: Color::Rgb(180, 120, 0),
            success: Color::Green,
        }
    }

    /// Create a high contrast theme.
    pub fn high_contrast() -> Self {
        Self {
            name: "high-contrast".to_string(),
            foreground: Color::White,
            primary: Color::Yellow,
            secondary: Color::Cyan,
            border: Color::White,
            border_focused: Color::Yellow,
            selection: Color::White,
            series: Color::Yellow,
            badge: Color::Cyan,
            user: Color::Green,
            assistant: Color::Cyan,
            error: Color::Red,
            warning: Color::Yellow,
            success: Color::Green,
        }
    }

    /// Get theme by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            "high-contrast" | "highcontrast" => Some(Self::high_contrast()),
            _ => None,
        }
    }

    /// Border style for a panel.
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Get style for selected items.
    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.foreground)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for unit and region badges.
    pub fn badge_style(&self) -> Style {
        Style::default()
            .bg(self.badge)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for user messages.
    pub fn user_style(&self) -> Style {
        Style::default()
            .fg(self.user)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for assistant messages.
    pub fn assistant_style(&self) -> Style {
        Style::default()
            .fg(self.assistant)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the pending-reply indicator.
    pub fn pending_style(&self) -> Style {
        Style::default()
            .fg(self.secondary)
            .add_modifier(Modifier::ITALIC)
    }

    /// Get style for errors.
    pub fn error_style(&self) -> Style {
        Style::default()
            .fg(self.error)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for warnings.
    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    /// Get style for success.
    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }
}

/// Available themes list.
pub fn available_themes() -> Vec<&'static str> {
    vec!["dark", "light", "high-contrast"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        for name in available_themes() {
            assert_eq!(Theme::from_name(name).unwrap().name, name);
        }
        assert_eq!(Theme::from_name("LIGHT"), Some(Theme::light()));
        assert_eq!(Theme::from_name("solarized"), None);
    }

    #[test]
    fn test_border_style_follows_focus() {
        let theme = Theme::dark();
        assert_eq!(theme.border_style(true).fg, Some(theme.border_focused));
        assert_eq!(theme.border_style(false).fg, Some(theme.border));
    }
}
