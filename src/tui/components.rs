//! Reusable TUI components.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::model::{ChatMessage, Role};

use super::theme::Theme;

/// A bordered list of options with the selected one highlighted.
pub struct SelectorList<'a> {
    title: &'a str,
    options: &'a [String],
    selected: &'a str,
    focused: bool,
    ascii: bool,
}

impl<'a> SelectorList<'a> {
    /// Create a selector for `options`.
    pub fn new(title: &'a str, options: &'a [String], selected: &'a str) -> Self {
        Self {
            title,
            options,
            selected,
            focused: false,
            ascii: false,
        }
    }

    /// Set focused state.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Use ASCII markers.
    pub fn ascii(mut self, ascii: bool) -> Self {
        self.ascii = ascii;
        self
    }

    /// Render the component.
    ///
    /// Scrolls so the selected option stays visible.
    pub fn render(self, f: &mut Frame, area: Rect, theme: &Theme) {
        let visible = area.height.saturating_sub(2) as usize;
        let position = self.options.iter().position(|o| o == self.selected);
        let skip = match position {
            Some(index) if visible > 0 && index >= visible => index + 1 - visible,
            _ => 0,
        };
        let marker = if self.ascii { "> " } else { "● " };

        let items: Vec<ListItem> = self
            .options
            .iter()
            .enumerate()
            .skip(skip)
            .take(visible)
            .map(|(i, option)| {
                if Some(i) == position {
                    let style = if self.focused {
                        theme.selection_style()
                    } else {
                        theme.success_style()
                    };
                    ListItem::new(format!("{marker}{option}")).style(style)
                } else {
                    ListItem::new(format!("  {option}"))
                }
            })
            .collect();

        let title = format!(" {} ({}) ", self.title, self.options.len());
        let list = if items.is_empty() {
            List::new(vec![ListItem::new("  (none)").style(theme.warning_style())])
        } else {
            List::new(items)
        };
        f.render_widget(
            list.block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(theme.border_style(self.focused)),
            ),
            area,
        );
    }
}

/// A status bar component.
pub struct StatusBar<'a> {
    left: Vec<Span<'a>>,
    right: Vec<Span<'a>>,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar.
    pub fn new() -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    /// Add left-aligned content.
    pub fn left(mut self, spans: Vec<Span<'a>>) -> Self {
        self.left = spans;
        self
    }

    /// Add right-aligned content.
    pub fn right(mut self, spans: Vec<Span<'a>>) -> Self {
        self.right = spans;
        self
    }

    /// Render the status bar.
    pub fn render(self, f: &mut Frame, area: Rect) {
        let left_width: usize = self.left.iter().map(|s| s.content.chars().count()).sum();
        let right_width: usize = self.right.iter().map(|s| s.content.chars().count()).sum();
        let padding = (area.width as usize)
            .saturating_sub(left_width + right_width)
            .max(1);

        let mut spans = self.left;
        spans.push(Span::raw(" ".repeat(padding)));
        spans.extend(self.right);

        let paragraph = Paragraph::new(Line::from(spans))
            .style(Style::default().bg(Color::DarkGray).fg(Color::White));

        f.render_widget(paragraph, area);
    }
}

impl<'a> Default for StatusBar<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// Small inverted label such as a unit or region.
pub fn badge(text: &str, theme: &Theme) -> Span<'static> {
    Span::styled(format!(" {text} "), theme.badge_style())
}

/// Header line for a chat message.
pub fn format_message_header(message: &ChatMessage, theme: &Theme, ascii: bool) -> Line<'static> {
    let (icon, label, style) = match message.role {
        Role::User if ascii => ("", "You", theme.user_style()),
        Role::User => ("👤 ", "You", theme.user_style()),
        Role::Assistant if ascii => ("", "Assistant", theme.assistant_style()),
        Role::Assistant => ("🤖 ", "Assistant", theme.assistant_style()),
    };

    Line::from(vec![
        Span::raw(icon),
        Span::styled(label, style),
        Span::raw(" "),
        Span::styled(
            message.created_at.format("%H:%M").to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MessageId;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_message_header_ascii() {
        let message = ChatMessage {
            id: MessageId(1),
            role: Role::User,
            text: "hi".to_string(),
            created_at: Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        };
        let line = format_message_header(&message, &Theme::dark(), true);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "You 09:30");
    }

    #[test]
    fn test_badge_pads_text() {
        assert_eq!(badge("USD", &Theme::dark()).content, " USD ");
    }
}
