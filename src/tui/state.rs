//! Presentation state that lives only in the terminal front end.
//!
//! Dashboard data and chat state belong to [`AppState`](crate::dashboard::AppState);
//! this holds focus, theme and animation counters.

use crate::dashboard::AssistantPanel;
use crate::filter::Level;

use super::theme::Theme;

/// Which panel receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// One of the three selectors.
    Selector(Level),
    /// The assistant input line.
    Assistant,
}

/// Front-end state.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Focused panel.
    pub focus: Focus,
    /// Last focused selector, restored when the assistant closes.
    last_selector: Level,
    /// Active theme.
    pub theme: Theme,
    /// ASCII-only rendering.
    pub ascii: bool,
    /// Key help line visible.
    pub show_help: bool,
    /// Ticks since start, drives the spinner.
    pub ticks: u64,
}

impl UiState {
    /// Initial front-end state.
    pub fn new(theme: Theme, ascii: bool) -> Self {
        Self {
            focus: Focus::Selector(Level::Region),
            last_selector: Level::Region,
            theme,
            ascii,
            show_help: false,
            ticks: 0,
        }
    }

    /// Move focus, remembering the selector.
    pub fn focus(&mut self, focus: Focus) {
        if let Focus::Selector(level) = focus {
            self.last_selector = level;
        }
        self.focus = focus;
    }

    /// Keep focus consistent with the panel after an event.
    ///
    /// Opening the panel focuses the input; closing it returns to the last
    /// selector.
    pub fn sync_focus(&mut self, before: AssistantPanel, after: AssistantPanel) {
        match (before.is_open(), after.is_open()) {
            (false, true) => self.focus = Focus::Assistant,
            (_, false) if self.focus == Focus::Assistant => {
                self.focus = Focus::Selector(self.last_selector);
            }
            _ => {}
        }
    }

    /// Advance the animation clock.
    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    /// Spinner frame shown next to the pending indicator.
    pub fn spinner(&self) -> &'static str {
        const UNICODE: [&str; 4] = ["◐", "◓", "◑", "◒"];
        const ASCII: [&str; 4] = ["|", "/", "-", "\\"];
        let frame = (self.ticks % 4) as usize;
        if self.ascii {
            ASCII[frame]
        } else {
            UNICODE[frame]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_follows_panel() {
        let mut ui = UiState::new(Theme::dark(), false);
        ui.focus(Focus::Selector(Level::Item));

        let closed = AssistantPanel::default();
        ui.sync_focus(closed, closed.toggled());
        assert_eq!(ui.focus, Focus::Assistant);

        ui.sync_focus(AssistantPanel::Open, AssistantPanel::Open.toggled());
        assert_eq!(ui.focus, Focus::Selector(Level::Item));
    }

    #[test]
    fn test_spinner_cycles() {
        let mut ui = UiState::new(Theme::dark(), true);
        let seen: Vec<&str> = (0..5)
            .map(|_| {
                ui.tick();
                ui.spinner()
            })
            .collect();
        assert_eq!(seen, vec!["/", "-", "\\", "|", "/"]);
    }
}
