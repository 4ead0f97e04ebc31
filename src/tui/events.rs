//! Keyboard handling for the dashboard.
//!
//! Keys are translated into an [`Action`] without touching state, so the
//! mapping can be tested without a terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::dashboard::{AppEvent, AppState};
use crate::filter::{cycle, Level};

use super::state::Focus;

/// What a key press asks the loop to do.
#[derive(Debug, Clone)]
pub enum Action {
    /// Leave the dashboard.
    Quit,
    /// Apply an event to the dashboard state.
    Dispatch(AppEvent),
    /// Move focus to another panel.
    Focus(Focus),
    /// Show or hide the key help line.
    ToggleHelp,
    /// Nothing to do.
    Ignore,
}

/// Key binding configuration.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    /// Quit keys.
    pub quit: Vec<KeyEvent>,
    /// Previous option.
    pub up: Vec<KeyEvent>,
    /// Next option.
    pub down: Vec<KeyEvent>,
    /// Previous selector.
    pub left: Vec<KeyEvent>,
    /// Next selector.
    pub right: Vec<KeyEvent>,
    /// Open or close the assistant panel.
    pub assistant: Vec<KeyEvent>,
    /// Dismiss the hint bubble.
    pub dismiss: Vec<KeyEvent>,
    /// Toggle key help.
    pub help: Vec<KeyEvent>,
    /// Move between selectors and the assistant.
    pub switch: Vec<KeyEvent>,
    /// Send the chat input.
    pub send: Vec<KeyEvent>,
    /// Cancel the request or leave the input.
    pub back: Vec<KeyEvent>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: vec![
                KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            ],
            up: vec![
                KeyEvent::new(KeyCode::Up, KeyModifiers::NONE),
                KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE),
            ],
            down: vec![
                KeyEvent::new(KeyCode::Down, KeyModifiers::NONE),
                KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE),
            ],
            left: vec![
                KeyEvent::new(KeyCode::Left, KeyModifiers::NONE),
                KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE),
            ],
            right: vec![
                KeyEvent::new(KeyCode::Right, KeyModifiers::NONE),
                KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE),
            ],
            assistant: vec![KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)],
            dismiss: vec![KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)],
            help: vec![KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE)],
            switch: vec![KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)],
            send: vec![KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)],
            back: vec![KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)],
        }
    }
}

fn matches_any(bindings: &[KeyEvent], key: &KeyEvent) -> bool {
    // Shift is implied by the character for printable keys like '?'.
    let modifiers = key.modifiers.difference(KeyModifiers::SHIFT);
    bindings
        .iter()
        .any(|k| k.code == key.code && k.modifiers == modifiers)
}

impl KeyBindings {
    /// Check if a key matches quit binding.
    pub fn is_quit(&self, key: &KeyEvent) -> bool {
        matches_any(&self.quit, key)
    }

    /// Translate a key press given the current focus.
    pub fn action(&self, key: &KeyEvent, focus: Focus, app: &AppState) -> Action {
        match focus {
            Focus::Assistant => self.assistant_action(key, app),
            Focus::Selector(level) => self.selector_action(key, level, app),
        }
    }

    fn selector_action(&self, key: &KeyEvent, level: Level, app: &AppState) -> Action {
        let forward = if matches_any(&self.down, key) {
            Some(true)
        } else if matches_any(&self.up, key) {
            Some(false)
        } else {
            None
        };
        if let Some(forward) = forward {
            return cycle(app.filter(), app.store(), level, forward)
                .map_or(Action::Ignore, |event| Action::Dispatch(AppEvent::Filter(event)));
        }

        if self.is_quit(key) {
            Action::Quit
        } else if matches_any(&self.left, key) {
            Action::Focus(Focus::Selector(step_level(level, false)))
        } else if matches_any(&self.right, key) {
            Action::Focus(Focus::Selector(step_level(level, true)))
        } else if matches_any(&self.assistant, key) {
            Action::Dispatch(AppEvent::TogglePanel)
        } else if matches_any(&self.dismiss, key) {
            Action::Dispatch(AppEvent::DismissHint)
        } else if matches_any(&self.help, key) {
            Action::ToggleHelp
        } else if matches_any(&self.switch, key) && app.panel().is_open() {
            Action::Focus(Focus::Assistant)
        } else {
            Action::Ignore
        }
    }

    fn assistant_action(&self, key: &KeyEvent, app: &AppState) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return if self.is_quit(key) {
                Action::Quit
            } else {
                Action::Ignore
            };
        }

        if matches_any(&self.send, key) {
            Action::Dispatch(AppEvent::ChatSubmit)
        } else if matches_any(&self.back, key) {
            if app.chat().is_pending() {
                Action::Dispatch(AppEvent::ChatCancel)
            } else {
                Action::Dispatch(AppEvent::TogglePanel)
            }
        } else if matches_any(&self.switch, key) {
            Action::Focus(Focus::Selector(Level::Region))
        } else {
            match key.code {
                KeyCode::Backspace => Action::Dispatch(AppEvent::ChatBackspace),
                KeyCode::Char(c) => Action::Dispatch(AppEvent::ChatInput(c)),
                _ => Action::Ignore,
            }
        }
    }
}

fn step_level(level: Level, forward: bool) -> Level {
    let index = Level::ALL.iter().position(|l| *l == level).unwrap_or(0);
    let len = Level::ALL.len();
    let next = if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    };
    Level::ALL[next]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterEvent;
    use crate::model::DataPoint;
    use crate::store::DataStore;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> AppState {
        let mut app = AppState::new();
        app.apply(AppEvent::DataLoaded(DataStore::new(vec![
            DataPoint::new("World", "GDP", "Total", "USD", 2020, 1.0),
            DataPoint::new("Asia", "GDP", "Total", "USD", 2020, 2.0),
        ])));
        app
    }

    #[test]
    fn test_down_cycles_region() {
        let bindings = KeyBindings::default();
        let action = bindings.action(&key(KeyCode::Down), Focus::Selector(Level::Region), &app());
        match action {
            Action::Dispatch(AppEvent::Filter(FilterEvent::SelectRegion(region))) => {
                assert_eq!(region, "Asia");
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_left_right_wrap_levels() {
        assert_eq!(step_level(Level::Region, false), Level::Item);
        assert_eq!(step_level(Level::Item, true), Level::Region);
        assert_eq!(step_level(Level::Variable, true), Level::Item);
    }

    #[test]
    fn test_assistant_typing() {
        let bindings = KeyBindings::default();
        let app = app();
        assert!(matches!(
            bindings.action(&key(KeyCode::Char('q')), Focus::Assistant, &app),
            Action::Dispatch(AppEvent::ChatInput('q'))
        ));
        assert!(matches!(
            bindings.action(&key(KeyCode::Enter), Focus::Assistant, &app),
            Action::Dispatch(AppEvent::ChatSubmit)
        ));
        assert!(matches!(
            bindings.action(&key(KeyCode::Esc), Focus::Assistant, &app),
            Action::Dispatch(AppEvent::TogglePanel)
        ));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(bindings.action(&ctrl_c, Focus::Assistant, &app), Action::Quit));
    }

    #[test]
    fn test_escape_cancels_pending_request() {
        let bindings = KeyBindings::default();
        let mut app = app();
        app.apply(AppEvent::ChatInput('?'));
        app.apply(AppEvent::ChatSubmit);
        assert!(matches!(
            bindings.action(&key(KeyCode::Esc), Focus::Assistant, &app),
            Action::Dispatch(AppEvent::ChatCancel)
        ));
    }

    #[test]
    fn test_shifted_help_key() {
        let bindings = KeyBindings::default();
        let question = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert!(matches!(
            bindings.action(&question, Focus::Selector(Level::Item), &app()),
            Action::ToggleHelp
        ));
    }
}
