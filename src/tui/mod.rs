//! Terminal front end for scenario-dash.
//!
//! Layout:
//! - Left: Region / Variable / Item selectors
//! - Centre: line chart of the selected series with unit and region badges
//! - Right: map layer status and the assistant panel (or its hint bubble)
//!
//! Built with ratatui on a tokio event loop.

mod app;
mod components;
mod events;
mod state;
mod theme;

pub use app::{draw_ui, run};
pub use events::{Action, KeyBindings};
pub use state::{Focus, UiState};
pub use theme::{available_themes, Theme};

/// Launch options for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuiOptions {
    /// Theme name.
    pub theme: String,
    /// ASCII-only symbols.
    pub ascii: bool,
    /// Show the assistant hint bubble on startup.
    pub show_hint: bool,
    /// Open the assistant panel on startup.
    pub open_assistant: bool,
}

impl Default for TuiOptions {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            ascii: false,
            show_hint: true,
            open_assistant: false,
        }
    }
}
