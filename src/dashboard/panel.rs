//! Assistant panel visibility and its hint bubble.

/// Open/closed state of the assistant panel.
///
/// The hint bubble only exists while the panel is closed, so it lives inside
/// the `Closed` variant rather than as a separate flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantPanel {
    /// Panel visible, hint hidden.
    Open,
    /// Panel hidden; `hint` says whether the bubble is showing.
    Closed {
        /// Hint bubble visible.
        hint: bool,
    },
}

impl Default for AssistantPanel {
    fn default() -> Self {
        Self::Closed { hint: true }
    }
}

impl AssistantPanel {
    /// Closed panel with the hint suppressed.
    #[must_use]
    pub const fn without_hint() -> Self {
        Self::Closed { hint: false }
    }

    /// Whether the panel is open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Whether the hint bubble is visible.
    #[must_use]
    pub const fn shows_hint(self) -> bool {
        matches!(self, Self::Closed { hint: true })
    }

    /// Open a closed panel or close an open one. Closing brings the hint back.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed { hint: true },
            Self::Closed { .. } => Self::Open,
        }
    }

    /// Hide the hint until the panel is next closed.
    #[must_use]
    pub const fn hint_dismissed(self) -> Self {
        match self {
            Self::Open => Self::Open,
            Self::Closed { .. } => Self::Closed { hint: false },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_follows_panel() {
        let panel = AssistantPanel::default();
        assert!(panel.shows_hint());

        let open = panel.toggled();
        assert!(open.is_open());
        assert!(!open.shows_hint());

        let closed = open.toggled();
        assert!(closed.shows_hint());
    }

    #[test]
    fn test_dismiss_lasts_until_next_close() {
        let dismissed = AssistantPanel::default().hint_dismissed();
        assert!(!dismissed.shows_hint());
        assert!(!dismissed.is_open());

        assert!(!dismissed.hint_dismissed().shows_hint());
        assert!(dismissed.toggled().toggled().shows_hint());
        assert_eq!(AssistantPanel::Open.hint_dismissed(), AssistantPanel::Open);
    }
}
