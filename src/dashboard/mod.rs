//! Application state for the dashboard.
//!
//! [`AppState`] owns the dataset, the selection, the derivation memo, the
//! chat session and the assistant panel. Every change goes through
//! [`AppState::apply`], one [`AppEvent`] at a time; anything that has to
//! leave the process (a chat request, a cancellation) comes back as an
//! [`Effect`] for the driver to perform.

mod panel;

pub use panel::AssistantPanel;

use tracing::{debug, info, warn};

use crate::chat::{ChatOutcome, ChatRequest, ChatSession, RequestSeq, SubmitOutcome};
use crate::derive::{DerivationCache, DerivedView};
use crate::filter::{reduce, FilterEvent, FilterState};
use crate::model::MapImage;
use crate::store::DataStore;

/// Progress of the one-time dataset load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Waiting for `/api/data`.
    Loading,
    /// Records loaded (possibly zero).
    Ready,
    /// Load failed; the store stays empty.
    Failed(String),
}

/// Progress of the geospatial layer fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapLayer {
    /// Waiting for `/api/map`.
    Loading,
    /// Image received.
    Ready(MapImage),
    /// Fetch failed.
    Failed(String),
}

/// Everything that can change the dashboard.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// `/api/data` answered with records.
    DataLoaded(DataStore),
    /// `/api/data` failed or was malformed.
    DataLoadFailed(String),
    /// `/api/map` answered.
    MapLoaded(MapImage),
    /// `/api/map` failed.
    MapLoadFailed(String),
    /// User changed a selection.
    Filter(FilterEvent),
    /// User typed into the chat input.
    ChatInput(char),
    /// User deleted the last input character.
    ChatBackspace,
    /// User pressed send.
    ChatSubmit,
    /// User abandoned the outstanding request.
    ChatCancel,
    /// The transport finished request `seq`.
    ChatResolved {
        /// Which request finished.
        seq: RequestSeq,
        /// How it finished.
        outcome: ChatOutcome,
    },
    /// Show or hide the assistant panel.
    TogglePanel,
    /// Close the hint bubble.
    DismissHint,
}

/// Work the driver must perform after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send this query to `/api/chat`.
    SendChat(ChatRequest),
    /// Stop waiting for request `seq`.
    CancelChat(RequestSeq),
}

/// Borrowed state for rendering one frame.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    /// Derived products for the current selection.
    pub view: &'a DerivedView,
    /// Current selection.
    pub filter: &'a FilterState,
    /// Chat session.
    pub chat: &'a ChatSession,
    /// Assistant panel state.
    pub panel: AssistantPanel,
    /// Dataset load status.
    pub load: &'a LoadStatus,
    /// Geospatial layer status.
    pub map: &'a MapLayer,
}

/// The whole dashboard.
#[derive(Debug)]
pub struct AppState {
    store: DataStore,
    filter: FilterState,
    cache: DerivationCache,
    chat: ChatSession,
    panel: AssistantPanel,
    load: LoadStatus,
    map: MapLayer,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Fresh state waiting for the dataset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: DataStore::empty(),
            filter: FilterState::default(),
            cache: DerivationCache::new(),
            chat: ChatSession::new(),
            panel: AssistantPanel::default(),
            load: LoadStatus::Loading,
            map: MapLayer::Loading,
        }
    }

    /// Use a preconfigured chat session.
    #[must_use]
    pub fn with_chat(mut self, chat: ChatSession) -> Self {
        self.chat = chat;
        self
    }

    /// Start with the given panel state.
    #[must_use]
    pub fn with_panel(mut self, panel: AssistantPanel) -> Self {
        self.panel = panel;
        self
    }

    /// Loaded dataset.
    #[must_use]
    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Current selection.
    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Chat session.
    #[must_use]
    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    /// Assistant panel state.
    #[must_use]
    pub fn panel(&self) -> AssistantPanel {
        self.panel
    }

    /// Dataset load status.
    #[must_use]
    pub fn load_status(&self) -> &LoadStatus {
        &self.load
    }

    /// Geospatial layer status.
    #[must_use]
    pub fn map(&self) -> &MapLayer {
        &self.map
    }

    /// Derived products for the current store and selection.
    pub fn view(&mut self) -> &DerivedView {
        self.cache.view(&self.store, &self.filter)
    }

    /// Read-only view of everything a frame needs, with the derived
    /// products refreshed.
    pub fn snapshot(&mut self) -> Snapshot<'_> {
        Snapshot {
            view: self.cache.view(&self.store, &self.filter),
            filter: &self.filter,
            chat: &self.chat,
            panel: self.panel,
            load: &self.load,
            map: &self.map,
        }
    }

    /// Apply one event.
    pub fn apply(&mut self, event: AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::DataLoaded(store) => {
                if self.load != LoadStatus::Loading {
                    warn!("ignoring second dataset load");
                    return Vec::new();
                }
                info!(records = store.len(), "dataset loaded");
                self.filter = FilterState::initial(&store);
                self.store = store;
                self.load = LoadStatus::Ready;
            }
            AppEvent::DataLoadFailed(reason) => {
                if self.load == LoadStatus::Loading {
                    warn!(%reason, "dataset load failed, continuing with empty store");
                    self.load = LoadStatus::Failed(reason);
                }
            }
            AppEvent::MapLoaded(image) => {
                debug!(bytes = image.len(), "map layer loaded");
                self.map = MapLayer::Ready(image);
            }
            AppEvent::MapLoadFailed(reason) => {
                warn!(%reason, "map layer unavailable");
                self.map = MapLayer::Failed(reason);
            }
            AppEvent::Filter(event) => {
                self.filter = reduce(&self.filter, &self.store, event);
                debug_assert!(self.filter.is_consistent(&self.store));
            }
            AppEvent::ChatInput(c) => self.chat.push_char(c),
            AppEvent::ChatBackspace => self.chat.backspace(),
            AppEvent::ChatSubmit => {
                if let SubmitOutcome::Sent(request) = self.chat.submit(self.filter.context()) {
                    return vec![Effect::SendChat(request)];
                }
            }
            AppEvent::ChatCancel => {
                if let Some(seq) = self.chat.cancel() {
                    return vec![Effect::CancelChat(seq)];
                }
            }
            AppEvent::ChatResolved { seq, outcome } => {
                self.chat.resolve(seq, outcome);
            }
            AppEvent::TogglePanel => self.panel = self.panel.toggled(),
            AppEvent::DismissHint => self.panel = self.panel.hint_dismissed(),
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{CONNECTION_ERROR_REPLY, FALLBACK_REPLY};
    use crate::model::{ChatReply, DataPoint};
    use pretty_assertions::assert_eq;

    fn example_store() -> DataStore {
        DataStore::new(vec![
            DataPoint::new("World", "GDP", "Total", "USD", 2020, 100.0),
            DataPoint::new("World", "GDP", "Total", "USD", 2010, 80.0),
        ])
    }

    fn loaded() -> AppState {
        let mut app = AppState::new();
        app.apply(AppEvent::DataLoaded(example_store()));
        app
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            app.apply(AppEvent::ChatInput(c));
        }
    }

    fn submit(app: &mut AppState) -> ChatRequest {
        match app.apply(AppEvent::ChatSubmit).as_slice() {
            [Effect::SendChat(request)] => request.clone(),
            other => panic!("expected one SendChat effect, got {other:?}"),
        }
    }

    #[test]
    fn test_load_initializes_selection_and_chart() {
        let mut app = loaded();
        assert_eq!(app.load_status(), &LoadStatus::Ready);
        assert_eq!(app.filter().selected_region, "World");
        assert_eq!(app.filter().selected_variable, "GDP");
        assert_eq!(app.filter().selected_item, "Total");

        let view = app.view();
        let points: Vec<(i64, f64)> = view.series.iter().map(|p| (p.year, p.value)).collect();
        assert_eq!(points, vec![(2010, 80.0), (2020, 100.0)]);
        assert_eq!(view.unit, "USD");
    }

    #[test]
    fn test_load_failure_leaves_empty_options() {
        let mut app = AppState::new();
        app.apply(AppEvent::DataLoadFailed("connection refused".into()));
        assert!(matches!(app.load_status(), LoadStatus::Failed(_)));
        assert!(app.store().is_empty());
        assert_eq!(app.filter(), &FilterState::default());

        let view = app.view();
        assert!(view.regions.is_empty());
        assert!(view.series.is_empty());
        assert_eq!(view.unit, "");
    }

    #[test]
    fn test_store_is_loaded_once() {
        let mut app = loaded();
        let generation = app.store().generation();
        app.apply(AppEvent::DataLoaded(DataStore::empty()));
        app.apply(AppEvent::DataLoadFailed("late".into()));
        assert_eq!(app.store().generation(), generation);
        assert_eq!(app.load_status(), &LoadStatus::Ready);
    }

    #[test]
    fn test_filter_events_reconcile() {
        let mut app = AppState::new();
        app.apply(AppEvent::DataLoaded(DataStore::new(vec![
            DataPoint::new("World", "GDP", "Total", "USD", 2020, 1.0),
            DataPoint::new("Asia", "Emissions", "CO2", "Mt", 2020, 2.0),
        ])));
        app.apply(AppEvent::Filter(FilterEvent::SelectRegion("Asia".into())));
        assert_eq!(app.filter().selected_variable, "Emissions");
        assert_eq!(app.filter().selected_item, "CO2");
        assert_eq!(app.view().unit, "Mt");
    }

    #[test]
    fn test_chat_uses_selection_at_send_time() {
        let mut app = loaded();
        type_text(&mut app, "trend?");
        let request = submit(&mut app);
        assert_eq!(request.context, app.filter().context());
        assert!(app.chat().is_pending());

        app.apply(AppEvent::ChatResolved {
            seq: request.seq,
            outcome: ChatOutcome::Replied(ChatReply::default()),
        });
        assert_eq!(app.chat().messages().last().unwrap().text, FALLBACK_REPLY);
        assert!(!app.chat().is_pending());
    }

    #[test]
    fn test_chat_failure_message() {
        let mut app = loaded();
        type_text(&mut app, "trend?");
        let request = submit(&mut app);
        app.apply(AppEvent::ChatResolved {
            seq: request.seq,
            outcome: ChatOutcome::Failed("boom".into()),
        });
        let errors = app
            .chat()
            .messages()
            .iter()
            .filter(|m| m.text == CONNECTION_ERROR_REPLY)
            .count();
        assert_eq!(errors, 1);
        assert!(!app.chat().is_pending());
    }

    #[test]
    fn test_blank_submit_has_no_effect() {
        let mut app = loaded();
        type_text(&mut app, "   ");
        assert!(app.apply(AppEvent::ChatSubmit).is_empty());
        assert_eq!(app.chat().messages().len(), 1);
    }

    #[test]
    fn test_cancel_emits_effect_only_when_pending() {
        let mut app = loaded();
        assert!(app.apply(AppEvent::ChatCancel).is_empty());

        type_text(&mut app, "q");
        let request = submit(&mut app);
        assert_eq!(
            app.apply(AppEvent::ChatCancel),
            vec![Effect::CancelChat(request.seq)]
        );
        assert!(!app.chat().is_pending());
    }

    #[test]
    fn test_panel_events() {
        let mut app = AppState::new();
        assert!(app.panel().shows_hint());
        app.apply(AppEvent::DismissHint);
        assert!(!app.panel().shows_hint());
        app.apply(AppEvent::TogglePanel);
        assert!(app.panel().is_open());
        app.apply(AppEvent::TogglePanel);
        assert!(app.panel().shows_hint());
    }

    #[test]
    fn test_snapshot_reuses_cached_view() {
        let mut app = loaded();
        let first = app.snapshot().view.clone();
        let second = app.snapshot();
        assert_eq!(second.view, &first);
        assert_eq!(second.filter.selected_item, "Total");
        assert_eq!(app.cache.computations(), 1);
    }

    #[test]
    fn test_map_events() {
        let mut app = AppState::new();
        assert_eq!(app.map(), &MapLayer::Loading);
        let image = MapImage {
            bytes: vec![1, 2],
            content_type: Some("image/png".into()),
        };
        app.apply(AppEvent::MapLoaded(image.clone()));
        assert_eq!(app.map(), &MapLayer::Ready(image));
    }
}
