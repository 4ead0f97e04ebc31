//! scenario-dash: terminal dashboard for scenario datasets with a
//! context-aware assistant.
//!
//! The dataset is a flat table of [`DataPoint`](model::DataPoint) records.
//! The dashboard narrows it through a Region → Variable → Item hierarchy,
//! plots the year-sorted series for the selection and forwards questions to
//! an assistant service together with the current selection.
//!
//! # Quick Start
//!
//! ```rust
//! use scenario_dash::prelude::*;
//!
//! let store = DataStore::new(vec![
//!     DataPoint::new("World", "GDP", "Total", "USD", 2020, 100.0),
//!     DataPoint::new("World", "GDP", "Total", "USD", 2010, 80.0),
//! ]);
//!
//! let filter = FilterState::initial(&store);
//! let view = DerivedView::compute(&store, &filter);
//! assert_eq!(view.unit, "USD");
//! assert_eq!(view.series[0].year, 2010);
//! ```
//!
//! # Architecture
//!
//! - [`model`]: records, chat messages and the `/api/chat` wire types
//! - [`store`]: immutable, shareable dataset snapshot
//! - [`derive`]: option sets, chart series, unit and the derivation memo
//! - [`filter`]: selection state and cascading reconciliation
//! - [`chat`]: conversation state machine with request sequencing
//! - [`dashboard`]: application state with a single event entry point
//! - [`client`]: HTTP client for the dashboard service and task dispatch
//! - [`cli`]: command-line interface
//! - [`tui`]: terminal user interface
//! - [`config`]: configuration management
//! - [`error`]: error types and handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod chat;
pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod derive;
pub mod error;
pub mod filter;
pub mod model;
pub mod store;
pub mod tui;
pub mod util;

// Re-export commonly used types at the crate root
pub use error::{DashError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::chat::{ChatOutcome, ChatSession, SubmitOutcome};
    pub use crate::dashboard::{AppEvent, AppState, Effect};
    pub use crate::derive::{DerivationCache, DerivedView};
    pub use crate::error::{DashError, Result};
    pub use crate::filter::{reduce, FilterEvent, FilterState, Level};
    pub use crate::model::{ChatContext, ChatReply, DataPoint};
    pub use crate::store::DataStore;
}
