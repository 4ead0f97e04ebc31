//! CLI command implementations.
//!
//! Each command is implemented in its own module with a `run` function
//! that handles the command logic.

pub mod ask;
pub mod config;
pub mod options;
pub mod series;
pub mod tui;

use tokio::runtime::Runtime;
use tracing::debug;

use crate::cli::{Cli, SelectionArgs};
use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{DashError, Result};
use crate::filter::{reduce, FilterEvent, FilterState, Level};
use crate::store::DataStore;

/// Build the runtime used by the network-backed commands.
pub fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| DashError::io("Failed to start async runtime", e))
}

/// Resolve configuration and build a client for it.
pub fn connect(cli: &Cli) -> Result<(Config, ApiClient)> {
    let config = cli.resolve_config()?;
    let client = ApiClient::new(&config.server)?;
    Ok((config, client))
}

/// Fetch the dataset, blocking on `runtime`.
pub fn load_store(runtime: &Runtime, client: &ApiClient) -> Result<DataStore> {
    let store = runtime.block_on(client.fetch_data())?;
    debug!(records = store.len(), "dataset fetched for command");
    Ok(store)
}

/// Walk a selection path the way the dashboard would.
///
/// Starts from the initial selection and applies each given level in
/// hierarchy order. A variable or item that is not offered at its level is
/// rejected instead of silently ignored.
pub fn apply_selection(store: &DataStore, args: &SelectionArgs) -> Result<FilterState> {
    let mut state = FilterState::initial(store);

    let requested = [
        (Level::Region, args.region.as_deref()),
        (Level::Variable, args.variable.as_deref()),
        (Level::Item, args.item.as_deref()),
    ];
    for (level, value) in requested {
        let Some(value) = value else { continue };
        if level != Level::Region && !state.options(store, level).iter().any(|o| o == value) {
            return Err(DashError::invalid_argument(
                level.label().to_lowercase(),
                format!("'{value}' is not offered for the current selection"),
            ));
        }
        state = reduce(&state, store, FilterEvent::select(level, value));
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataPoint;

    fn store() -> DataStore {
        DataStore::new(vec![
            DataPoint::new("World", "GDP", "Total", "USD", 2020, 1.0),
            DataPoint::new("Asia", "Emissions", "CO2", "Mt", 2020, 2.0),
            DataPoint::new("Asia", "Emissions", "CH4", "Mt", 2020, 3.0),
        ])
    }

    #[test]
    fn test_apply_selection_defaults() {
        let state = apply_selection(&store(), &SelectionArgs::default()).unwrap();
        assert_eq!(state, FilterState::initial(&store()));
    }

    #[test]
    fn test_apply_selection_path() {
        let args = SelectionArgs {
            region: Some("Asia".into()),
            variable: None,
            item: Some("CH4".into()),
        };
        let state = apply_selection(&store(), &args).unwrap();
        assert_eq!(state.selected_region, "Asia");
        assert_eq!(state.selected_variable, "Emissions");
        assert_eq!(state.selected_item, "CH4");
    }

    #[test]
    fn test_apply_selection_rejects_unoffered_variable() {
        let args = SelectionArgs {
            region: Some("World".into()),
            variable: Some("Emissions".into()),
            item: None,
        };
        assert!(matches!(
            apply_selection(&store(), &args),
            Err(DashError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_unknown_region_is_allowed() {
        let args = SelectionArgs {
            region: Some("Mars".into()),
            ..SelectionArgs::default()
        };
        let state = apply_selection(&store(), &args).unwrap();
        assert_eq!(state.selected_region, "Mars");
        assert_eq!(state.selected_variable, "");
        assert_eq!(state.selected_item, "");
    }
}
