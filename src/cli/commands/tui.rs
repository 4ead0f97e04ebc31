//! Dashboard launcher command.

use crate::cli::{Cli, TuiArgs};
use crate::error::Result;
use crate::tui::TuiOptions;

/// Run the dashboard.
pub fn run(cli: &Cli, args: &TuiArgs) -> Result<()> {
    let config = cli.resolve_config()?;

    let options = TuiOptions {
        theme: args.theme.clone().unwrap_or_else(|| config.display.theme.clone()),
        ascii: args.ascii || config.display.ascii(),
        show_hint: config.display.show_hint(),
        open_assistant: args.assistant,
    };

    crate::tui::run(config, options)
}
