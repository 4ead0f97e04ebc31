//! Config command implementation.
//!
//! View and initialize scenario-dash configuration.

use crate::cli::{Cli, ConfigAction, ConfigArgs, OutputFormat};
use crate::config::{default_config_path, Config};
use crate::error::Result;

/// Run the config command.
pub fn run(cli: &Cli, args: &ConfigArgs) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli),
        ConfigAction::Path => show_config_path(),
        ConfigAction::Init => init_config(),
    }
}

/// Show the effective configuration, flags included.
fn show_config(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;

    match cli.effective_output() {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        OutputFormat::Text => {
            println!("scenario-dash Configuration");
            println!("===========================\n");

            println!("[server]");
            println!("  base_url = \"{}\"", config.server.base_url);
            println!("  connect_timeout_secs = {}", config.server.connect_timeout_secs);
            println!("  data_timeout_secs = {}", config.server.data_timeout_secs);
            println!("  map_timeout_secs = {}", config.server.map_timeout_secs);
            println!("  chat_timeout_secs = {}", config.server.chat_timeout_secs);
            println!();

            println!("[chat]");
            println!("  max_input_len = {}", config.chat.max_input_len);
            println!();

            println!("[display]");
            println!("  theme = \"{}\"", config.display.theme);
            println!("  show_hint = {}", config.display.show_hint());
            println!("  ascii = {}", config.display.ascii());
        }
    }

    Ok(())
}

/// Show configuration file path.
fn show_config_path() -> Result<()> {
    let path = default_config_path()?;
    println!("{}", path.display());
    Ok(())
}

/// Initialize configuration file with defaults.
fn init_config() -> Result<()> {
    let path = default_config_path()?;

    if path.exists() {
        println!("Configuration file already exists at: {}", path.display());
        return Ok(());
    }

    Config::default().save()?;
    println!("Created configuration file at: {}", path.display());

    Ok(())
}
