//! Command-line interface for scenario-dash.
//!
//! With no subcommand the interactive dashboard starts. The other commands
//! expose the same engine to scripts:
//! - `options`: option sets at each level for a selection path
//! - `series`: chart series and unit for a selection path
//! - `ask`: one assistant question with the selection as context
//! - `config`: show or initialize configuration

mod commands;

pub use commands::*;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;

/// Scenario dataset dashboard with a context-aware assistant.
#[derive(Debug, Parser)]
#[command(name = "scendash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run (defaults to the dashboard).
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the dashboard service.
    #[arg(short = 's', long, global = true, env = "SCENDASH_SERVER")]
    pub server: Option<String>,

    /// Output format for structured data.
    #[arg(short = 'o', long, global = true, default_value = "text", env = "SCENDASH_OUTPUT")]
    pub output: OutputFormat,

    /// Output as JSON (shorthand for -o json).
    #[arg(long, global = true, env = "SCENDASH_JSON")]
    pub json: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn", env = "SCENDASH_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format (text, json, compact, pretty).
    #[arg(long, global = true, default_value = "text", env = "SCENDASH_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Log output file (default: stderr; the dashboard discards logs without one).
    #[arg(long, global = true, env = "SCENDASH_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Path to custom configuration file.
    #[arg(long, global = true, env = "SCENDASH_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages.
    Debug,
    /// All messages including trace-level details.
    Trace,
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// Structured JSON format for machine consumption.
    Json,
    /// Compact single-line format.
    Compact,
    /// Pretty format with full details.
    Pretty,
}

impl LogLevel {
    /// Convert to tracing filter level.
    #[must_use]
    pub fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Output format for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output.
    Json,
}

impl Cli {
    /// Get effective output format.
    #[must_use]
    pub fn effective_output(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }

    /// Whether the interactive dashboard is the command being run.
    #[must_use]
    pub fn is_dashboard(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui(_)))
    }

    /// Configuration with file, project and flag overrides applied.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => match std::env::current_dir() {
                Ok(dir) => Config::load_for_project(&dir)?,
                Err(_) => Config::load().unwrap_or_default(),
            },
        };
        if let Some(server) = &self.server {
            config.server.base_url = server.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Launch the interactive dashboard.
    #[command(alias = "ui")]
    Tui(TuiArgs),

    /// Show the option sets for a selection path.
    #[command(alias = "opts")]
    Options(SelectionArgs),

    /// Show the chart series for a selection path.
    #[command(alias = "chart")]
    Series(SelectionArgs),

    /// Ask the assistant about a selection.
    Ask(AskArgs),

    /// View and initialize configuration.
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the dashboard.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct TuiArgs {
    /// Theme (dark, light).
    #[arg(short = 't', long)]
    pub theme: Option<String>,

    /// Use ASCII symbols only.
    #[arg(long)]
    pub ascii: bool,

    /// Start with the assistant panel open.
    #[arg(long)]
    pub assistant: bool,
}

/// A path through the region → variable → item hierarchy.
///
/// Omitted levels fall back to what the dashboard would pick.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SelectionArgs {
    /// Region to select.
    #[arg(short = 'r', long)]
    pub region: Option<String>,

    /// Variable to select under the region.
    #[arg(short = 'v', long)]
    pub variable: Option<String>,

    /// Item to select under the variable.
    #[arg(short = 'i', long)]
    pub item: Option<String>,
}

/// Arguments for the ask command.
#[derive(Debug, Clone, clap::Args)]
pub struct AskArgs {
    /// Question text.
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Selection sent as context.
    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Arguments for the config command.
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    /// Config action.
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config actions.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration.
    Show,
    /// Print the default configuration file path.
    Path,
    /// Write a default configuration file if none exists.
    Init,
}

/// Arguments for the completions command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// PowerShell.
    Powershell,
    /// Elvish shell.
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Powershell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Generate shell completions and print to stdout.
pub fn generate_completions(shell: CompletionShell) {
    let mut cmd = Cli::command();
    let shell: Shell = shell.into();
    generate(shell, &mut cmd, "scendash", &mut io::stdout());
}

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to this file.
    File(PathBuf),
    /// Standard error.
    Stderr,
    /// Nowhere. Used while the dashboard owns the terminal, since anything
    /// written to stderr would draw over the frame.
    Discard,
}

impl Cli {
    /// Log destination for this invocation.
    #[must_use]
    pub fn log_target(&self) -> LogTarget {
        match &self.log_file {
            Some(path) => LogTarget::File(path.clone()),
            None if self.is_dashboard() => LogTarget::Discard,
            None => LogTarget::Stderr,
        }
    }
}

/// Initialize tracing/logging based on CLI options.
fn init_logging(cli: &Cli) {
    use tracing_subscriber::{
        fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        EnvFilter,
    };

    let target = cli.log_target();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_filter_string()));

    let writer = match &target {
        LogTarget::File(path) => match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => BoxMakeWriter::new(std::sync::Mutex::new(file)),
            Err(e) => {
                eprintln!("Warning: Could not open log file {}: {e}", path.display());
                BoxMakeWriter::new(std::io::sink)
            }
        },
        LogTarget::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogTarget::Discard => BoxMakeWriter::new(std::io::sink),
    };
    let ansi = target == LogTarget::Stderr;

    let result = match cli.log_format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(false)
                .with_ansi(ansi)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(ansi)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Text => {
            let layer = fmt::layer().with_ansi(ansi).with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
    };

    if let Err(e) = result {
        eprintln!("Warning: Could not initialize logging: {e}");
    }
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match &cli.command {
        None => commands::tui::run(&cli, &TuiArgs::default()),
        Some(Commands::Tui(args)) => commands::tui::run(&cli, args),
        Some(Commands::Options(args)) => commands::options::run(&cli, args),
        Some(Commands::Series(args)) => commands::series::run(&cli, args),
        Some(Commands::Ask(args)) => commands::ask::run(&cli, args),
        Some(Commands::Config(args)) => commands::config::run(&cli, args),
        Some(Commands::Completions(args)) => {
            generate_completions(args.shell);
            Ok(())
        }
    }
}
