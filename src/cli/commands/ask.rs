//! Ask command implementation.
//!
//! Sends one question through a [`ChatSession`] so the reply text follows
//! the same fallback and error rules as the dashboard panel.

use serde::Serialize;
use tracing::warn;

use crate::chat::{ChatOutcome, ChatSession, Resolution, SubmitOutcome};
use crate::cli::{AskArgs, Cli, OutputFormat, SelectionArgs};
use crate::error::{DashError, Result};
use crate::model::ChatContext;
use crate::store::DataStore;

use super::{apply_selection, connect, load_store, runtime};

#[derive(Debug, Serialize)]
struct AskReport<'a> {
    query: &'a str,
    context: &'a ChatContext,
    response: &'a str,
    ok: bool,
}

/// Run the ask command.
pub fn run(cli: &Cli, args: &AskArgs) -> Result<()> {
    let query = args.query.join(" ");
    if query.trim().is_empty() {
        eprintln!("Nothing to send: the question is blank.");
        return Ok(());
    }

    let (config, client) = connect(cli)?;
    if query.chars().count() > config.chat.max_input_len {
        return Err(DashError::invalid_argument(
            "query",
            format!("longer than {} characters", config.chat.max_input_len),
        ));
    }
    let runtime = runtime()?;

    let context = question_context(load_store(&runtime, &client), &args.selection)?;

    let mut session = ChatSession::new().with_max_input_len(config.chat.max_input_len);
    session.set_input(query.clone());
    let request = match session.submit(context.clone()) {
        SubmitOutcome::Sent(request) => request,
        SubmitOutcome::Empty => {
            eprintln!("Nothing to send: the question is blank.");
            return Ok(());
        }
        SubmitOutcome::Busy => {
            return Err(DashError::invalid_argument("query", "a request is already outstanding"));
        }
    };

    let outcome = runtime.block_on(async {
        tokio::select! {
            result = client.chat(&request.query, &request.context) => Ok(match result {
                Ok(reply) => ChatOutcome::Replied(reply),
                Err(e) => ChatOutcome::Failed(e.to_string()),
            }),
            _ = tokio::signal::ctrl_c() => Err(DashError::Interrupted),
        }
    })?;
    let ok = matches!(outcome, ChatOutcome::Replied(_));

    let Resolution::Appended(id) = session.resolve(request.seq, outcome) else {
        return Err(DashError::invalid_argument("query", "reply arrived for an unknown request"));
    };
    let response = session
        .messages()
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.text.as_str())
        .unwrap_or_default();

    match cli.effective_output() {
        OutputFormat::Json => {
            let report = AskReport {
                query: &query,
                context: &context,
                response,
                ok,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => println!("{response}"),
    }

    Ok(())
}

/// The selection the dashboard would show for this path.
///
/// A dataset that failed to load leaves the context empty, the same way the
/// dashboard keeps running on an empty store; the question is still sent.
fn question_context(loaded: Result<DataStore>, selection: &SelectionArgs) -> Result<ChatContext> {
    match loaded {
        Ok(store) => Ok(apply_selection(&store, selection)?.context()),
        Err(e) => {
            warn!(error = %e, "dataset unavailable, asking without a selection");
            Ok(ChatContext::default())
        }
    }
}
