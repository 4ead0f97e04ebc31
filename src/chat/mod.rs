//! Assistant conversation state machine.
//!
//! A [`ChatSession`] owns the message log, the input buffer and at most one
//! outstanding request:
//!
//! ```text
//!   Idle --submit(non-blank)--> Sending{seq} --resolve(seq, _)--> Idle
//!                                   |
//!                                   +--cancel()--> Idle
//! ```
//!
//! Submitting while a request is outstanding is rejected and the input is
//! kept. Every request carries a [`RequestSeq`]; outcomes for anything other
//! than the outstanding request are discarded, so a reply that arrives after
//! cancellation never lands in the log.

use chrono::Local;
use tracing::{debug, info, warn};

use crate::model::{ChatContext, ChatMessage, ChatReply, MessageId, Role};

/// Greeting seeded into every new session.
pub const GREETING: &str =
    "Hello! I have access to the dashboard data. Ask me about trends, anomalies, or the geospatial map.";

/// Reply used when the server answers without a `response`.
pub const FALLBACK_REPLY: &str = "I'm sorry, I couldn't process that.";

/// Reply used when the request fails in any way.
pub const CONNECTION_ERROR_REPLY: &str = "Error connecting to AI server.";

/// Sequence number of an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(pub u64);

/// Whether a request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStatus {
    /// Ready to send.
    Idle,
    /// Waiting for the reply to `seq`.
    Sending {
        /// The outstanding request.
        seq: RequestSeq,
    },
}

/// A query ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Sequence number to hand back with the outcome.
    pub seq: RequestSeq,
    /// Raw query text, untrimmed.
    pub query: String,
    /// Selection snapshot taken at submit time.
    pub context: ChatContext,
}

/// What the transport reports back for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    /// The server replied with a decodable payload.
    Replied(ChatReply),
    /// Transport error, bad status, malformed body or timeout.
    Failed(String),
}

/// Result of [`ChatSession::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Request issued; send it.
    Sent(ChatRequest),
    /// Input was blank; nothing happened.
    Empty,
    /// A request is already outstanding; input kept.
    Busy,
}

/// Result of [`ChatSession::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// An assistant message was appended.
    Appended(MessageId),
    /// The outcome was not for the outstanding request and was dropped.
    Stale,
}

/// Message log plus request lifecycle.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    input: String,
    status: ChatStatus,
    next_message_id: u64,
    last_seq: u64,
    max_input_len: Option<usize>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// A session holding only the greeting.
    #[must_use]
    pub fn new() -> Self {
        let mut session = Self {
            messages: Vec::new(),
            input: String::new(),
            status: ChatStatus::Idle,
            next_message_id: 1,
            last_seq: 0,
            max_input_len: None,
        };
        session.append(Role::Assistant, GREETING.to_string());
        session
    }

    /// Limit the input buffer to `max` characters.
    #[must_use]
    pub fn with_max_input_len(mut self, max: usize) -> Self {
        self.max_input_len = Some(max);
        self
    }

    /// Messages in display order.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Current input buffer.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Lifecycle state.
    #[must_use]
    pub fn status(&self) -> ChatStatus {
        self.status
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.status, ChatStatus::Sending { .. })
    }

    /// Append a character to the input buffer.
    pub fn push_char(&mut self, c: char) {
        if let Some(max) = self.max_input_len {
            if self.input.chars().count() >= max {
                return;
            }
        }
        self.input.push(c);
    }

    /// Remove the last character of the input buffer.
    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Replace the input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Empty the input buffer.
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Send the input buffer with the given selection snapshot.
    pub fn submit(&mut self, context: ChatContext) -> SubmitOutcome {
        if self.input.trim().is_empty() {
            return SubmitOutcome::Empty;
        }
        if self.is_pending() {
            debug!("submit rejected, request outstanding");
            return SubmitOutcome::Busy;
        }

        let query = std::mem::take(&mut self.input);
        self.append(Role::User, query.clone());

        self.last_seq += 1;
        let seq = RequestSeq(self.last_seq);
        self.status = ChatStatus::Sending { seq };
        info!(seq = seq.0, region = %context.region, variable = %context.variable, item = %context.item, "chat request issued");

        SubmitOutcome::Sent(ChatRequest {
            seq,
            query,
            context,
        })
    }

    /// Apply the transport outcome for request `seq`.
    pub fn resolve(&mut self, seq: RequestSeq, outcome: ChatOutcome) -> Resolution {
        if self.status != (ChatStatus::Sending { seq }) {
            debug!(seq = seq.0, "discarding stale chat outcome");
            return Resolution::Stale;
        }

        let text = match outcome {
            ChatOutcome::Replied(reply) => reply
                .answer()
                .map(str::to_string)
                .unwrap_or_else(|| FALLBACK_REPLY.to_string()),
            ChatOutcome::Failed(reason) => {
                warn!(seq = seq.0, %reason, "chat request failed");
                CONNECTION_ERROR_REPLY.to_string()
            }
        };

        self.status = ChatStatus::Idle;
        Resolution::Appended(self.append(Role::Assistant, text))
    }

    /// Abandon the outstanding request, if any, and return its sequence number.
    pub fn cancel(&mut self) -> Option<RequestSeq> {
        match self.status {
            ChatStatus::Sending { seq } => {
                info!(seq = seq.0, "chat request cancelled");
                self.status = ChatStatus::Idle;
                Some(seq)
            }
            ChatStatus::Idle => None,
        }
    }

    fn append(&mut self, role: Role, text: String) -> MessageId {
        let id = MessageId(self.next_message_id);
        self.next_message_id += 1;
        self.messages.push(ChatMessage {
            id,
            role,
            text,
            created_at: Local::now(),
        });
        id
    }
}
