//! Runs network work on behalf of the dashboard.
//!
//! Each fetch is a spawned task that reports back as an [`AppEvent`] on a
//! channel, so the event loop is the only place state changes. Failures are
//! converted into the matching event here and never propagate further.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::ApiClient;
use crate::chat::{ChatOutcome, ChatRequest, RequestSeq};
use crate::dashboard::{AppEvent, Effect};
use crate::error::DashError;

/// Load the dataset, converting any failure into `DataLoadFailed`.
pub async fn load_data(client: &ApiClient) -> AppEvent {
    match client.fetch_data().await {
        Ok(store) => AppEvent::DataLoaded(store),
        Err(e) => AppEvent::DataLoadFailed(e.to_string()),
    }
}

/// Load the map layer, converting any failure into `MapLoadFailed`.
pub async fn load_map(client: &ApiClient) -> AppEvent {
    match client.fetch_map().await {
        Ok(image) => AppEvent::MapLoaded(image),
        Err(e) => AppEvent::MapLoadFailed(e.to_string()),
    }
}

/// Perform one chat request, giving up early if `cancel` fires.
pub async fn run_chat(client: &ApiClient, request: ChatRequest, cancel: CancellationToken) -> AppEvent {
    let outcome = tokio::select! {
        biased;
        () = cancel.cancelled() => ChatOutcome::Failed(DashError::Cancelled.to_string()),
        result = client.chat(&request.query, &request.context) => match result {
            Ok(reply) => ChatOutcome::Replied(reply),
            Err(e) => ChatOutcome::Failed(e.to_string()),
        },
    };
    AppEvent::ChatResolved {
        seq: request.seq,
        outcome,
    }
}

/// Spawns network tasks and feeds their results back as events.
#[derive(Debug)]
pub struct Dispatcher {
    client: Arc<ApiClient>,
    events: UnboundedSender<AppEvent>,
    in_flight: Option<(RequestSeq, CancellationToken)>,
}

impl Dispatcher {
    /// Create a dispatcher reporting to `events`.
    #[must_use]
    pub fn new(client: ApiClient, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            client: Arc::new(client),
            events,
            in_flight: None,
        }
    }

    /// Start the one-time dataset and map fetches.
    pub fn spawn_startup(&self) -> Vec<JoinHandle<()>> {
        let data = {
            let client = Arc::clone(&self.client);
            let events = self.events.clone();
            tokio::spawn(async move {
                send(&events, load_data(&client).await);
            })
        };
        let map = {
            let client = Arc::clone(&self.client);
            let events = self.events.clone();
            tokio::spawn(async move {
                send(&events, load_map(&client).await);
            })
        };
        vec![data, map]
    }

    /// Carry out the effects of one applied event.
    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SendChat(request) => self.send_chat(request),
                Effect::CancelChat(seq) => self.cancel_chat(seq),
            }
        }
    }

    /// Sequence number of the request still running, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<RequestSeq> {
        self.in_flight.as_ref().map(|(seq, _)| *seq)
    }

    fn send_chat(&mut self, request: ChatRequest) {
        if let Some((previous, token)) = self.in_flight.take() {
            debug!(seq = previous.0, "superseding chat request");
            token.cancel();
        }
        let token = CancellationToken::new();
        self.in_flight = Some((request.seq, token.clone()));

        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        tokio::spawn(async move {
            send(&events, run_chat(&client, request, token).await);
        });
    }

    fn cancel_chat(&mut self, seq: RequestSeq) {
        match self.in_flight.take() {
            Some((running, token)) if running == seq => token.cancel(),
            other => self.in_flight = other,
        }
    }

    /// Forget a request once its outcome has been applied.
    pub fn finished(&mut self, seq: RequestSeq) {
        if self.in_flight() == Some(seq) {
            self.in_flight = None;
        }
    }
}

fn send(events: &UnboundedSender<AppEvent>, event: AppEvent) {
    if events.send(event).is_err() {
        warn!("event loop closed before network result arrived");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::model::ChatContext;

    fn unreachable_client() -> ApiClient {
        // Port 9 (discard) on localhost is closed on test machines.
        ApiClient::new(&ServerConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            connect_timeout_secs: 1,
            data_timeout_secs: 1,
            map_timeout_secs: 1,
            chat_timeout_secs: 1,
        })
        .unwrap()
    }

    fn request(seq: u64) -> ChatRequest {
        ChatRequest {
            seq: RequestSeq(seq),
            query: "trend?".to_string(),
            context: ChatContext::default(),
        }
    }

    #[tokio::test]
    async fn test_load_data_failure_becomes_event() {
        let event = load_data(&unreachable_client()).await;
        assert!(matches!(event, AppEvent::DataLoadFailed(_)));
    }

    #[tokio::test]
    async fn test_cancelled_chat_resolves_as_failure() {
        let token = CancellationToken::new();
        token.cancel();
        let event = run_chat(&unreachable_client(), request(4), token).await;
        match event {
            AppEvent::ChatResolved { seq, outcome } => {
                assert_eq!(seq, RequestSeq(4));
                assert_eq!(outcome, ChatOutcome::Failed(DashError::Cancelled.to_string()));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dispatcher_tracks_in_flight_request() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut dispatcher = Dispatcher::new(unreachable_client(), tx);

        dispatcher.run(vec![Effect::SendChat(request(1))]);
        assert_eq!(dispatcher.in_flight(), Some(RequestSeq(1)));

        dispatcher.run(vec![Effect::CancelChat(RequestSeq(7))]);
        assert_eq!(dispatcher.in_flight(), Some(RequestSeq(1)));

        dispatcher.run(vec![Effect::CancelChat(RequestSeq(1))]);
        assert_eq!(dispatcher.in_flight(), None);

        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event,
            AppEvent::ChatResolved { seq: RequestSeq(1), outcome: ChatOutcome::Failed(_) }
        ));
    }
}
