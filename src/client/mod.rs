//! HTTP client for the dashboard service.
//!
//! Three endpoints, all relative to the configured base URL:
//!
//! - `GET /api/data`: JSON array of [`DataPoint`](crate::model::DataPoint)
//! - `GET /api/map`: opaque image bytes
//! - `POST /api/chat`: `{query, context}` → `{response?}`
//!
//! The client returns typed errors; turning them into dashboard events (an
//! empty store, a synthetic assistant reply) is done by [`dispatch`].

pub mod dispatch;

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{debug, instrument};

use crate::config::ServerConfig;
use crate::error::{DashError, Result};
use crate::model::{decode_records, ChatContext, ChatReply, ChatRequestBody, MapImage};
use crate::store::DataStore;

/// Dataset endpoint.
pub const DATA_ENDPOINT: &str = "/api/data";
/// Geospatial layer endpoint.
pub const MAP_ENDPOINT: &str = "/api/map";
/// Assistant endpoint.
pub const CHAT_ENDPOINT: &str = "/api/chat";

/// Client for the dashboard service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    data_timeout: Duration,
    map_timeout: Duration,
    chat_timeout: Duration,
}

impl ApiClient {
    /// Build a client from server settings.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(DashError::invalid_argument(
                "server",
                format!("expected an http(s) URL, got '{}'", config.base_url),
            ));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DashError::http("client", e))?;

        Ok(Self {
            http,
            base_url,
            data_timeout: Duration::from_secs(config.data_timeout_secs),
            map_timeout: Duration::from_secs(config.map_timeout_secs),
            chat_timeout: Duration::from_secs(config.chat_timeout_secs),
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Fetch and decode the dataset.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_data(&self) -> Result<DataStore> {
        let response = self
            .http
            .get(self.url(DATA_ENDPOINT))
            .timeout(self.data_timeout)
            .send()
            .await
            .map_err(|e| transport_error(DATA_ENDPOINT, e, self.data_timeout))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(DATA_ENDPOINT, e, self.data_timeout))?;
        check_status(DATA_ENDPOINT, status)?;

        let records = decode_records(&body)
            .map_err(|e| DashError::decode(DATA_ENDPOINT, e.to_string()))?;
        debug!(records = records.len(), "dataset decoded");
        Ok(DataStore::new(records))
    }

    /// Fetch the geospatial layer image.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_map(&self) -> Result<MapImage> {
        let response = self
            .http
            .get(self.url(MAP_ENDPOINT))
            .timeout(self.map_timeout)
            .send()
            .await
            .map_err(|e| transport_error(MAP_ENDPOINT, e, self.map_timeout))?;

        check_status(MAP_ENDPOINT, response.status())?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(MAP_ENDPOINT, e, self.map_timeout))?;

        Ok(MapImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    /// Ask the assistant a question about the given selection.
    #[instrument(skip(self, query), fields(base_url = %self.base_url, region = %context.region))]
    pub async fn chat(&self, query: &str, context: &ChatContext) -> Result<ChatReply> {
        let response = self
            .http
            .post(self.url(CHAT_ENDPOINT))
            .timeout(self.chat_timeout)
            .json(&ChatRequestBody { query, context })
            .send()
            .await
            .map_err(|e| transport_error(CHAT_ENDPOINT, e, self.chat_timeout))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(CHAT_ENDPOINT, e, self.chat_timeout))?;
        decode_chat_reply(status, &body)
    }
}

/// Interpret a `/api/chat` response.
pub fn decode_chat_reply(status: StatusCode, body: &[u8]) -> Result<ChatReply> {
    check_status(CHAT_ENDPOINT, status)?;
    serde_json::from_slice(body).map_err(|e| DashError::decode(CHAT_ENDPOINT, e.to_string()))
}

fn check_status(endpoint: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(DashError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        })
    }
}

fn transport_error(endpoint: &str, err: reqwest::Error, timeout: Duration) -> DashError {
    if err.is_timeout() {
        DashError::timeout(endpoint, timeout)
    } else {
        DashError::http(endpoint, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_chat_reply() {
        let reply = decode_chat_reply(StatusCode::OK, br#"{"response":"Up."}"#).unwrap();
        assert_eq!(reply.answer(), Some("Up."));

        let empty = decode_chat_reply(StatusCode::OK, b"{}").unwrap();
        assert_eq!(empty.answer(), None);
    }

    #[test]
    fn test_decode_chat_reply_rejects_bad_status() {
        let err = decode_chat_reply(StatusCode::INTERNAL_SERVER_ERROR, br#"{"response":"x"}"#)
            .unwrap_err();
        assert!(matches!(err, DashError::Status { status: 500, .. }));
    }

    #[test]
    fn test_decode_chat_reply_rejects_malformed_body() {
        let err = decode_chat_reply(StatusCode::OK, b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, DashError::Decode { .. }));

        let err = decode_chat_reply(StatusCode::OK, br#"{"response":42}"#).unwrap_err();
        assert!(matches!(err, DashError::Decode { .. }));
    }

    #[test]
    fn test_new_trims_base_url() {
        let config = ServerConfig {
            base_url: "http://localhost:8000/".to_string(),
            ..ServerConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url(CHAT_ENDPOINT), "http://localhost:8000/api/chat");
    }

    #[test]
    fn test_new_rejects_non_http_url() {
        let config = ServerConfig {
            base_url: "localhost:8000".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(
            ApiClient::new(&config),
            Err(DashError::InvalidArgument { .. })
        ));
    }
}
