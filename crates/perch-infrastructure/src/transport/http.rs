//! HTTP preference transport.
//!
//! Talks to the preference endpoint served alongside the overlay page:
//!
//! - `GET  {base_url}/api/config/preferences` → JSON array of records
//! - `POST {base_url}/api/config/preferences` → `{ "success": bool }`

use async_trait::async_trait;
use perch_core::error::{PerchError, Result};
use perch_core::preference::{PreferenceRecord, PreferenceTransport};
use reqwest::Client;
use serde_json::Value;

use crate::dto::{SaveResponse, decode_records};

const PREFERENCES_ROUTE: &str = "/api/config/preferences";

/// Preference transport backed by the HTTP preference endpoint.
#[derive(Clone)]
pub struct HttpPreferenceTransport {
    client: Client,
    endpoint: String,
}

impl HttpPreferenceTransport {
    /// Creates a transport for the server at `base_url`.
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a transport using a preconfigured client (proxies, timeouts).
    pub fn with_client(client: Client, base_url: impl AsRef<str>) -> Self {
        let endpoint = format!(
            "{}{}",
            base_url.as_ref().trim_end_matches('/'),
            PREFERENCES_ROUTE
        );
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn transport_error(context: &str, err: reqwest::Error) -> PerchError {
    PerchError::transport(format!("{}: {}", context, err))
}

#[async_trait]
impl PreferenceTransport for HttpPreferenceTransport {
    async fn fetch_all(&self) -> Result<Vec<PreferenceRecord>> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| transport_error("GET preferences failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PerchError::transport(format!(
                "GET preferences returned {}",
                status
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| transport_error("Failed to decode preferences", e))?;

        decode_records(payload)
    }

    async fn store(&self, record: &PreferenceRecord) -> Result<bool> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(record)
            .send()
            .await
            .map_err(|e| transport_error("POST preferences failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PerchError::transport(format!(
                "POST preferences returned {}",
                status
            )));
        }

        let body: SaveResponse = response
            .json()
            .await
            .map_err(|e| transport_error("Failed to decode save response", e))?;

        Ok(body.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_normalizes_trailing_slash() {
        let transport = HttpPreferenceTransport::new("http://127.0.0.1:48911/");
        assert_eq!(
            transport.endpoint(),
            "http://127.0.0.1:48911/api/config/preferences"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Bind and release an ephemeral port so nothing listens on it.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let transport = HttpPreferenceTransport::new(format!("http://127.0.0.1:{}", port));
        let err = transport.fetch_all().await.unwrap_err();
        assert!(err.is_transport());
    }
}
