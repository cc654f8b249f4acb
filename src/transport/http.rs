use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use tracing::debug;

use crate::config::chat_endpoint;
use crate::errors::TransportError;
use crate::models::{ChatRequest, ChatResponse, Turn};

use super::ChatTransport;

/// [`ChatTransport`] over reqwest, bound to one base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(TransportError::network)?;

        Ok(Self {
            client,
            endpoint: chat_endpoint(base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatTransport for HttpTransport {
    async fn send(&self, turns: &[Turn]) -> Result<String, TransportError> {
        debug!(endpoint = %self.endpoint, turns = turns.len(), "posting chat history");

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest::new(turns))
            .send()
            .await
            .map_err(TransportError::network)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16() });
        }

        let body = resp
            .json::<ChatResponse>()
            .await
            .map_err(TransportError::decode)?;

        Ok(body.response)
    }
}
