use chat_widget::config::{DEFAULT_BASE_URL, chat_endpoint};
use chat_widget::{ChatRequest, ChatResponse, ChatTransport, TransportError, Turn};
use gloo_net::http::Request;

/// Base URL of the chat backend. Set `CHAT_API_BASE_URL` at build time to override.
pub const API_BASE: &str = match option_env!("CHAT_API_BASE_URL") {
    Some(url) => url,
    None => DEFAULT_BASE_URL,
};

/// Browser [`ChatTransport`] backed by `fetch` through gloo-net.
#[derive(Clone, Debug)]
pub struct GlooTransport {
    endpoint: String,
}

impl GlooTransport {
    pub fn new(base_url: &str) -> Self {
        Self { endpoint: chat_endpoint(base_url) }
    }
}

impl ChatTransport for GlooTransport {
    /// Posts the conversation and returns the backend's `response` text.
    async fn send(&self, turns: &[Turn]) -> Result<String, TransportError> {
        let resp = Request::post(&self.endpoint)
            .json(&ChatRequest::new(turns))
            .map_err(TransportError::encode)?
            .send()
            .await
            .map_err(TransportError::network)?;

        if !resp.ok() {
            return Err(TransportError::Status { status: resp.status() });
        }

        resp.json::<ChatResponse>()
            .await
            .map(|body| body.response)
            .map_err(TransportError::decode)
    }
}
