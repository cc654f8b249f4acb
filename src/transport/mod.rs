//! The single network operation of the widget: replay the conversation to
//! `POST {base_url}/chat` and read back the `response` string.

#[cfg(feature = "native")]
mod http;

#[cfg(feature = "native")]
pub use http::HttpTransport;

use crate::errors::TransportError;
use crate::models::Turn;

/// Sends an ordered conversation to the chat backend and returns its reply.
///
/// Implementations perform exactly one round trip per call: no retries, no
/// caching, no timeout of their own. Futures are not required to be `Send`
/// so browser transports can implement this too.
#[allow(async_fn_in_trait)]
pub trait ChatTransport {
    async fn send(&self, turns: &[Turn]) -> Result<String, TransportError>;
}

impl<T: ChatTransport + ?Sized> ChatTransport for &T {
    async fn send(&self, turns: &[Turn]) -> Result<String, TransportError> {
        (**self).send(turns).await
    }
}
