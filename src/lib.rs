//! chat_widget: core of an embeddable chat widget.
//!
//! - [`state`]: the widget's state machine (open/closed, welcome, typing, messages)
//! - [`transport`]: the `POST /chat` round trip behind the [`ChatTransport`] trait
//! - [`service`]: async driver tying the state machine to a transport
//! - [`markdown`]: message rendering with tables, strikethrough and math
//!
//! The browser widget lives in the `frontend` workspace member and builds on
//! this crate with default features off.

pub mod config;
pub mod errors;
pub mod markdown;
pub mod models;
pub mod service;
pub mod state;
pub mod transport;

pub use config::WidgetConfig;
pub use errors::{ConfigError, TransportError};
pub use markdown::render_markdown;
pub use models::{ChatRequest, ChatResponse, Message, Role, Sender, Turn};
pub use service::chat_service::ChatService;
pub use state::{FailedSend, PendingSend, ReplyOrdering, SendOutcome, WidgetState};
pub use transport::ChatTransport;
#[cfg(feature = "native")]
pub use transport::HttpTransport;
