use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a displayed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    /// Role this sender takes when the conversation is replayed to the endpoint.
    pub fn role(&self) -> Role {
        match self {
            Sender::User => Role::User,
            Sender::Bot => Role::Assistant,
        }
    }
}

/// Role tag of a [`Turn`] on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the displayed conversation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }

    pub fn to_turn(&self) -> Turn {
        Turn {
            role: self.sender.role(),
            content: self.text.clone(),
        }
    }
}

/// A role-tagged entry sent to the remote chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Request body for `POST /chat`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub messages: &'a [Turn],
}

impl<'a> ChatRequest<'a> {
    pub fn new(messages: &'a [Turn]) -> Self {
        Self { messages }
    }
}

/// Response body of `POST /chat`. Fields other than `response` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}
