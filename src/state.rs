//! Widget state machine.
//!
//! [`WidgetState`] holds everything the chat panel shows and every transition
//! is a plain method, so the widget's behaviour can be exercised without a
//! renderer or a network. The async side lives in
//! [`ChatService`](crate::service::chat_service::ChatService) and in the
//! browser store, both of which only call into these transitions.

use std::collections::BTreeMap;

use crate::config::WidgetConfig;
use crate::errors::TransportError;
use crate::models::{Message, Turn};

/// Order in which replies of overlapping requests join the conversation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplyOrdering {
    /// Append each reply as soon as it arrives.
    #[default]
    Completion,
    /// Hold a reply until every earlier request has finished.
    Submission,
}

/// A request that has been recorded in the state and must now be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub seq: u64,
    pub turns: Vec<Turn>,
}

/// The most recent send that failed; kept so it can be retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedSend {
    pub turns: Vec<Turn>,
    pub error: TransportError,
}

/// What [`WidgetState::complete`] did with a finished request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The reply was appended to the conversation.
    Replied,
    /// The reply is waiting for an earlier request to finish.
    Held,
    Failed(TransportError),
    /// The sequence number was not in flight; nothing changed.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetState {
    is_open: bool,
    show_welcome: bool,
    messages: Vec<Message>,
    input: String,
    in_flight: BTreeMap<u64, Vec<Turn>>,
    held: BTreeMap<u64, Message>,
    next_seq: u64,
    last_failure: Option<FailedSend>,
    ordering: ReplyOrdering,
    history_limit: Option<usize>,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self::new(ReplyOrdering::default(), None)
    }
}

impl WidgetState {
    pub fn new(ordering: ReplyOrdering, history_limit: Option<usize>) -> Self {
        Self {
            is_open: false,
            show_welcome: true,
            messages: Vec::new(),
            input: String::new(),
            in_flight: BTreeMap::new(),
            held: BTreeMap::new(),
            next_seq: 0,
            last_failure: None,
            ordering,
            history_limit,
        }
    }

    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(config.reply_ordering, config.history_limit)
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn show_welcome(&self) -> bool {
        self.show_welcome
    }

    /// True while at least one request is in flight.
    pub fn is_typing(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn last_failure(&self) -> Option<&FailedSend> {
        self.last_failure.as_ref()
    }

    pub fn toggle(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.is_open
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Records the current input as a user message and starts a request for it.
    ///
    /// Returns `None` without touching anything when the input is blank.
    pub fn submit(&mut self) -> Option<PendingSend> {
        if self.input.trim().is_empty() {
            return None;
        }

        let text = std::mem::take(&mut self.input);
        self.messages.push(Message::user(text));
        self.show_welcome = false;
        self.last_failure = None;

        let turns = self.history_turns();
        Some(self.dispatch(turns))
    }

    /// Re-sends the turns of the last failed request under a new sequence number.
    pub fn retry(&mut self) -> Option<PendingSend> {
        let failed = self.last_failure.take()?;
        Some(self.dispatch(failed.turns))
    }

    /// Applies the result of request `seq`.
    pub fn complete(&mut self, seq: u64, result: Result<String, TransportError>) -> SendOutcome {
        let Some(turns) = self.in_flight.remove(&seq) else {
            return SendOutcome::Stale;
        };

        match result {
            Ok(text) => {
                let reply = Message::bot(text);
                match self.ordering {
                    ReplyOrdering::Completion => {
                        self.messages.push(reply);
                        SendOutcome::Replied
                    }
                    ReplyOrdering::Submission => {
                        self.held.insert(seq, reply);
                        self.release_held();
                        if self.held.contains_key(&seq) {
                            SendOutcome::Held
                        } else {
                            SendOutcome::Replied
                        }
                    }
                }
            }
            Err(error) => {
                self.last_failure = Some(FailedSend { turns, error: error.clone() });
                self.release_held();
                SendOutcome::Failed(error)
            }
        }
    }

    /// Turns for the endpoint: the conversation, capped to the newest
    /// `history_limit` messages when a limit is set.
    pub fn history_turns(&self) -> Vec<Turn> {
        let skip = match self.history_limit {
            Some(limit) => self.messages.len().saturating_sub(limit),
            None => 0,
        };
        self.messages[skip..].iter().map(Message::to_turn).collect()
    }

    fn dispatch(&mut self, turns: Vec<Turn>) -> PendingSend {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight.insert(seq, turns.clone());
        PendingSend { seq, turns }
    }

    // Releases held replies whose predecessors have all finished.
    fn release_held(&mut self) {
        let oldest_in_flight = self.in_flight.keys().next().copied();
        while let Some(entry) = self.held.first_entry() {
            if oldest_in_flight.is_some_and(|oldest| oldest < *entry.key()) {
                break;
            }
            self.messages.push(entry.remove());
        }
    }
}
