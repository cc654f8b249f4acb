use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error};

use crate::config::WidgetConfig;
use crate::state::{PendingSend, SendOutcome, WidgetState};
use crate::transport::ChatTransport;

/// Drives one widget's state against a transport.
///
/// The state lock is only held inside the pure transitions, never across the
/// network call, so several sends may be in flight at once.
pub struct ChatService<T> {
    transport: T,
    state: Mutex<WidgetState>,
}

impl<T: ChatTransport> ChatService<T> {
    pub fn new(transport: T, config: &WidgetConfig) -> Self {
        Self {
            transport,
            state: Mutex::new(WidgetState::from_config(config)),
        }
    }

    pub fn toggle(&self) -> bool {
        self.lock().toggle()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.lock().set_input(text);
    }

    /// Submits the current input. `None` when the input was blank.
    pub async fn submit(&self) -> Option<SendOutcome> {
        let pending = self.lock().submit()?;
        Some(self.exchange(pending).await)
    }

    /// Replaces the input with `text` and submits it.
    pub async fn send(&self, text: impl Into<String>) -> Option<SendOutcome> {
        self.set_input(text);
        self.submit().await
    }

    /// Re-sends the last failed request. `None` when nothing has failed.
    pub async fn retry(&self) -> Option<SendOutcome> {
        let pending = self.lock().retry()?;
        Some(self.exchange(pending).await)
    }

    pub fn snapshot(&self) -> WidgetState {
        self.lock().clone()
    }

    async fn exchange(&self, pending: PendingSend) -> SendOutcome {
        debug!(seq = pending.seq, turns = pending.turns.len(), "sending chat request");

        let result = self.transport.send(&pending.turns).await;
        if let Err(e) = &result {
            error!(seq = pending.seq, "Failed to fetch chatbot reply: {e}");
        }

        self.lock().complete(pending.seq, result)
    }

    fn lock(&self) -> MutexGuard<'_, WidgetState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};
    use std::rc::Rc;

    use tokio::sync::oneshot;
    use tokio::task::{self, LocalSet};

    use super::*;
    use crate::errors::TransportError;
    use crate::models::{Sender, Turn};

    /// Replies from a fixed script and records every request it sees.
    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<String, TransportError>>>,
        calls: Mutex<Vec<Vec<Turn>>>,
    }

    impl ScriptedTransport {
        fn with(replies: Vec<Result<String, TransportError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::default(),
            }
        }

        fn calls(&self) -> Vec<Vec<Turn>> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ChatTransport for ScriptedTransport {
        async fn send(&self, turns: &[Turn]) -> Result<String, TransportError> {
            self.calls.lock().unwrap().push(turns.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::network("script exhausted")))
        }
    }

    /// Holds each request until the test releases the gate keyed by its last turn.
    #[derive(Default)]
    struct GatedTransport {
        gates: Mutex<HashMap<String, oneshot::Receiver<String>>>,
    }

    impl GatedTransport {
        fn gate(&self, content: &str) -> oneshot::Sender<String> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(content.to_string(), rx);
            tx
        }
    }

    impl ChatTransport for GatedTransport {
        async fn send(&self, turns: &[Turn]) -> Result<String, TransportError> {
            let key = turns.last().map(|t| t.content.clone()).unwrap_or_default();
            let rx = self.gates.lock().unwrap().remove(&key);
            match rx {
                Some(rx) => rx.await.map_err(TransportError::network),
                None => Err(TransportError::network("no gate")),
            }
        }
    }

    fn entries(state: &WidgetState) -> Vec<(Sender, String)> {
        state
            .messages()
            .iter()
            .map(|m| (m.sender, m.text.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_blank_input_never_calls_transport() {
        let transport = ScriptedTransport::with(vec![Ok("unused".into())]);
        let service = ChatService::new(&transport, &WidgetConfig::default());

        assert!(service.send("").await.is_none());
        assert!(service.send("   ").await.is_none());

        assert!(transport.calls().is_empty());
        let state = service.snapshot();
        assert!(state.messages().is_empty());
        assert!(state.show_welcome());
    }

    #[tokio::test]
    async fn test_hi_gets_hello() {
        let transport = ScriptedTransport::with(vec![Ok("hello".into())]);
        let service = ChatService::new(&transport, &WidgetConfig::default());

        assert_eq!(service.send("hi").await, Some(SendOutcome::Replied));

        let state = service.snapshot();
        assert_eq!(
            entries(&state),
            vec![(Sender::User, "hi".into()), (Sender::Bot, "hello".into())]
        );
        assert!(!state.is_typing());
        assert!(!state.show_welcome());
        assert_eq!(transport.calls(), vec![vec![Turn::user("hi")]]);
    }

    #[tokio::test]
    async fn test_failure_is_silent_and_recoverable() {
        let transport = ScriptedTransport::with(vec![
            Err(TransportError::Status { status: 500 }),
            Ok("back online".into()),
        ]);
        let service = ChatService::new(&transport, &WidgetConfig::default());

        let outcome = service.send("hi").await;
        assert_eq!(
            outcome,
            Some(SendOutcome::Failed(TransportError::Status { status: 500 }))
        );
        let state = service.snapshot();
        assert_eq!(entries(&state), vec![(Sender::User, "hi".into())]);
        assert!(!state.is_typing());
        assert!(state.last_failure().is_some());

        assert_eq!(service.retry().await, Some(SendOutcome::Replied));
        assert_eq!(
            entries(&service.snapshot()),
            vec![(Sender::User, "hi".into()), (Sender::Bot, "back online".into())]
        );
        assert_eq!(transport.calls().len(), 2);
        assert_eq!(transport.calls()[0], transport.calls()[1]);
        assert!(service.retry().await.is_none());
    }

    #[tokio::test]
    async fn test_full_history_sent_each_time() {
        let transport = ScriptedTransport::with(vec![Ok("one".into()), Ok("two".into())]);
        let service = ChatService::new(&transport, &WidgetConfig::default());

        service.send("a").await;
        service.send("b").await;

        assert_eq!(
            transport.calls()[1],
            vec![Turn::user("a"), Turn::assistant("one"), Turn::user("b")]
        );
    }

    #[tokio::test]
    async fn test_concurrent_replies_follow_completion_order() {
        LocalSet::new()
            .run_until(async {
                let transport = GatedTransport::default();
                let gate_a = transport.gate("A");
                let gate_b = transport.gate("B");
                let service = Rc::new(ChatService::new(transport, &WidgetConfig::default()));

                let send_a = task::spawn_local({
                    let service = Rc::clone(&service);
                    async move { service.send("A").await }
                });
                let send_b = task::spawn_local({
                    let service = Rc::clone(&service);
                    async move { service.send("B").await }
                });

                while service.snapshot().in_flight() < 2 {
                    task::yield_now().await;
                }

                gate_b.send("reply B".into()).unwrap();
                assert_eq!(send_b.await.unwrap(), Some(SendOutcome::Replied));
                assert!(service.snapshot().is_typing());

                gate_a.send("reply A".into()).unwrap();
                assert_eq!(send_a.await.unwrap(), Some(SendOutcome::Replied));

                let state = service.snapshot();
                assert_eq!(
                    entries(&state),
                    vec![
                        (Sender::User, "A".into()),
                        (Sender::User, "B".into()),
                        (Sender::Bot, "reply B".into()),
                        (Sender::Bot, "reply A".into()),
                    ]
                );
                assert!(!state.is_typing());
            })
            .await;
    }
}
