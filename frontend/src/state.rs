use chat_widget::{ChatTransport, PendingSend, SendOutcome, WidgetConfig, WidgetState};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::GlooTransport;

/// Widget state shared through Leptos context.
///
/// All mutation goes through [`WidgetState`]'s transitions; this type only
/// adds reactivity and runs the network call.
#[derive(Clone, Copy)]
pub struct WidgetStore {
    pub state: RwSignal<WidgetState>,
    pub config: StoredValue<WidgetConfig>,
    transport: StoredValue<GlooTransport>,
}

impl WidgetStore {
    /// Create a new `WidgetStore` and provide it in the current Leptos context.
    pub fn provide(config: WidgetConfig) -> Self {
        let store = Self {
            state: RwSignal::new(WidgetState::from_config(&config)),
            transport: StoredValue::new(GlooTransport::new(&config.base_url)),
            config: StoredValue::new(config),
        };
        provide_context(store);
        store
    }

    pub fn is_open(&self) -> bool {
        self.state.with(WidgetState::is_open)
    }

    pub fn show_welcome(&self) -> bool {
        self.state.with(WidgetState::show_welcome)
    }

    pub fn is_typing(&self) -> bool {
        self.state.with(WidgetState::is_typing)
    }

    pub fn has_failure(&self) -> bool {
        self.state.with(|s| s.last_failure().is_some())
    }

    pub fn toggle(&self) {
        self.state.update(|s| {
            s.toggle();
        });
    }

    pub fn close(&self) {
        self.state.update(WidgetState::close);
    }

    pub fn set_input(&self, text: String) {
        self.state.update(|s| s.set_input(text));
    }

    /// Submit the input box. Blank input does nothing.
    pub fn submit(&self) {
        if let Some(pending) = self.state.try_update(WidgetState::submit).flatten() {
            self.exchange(pending);
        }
    }

    pub fn retry(&self) {
        if let Some(pending) = self.state.try_update(WidgetState::retry).flatten() {
            self.exchange(pending);
        }
    }

    fn exchange(&self, pending: PendingSend) {
        let transport = self.transport.get_value();
        let state = self.state;

        spawn_local(async move {
            let result = transport.send(&pending.turns).await;
            if let Err(e) = &result {
                log::error!("Failed to fetch chatbot reply: {e}");
            }

            let outcome = state.try_update(|s| s.complete(pending.seq, result));
            if let Some(SendOutcome::Stale) = outcome {
                log::warn!("Dropped reply for unknown request {}", pending.seq);
            }
        });
    }
}
