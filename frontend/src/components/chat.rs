use chat_widget::{Message, Sender};
use gloo_timers::callback::Timeout;
use leptos::ev;
use leptos::html::Div;
use leptos::prelude::*;
use web_sys::{ScrollBehavior, ScrollIntoViewOptions};

use crate::components::markdown::MarkdownView;
use crate::state::WidgetStore;

/// Served next to the bundle by trunk (see `index.html`).
const ICON_SRC: &str = "/assets/chatbot-icon.svg";

/// Floating launcher button plus the chat panel it opens.
#[component]
pub fn ChatWidget() -> impl IntoView {
    let store = expect_context::<WidgetStore>();

    view! {
        <div class="chatbot-container">
            <button class="chatbot-button" on:click=move |_| store.toggle()>
                {move || {
                    if store.is_open() {
                        view! { <span class="chatbot-button-close">"✕"</span> }.into_any()
                    } else {
                        view! { <img src=ICON_SRC alt="Chatbot" class="chatbot-icon" /> }.into_any()
                    }
                }}
            </button>

            <Show when=move || store.is_open()>
                <ChatPanel />
            </Show>
        </div>
    }
}

#[component]
fn ChatPanel() -> impl IntoView {
    let store = expect_context::<WidgetStore>();
    let title = store.config.with_value(|c| c.title.clone());
    let end_ref = NodeRef::<Div>::new();

    // Scroll only when the list grows, not on every keystroke in the input.
    // The panel is only mounted while open, so the count is the only dependency.
    let message_count = Memo::new(move |_| store.state.with(|s| s.messages().len()));
    Effect::new(move |_| {
        message_count.track();
        let delay = store.config.with_value(|c| c.scroll_delay_ms);
        Timeout::new(delay.try_into().unwrap_or(u32::MAX), move || scroll_to_end(end_ref))
            .forget();
    });

    view! {
        <div class="chatbot-window">
            <div class="chatbot-header">
                <img src=ICON_SRC alt="Chatbot" class="chatbot-header-icon" />
                <span class="chatbot-header-title">{title}</span>
                <button class="chatbot-close" on:click=move |_| store.close()>"✕"</button>
            </div>

            <div class="chatbot-content">
                <Show when=move || store.show_welcome()>
                    <Welcome />
                </Show>

                <div class="chatbot-messages">
                    <For
                        each=move || store.state.with(|s| s.messages().to_vec())
                        key=|m| m.id
                        let:msg
                    >
                        <MessageBubble message=msg />
                    </For>

                    <Show when=move || store.is_typing()>
                        <TypingDots />
                    </Show>

                    <Show when=move || store.has_failure() && !store.is_typing()>
                        <button class="chatbot-retry" on:click=move |_| store.retry()>
                            "Reintentar"
                        </button>
                    </Show>

                    <div node_ref=end_ref></div>
                </div>
            </div>

            <ChatInput />
        </div>
    }
}

/// Smoothly scrolls the end anchor into view. The timer may fire after the
/// panel closed and disposed `end_ref`, in which case nothing happens.
fn scroll_to_end(end_ref: NodeRef<Div>) {
    let Some(end) = end_ref.try_get_untracked().flatten() else {
        return;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    end.scroll_into_view_with_scroll_into_view_options(&options);
}

#[component]
fn Welcome() -> impl IntoView {
    let store = expect_context::<WidgetStore>();
    let (greeting, prompt) = store.config.with_value(|c| (c.greeting.clone(), c.prompt.clone()));

    view! {
        <div class="chatbot-welcome">
            <p class="chatbot-welcome-text">{greeting}</p>
            <img src=ICON_SRC alt="Avatar Chatbot" class="chatbot-avatar" />
            <p class="chatbot-question">{prompt}</p>
        </div>
    }
}

/// A single chat message bubble.
#[component]
fn MessageBubble(message: Message) -> impl IntoView {
    let css_class = match message.sender {
        Sender::User => "chatbot-message user-message",
        Sender::Bot => "chatbot-message bot-message",
    };

    view! {
        <div class=css_class>
            <MarkdownView source=message.text />
        </div>
    }
}

/// Three dots bouncing in turn; the timing lives in the stylesheet.
#[component]
fn TypingDots() -> impl IntoView {
    view! {
        <div class="typing-dots" aria-label="typing">
            <span class="typing-dot">"."</span>
            <span class="typing-dot">"."</span>
            <span class="typing-dot">"."</span>
        </div>
    }
}

/// Input row. Stays editable while a reply is pending.
#[component]
fn ChatInput() -> impl IntoView {
    let store = expect_context::<WidgetStore>();
    let placeholder = store.config.with_value(|c| c.placeholder.clone());

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Enter" {
            ev.prevent_default();
            store.submit();
        }
    };

    view! {
        <div class="chatbot-input-container">
            <input
                type="text"
                class="chatbot-input"
                placeholder=placeholder
                prop:value=move || store.state.with(|s| s.input().to_string())
                on:input=move |ev| store.set_input(event_target_value(&ev))
                on:keydown=on_keydown
            />
            <button class="chatbot-send-button" on:click=move |_| store.submit()>
                "➤"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use leptos::reactive::owner::Owner;

    use super::*;

    #[test]
    fn test_scroll_after_panel_unmounted_is_noop() {
        let owner = Owner::new();
        let end_ref = owner.with(NodeRef::<Div>::new);
        owner.cleanup();

        scroll_to_end(end_ref);
    }

    #[test]
    fn test_scroll_before_anchor_mounted_is_noop() {
        let owner = Owner::new();
        let end_ref = owner.with(NodeRef::<Div>::new);

        scroll_to_end(end_ref);
    }
}
