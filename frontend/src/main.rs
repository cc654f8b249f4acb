mod api;
mod components;
mod state;

use chat_widget::WidgetConfig;
use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::chat::ChatWidget;
use state::WidgetStore;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    WidgetStore::provide(WidgetConfig {
        base_url: api::API_BASE.to_string(),
        ..WidgetConfig::default()
    });

    view! { <ChatWidget /> }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
