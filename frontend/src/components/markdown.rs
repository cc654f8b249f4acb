use chat_widget::render_markdown;
use leptos::html::Div;
use leptos::prelude::*;
use wasm_bindgen::{JsCast, JsValue};

/// A message body rendered from Markdown, with math typeset by KaTeX when the
/// host page has loaded its auto-render extension.
#[component]
pub fn MarkdownView(source: String) -> impl IntoView {
    let html = render_markdown(&source);
    let node_ref = NodeRef::<Div>::new();

    Effect::new(move |_| {
        if let Some(el) = node_ref.get() {
            typeset_math(el.as_ref());
        }
    });

    view! { <div class="chatbot-markdown" node_ref=node_ref inner_html=html></div> }
}

/// Calls `window.renderMathInElement(el)` if KaTeX auto-render is present.
fn typeset_math(el: &JsValue) {
    let Ok(render) = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("renderMathInElement")) else {
        return;
    };
    if let Some(render) = render.dyn_ref::<js_sys::Function>() {
        if let Err(e) = render.call1(&JsValue::NULL, el) {
            log::warn!("Math typesetting failed: {e:?}");
        }
    }
}
