//! Markdown rendering using pulldown-cmark.
//!
//! Provides [`render_markdown`] to turn a chat message into HTML with GFM
//! tables, strikethrough, task lists and TeX math. Math is emitted as
//! delimited TeX inside `span.math` so KaTeX's auto-render can typeset it in
//! the page.

use pulldown_cmark_escape::escape_html;
use pulldown_cmark::{html, CowStr, Event, Options, Parser};

/// Render markdown text to an HTML fragment.
///
/// Raw HTML in the input is shown as text rather than injected into the page.
pub fn render_markdown(input: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_MATH);

    let parser = Parser::new_ext(input, options).map(rewrite_event);

    let mut out = String::with_capacity(input.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn rewrite_event(event: Event<'_>) -> Event<'_> {
    match event {
        Event::InlineMath(tex) => Event::InlineHtml(math_span("math-inline", r"\(", &tex, r"\)")),
        Event::DisplayMath(tex) => Event::InlineHtml(math_span("math-display", r"\[", &tex, r"\]")),
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    }
}

fn math_span(class: &str, open: &str, tex: &str, close: &str) -> CowStr<'static> {
    let mut span = format!(r#"<span class="math {class}">{open}"#);
    // Writing into a String cannot fail.
    let _ = escape_html(&mut span, tex);
    span.push_str(close);
    span.push_str("</span>");
    span.into()
}
