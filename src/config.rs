use crate::errors::ConfigError;
use crate::state::ReplyOrdering;

/// Chat backend the widget talks to unless overridden.
pub const DEFAULT_BASE_URL: &str = "https://backend-poli-ia-xhz9.onrender.com";

/// Delay before scrolling to the newest message, leaving time for the render.
pub const DEFAULT_SCROLL_DELAY_MS: u64 = 100;

const BASE_URL_VAR: &str = "CHAT_API_BASE_URL";
const HISTORY_LIMIT_VAR: &str = "CHAT_HISTORY_LIMIT";
const REPLY_ORDERING_VAR: &str = "CHAT_REPLY_ORDERING";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub base_url: String,
    pub title: String,
    pub greeting: String,
    pub prompt: String,
    pub placeholder: String,
    pub scroll_delay_ms: u64,
    /// Number of newest messages replayed to the endpoint; `None` sends everything.
    pub history_limit: Option<usize>,
    pub reply_ordering: ReplyOrdering,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            title: "Poli - IA".to_string(),
            greeting: "Hola, soy Poli - IA".to_string(),
            prompt: "¿En qué puedo ayudarte?".to_string(),
            placeholder: "Pregunta lo que quieras".to_string(),
            scroll_delay_ms: DEFAULT_SCROLL_DELAY_MS,
            history_limit: None,
            reply_ordering: ReplyOrdering::Completion,
        }
    }
}

impl WidgetConfig {
    /// Defaults with overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(BASE_URL_VAR) {
            let url = url.trim();
            if url.is_empty() {
                return Err(ConfigError::EmptyBaseUrl { var: BASE_URL_VAR });
            }
            config.base_url = url.to_string();
        }

        if let Some(raw) = lookup(HISTORY_LIMIT_VAR) {
            let limit = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidHistoryLimit {
                    var: HISTORY_LIMIT_VAR,
                    value: raw.clone(),
                })?;
            config.history_limit = Some(limit);
        }

        if let Some(raw) = lookup(REPLY_ORDERING_VAR) {
            config.reply_ordering = match raw.trim().to_lowercase().as_str() {
                "completion" => ReplyOrdering::Completion,
                "submission" => ReplyOrdering::Submission,
                _ => {
                    return Err(ConfigError::InvalidReplyOrdering {
                        var: REPLY_ORDERING_VAR,
                        value: raw,
                    })
                }
            };
        }

        Ok(config)
    }

    /// Full URL of the chat endpoint.
    pub fn chat_endpoint(&self) -> String {
        chat_endpoint(&self.base_url)
    }
}

/// Joins `base_url` with the `/chat` path, tolerating a trailing slash.
pub fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = WidgetConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.chat_endpoint(), format!("{DEFAULT_BASE_URL}/chat"));
        assert_eq!(config.scroll_delay_ms, 100);
        assert!(config.history_limit.is_none());
    }

    #[test]
    fn test_overrides_applied() {
        let config = WidgetConfig::from_lookup(lookup(&[
            ("CHAT_API_BASE_URL", "http://localhost:8000/"),
            ("CHAT_HISTORY_LIMIT", "20"),
            ("CHAT_REPLY_ORDERING", "Submission"),
        ]))
        .unwrap();
        assert_eq!(config.chat_endpoint(), "http://localhost:8000/chat");
        assert_eq!(config.history_limit, Some(20));
        assert_eq!(config.reply_ordering, ReplyOrdering::Submission);
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        let err = WidgetConfig::from_lookup(lookup(&[("CHAT_HISTORY_LIMIT", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHistoryLimit { .. }));

        let err = WidgetConfig::from_lookup(lookup(&[("CHAT_HISTORY_LIMIT", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHistoryLimit { .. }));

        let err = WidgetConfig::from_lookup(lookup(&[("CHAT_REPLY_ORDERING", "random")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidReplyOrdering { .. }));

        let err = WidgetConfig::from_lookup(lookup(&[("CHAT_API_BASE_URL", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyBaseUrl { .. }));
    }
}
