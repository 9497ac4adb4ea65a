mod gemini;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
pub use gemini::GeminiBackend;
use nextword_core::{clean_completion, merge_suggestions, rule_based_suggestions};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{RemoteBackend, RemoteConfig, SuggestConfig};

/// Failures of a remote completion call. None of them reach a client; the
/// engine logs them and serves the rule-based list instead.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("network error: {0}")]
    Network(String),

    #[error("completion API failed ({code}): {body}")]
    Status { code: u16, body: String },

    #[error("invalid completion response: {0}")]
    Malformed(String),

    #[error("completion response has no candidate text")]
    MissingCandidate,
}

/// A remote service that proposes the next word for a piece of text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Raw completion text, before any cleanup.
    async fn complete(&self, text: &str) -> Result<String, CompletionError>;

    fn name(&self) -> &str;
}

/// Merges one remote completion with the dictionary suggestions.
pub struct SuggestionEngine {
    remote: Option<Arc<dyn CompletionBackend>>,
    max_suggestions: usize,
}

impl SuggestionEngine {
    pub fn new(remote: Option<Arc<dyn CompletionBackend>>, max_suggestions: usize) -> Self {
        Self {
            remote,
            max_suggestions,
        }
    }

    pub fn from_config(remote: RemoteConfig, suggest: &SuggestConfig) -> Self {
        let backend: Option<Arc<dyn CompletionBackend>> = match remote.backend {
            RemoteBackend::None => None,
            RemoteBackend::Gemini => {
                let api_key = remote.api_key();
                if api_key.is_none() && remote.require_api_key {
                    warn!(
                        "{} is not set; serving dictionary suggestions only",
                        remote.api_key_env
                    );
                    None
                } else {
                    match GeminiBackend::new(remote, api_key) {
                        Ok(backend) => Some(Arc::new(backend)),
                        Err(error) => {
                            warn!("failed to init gemini backend: {error:#}");
                            None
                        }
                    }
                }
            }
        };

        Self::new(backend, suggest.max_suggestions)
    }

    pub fn remote_name(&self) -> Option<&str> {
        self.remote.as_deref().map(|backend| backend.name())
    }

    /// At most `max_suggestions` unique words for `text`. Blank text gives an
    /// empty list without touching the network.
    pub async fn compute_suggestions(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let rules = rule_based_suggestions(text);
        let Some(remote) = &self.remote else {
            return merge_suggestions(None, rules, self.max_suggestions);
        };

        let started = Instant::now();
        let completion = match remote.complete(text).await {
            Ok(raw) => Some(clean_completion(&raw)),
            Err(error) => {
                warn!(
                    backend = remote.name(),
                    "remote completion failed, using dictionary only: {error}"
                );
                None
            }
        };
        debug!(
            backend = remote.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            remote = ?completion,
            "remote completion settled"
        );

        merge_suggestions(completion.as_deref(), rules, self.max_suggestions)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedBackend;
    use super::*;

    fn engine_with(backend: Arc<ScriptedBackend>) -> SuggestionEngine {
        SuggestionEngine::new(Some(backend), nextword_core::MAX_SUGGESTIONS)
    }

    #[tokio::test]
    async fn blank_text_skips_remote() {
        let backend = ScriptedBackend::replying("anything");
        let engine = engine_with(backend.clone());

        assert!(engine.compute_suggestions("").await.is_empty());
        assert!(engine.compute_suggestions("  \n ").await.is_empty());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn remote_word_leads_cleaned() {
        let backend = ScriptedBackend::replying("Tomorrow.");
        let engine = engine_with(backend.clone());

        let suggestions = engine.compute_suggestions("see you").await;
        assert_eq!(suggestions, ["tomorrow", "are", "can", "will", "should"]);
        assert_eq!(backend.calls(), 1);
        assert_eq!(backend.seen.lock().unwrap().as_slice(), ["see you"]);
    }

    #[tokio::test]
    async fn remote_duplicate_of_rule_collapses() {
        let engine = engine_with(ScriptedBackend::replying(" Evening! "));

        let suggestions = engine.compute_suggestions("in the").await;
        assert_eq!(
            suggestions,
            ["evening", "morning", "afternoon", "future", "past"]
        );
    }

    #[tokio::test]
    async fn remote_failure_falls_back_to_rules() {
        let backend = ScriptedBackend::failing(503);
        let engine = engine_with(backend.clone());

        let suggestions = engine.compute_suggestions("in the").await;
        assert_eq!(
            suggestions,
            ["morning", "afternoon", "evening", "future", "past"]
        );
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn punctuation_only_reply_is_dropped() {
        let engine = engine_with(ScriptedBackend::replying("?"));

        let suggestions = engine.compute_suggestions("hello").await;
        assert_eq!(suggestions, ["am", "will", "can", "want", "think"]);
    }

    #[tokio::test]
    async fn runs_without_remote() {
        let engine = SuggestionEngine::new(None, 3);
        assert_eq!(engine.remote_name(), None);

        let suggestions = engine.compute_suggestions("tell me what happened?").await;
        assert_eq!(suggestions, ["is", "are", "do"]);
    }

    #[tokio::test]
    async fn disabled_backend_in_config_means_no_remote() {
        let remote = RemoteConfig {
            backend: RemoteBackend::None,
            ..RemoteConfig::default()
        };
        let engine = SuggestionEngine::from_config(remote, &SuggestConfig::default());
        assert_eq!(engine.remote_name(), None);
    }

    #[tokio::test]
    async fn missing_key_disables_remote_unless_proxied() {
        let remote = RemoteConfig {
            api_key_env: "NEXTWORD_TEST_SURELY_UNSET_KEY".to_string(),
            ..RemoteConfig::default()
        };
        let engine = SuggestionEngine::from_config(remote.clone(), &SuggestConfig::default());
        assert_eq!(engine.remote_name(), None);

        let proxied = RemoteConfig {
            require_api_key: false,
            endpoint: "http://127.0.0.1:8787/v1beta".to_string(),
            ..remote
        };
        let engine = SuggestionEngine::from_config(proxied, &SuggestConfig::default());
        assert_eq!(engine.remote_name(), Some("gemini"));
    }
}
