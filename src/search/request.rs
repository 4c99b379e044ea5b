//! Search request types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::{Intensity, Level};

fn default_max_results() -> usize {
    20
}

/// Query language. Controls synthesized query phrasing only; explicit
/// filters are language-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fa,
    En,
}

/// An ephemeral per-call search query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query, Persian or English. Must be non-empty for
    /// [`SearchEngine::search`](crate::search::SearchEngine::search).
    pub text: String,
    /// Exact-match level filter.
    #[serde(default)]
    pub level: Option<Level>,
    /// Exact-match intensity filter.
    #[serde(default)]
    pub intensity: Option<Intensity>,
    /// Substring-matched target muscle, checked against both the English and
    /// Persian muscle fields regardless of [`language`](Self::language).
    #[serde(default)]
    pub target_muscle: Option<String>,
    /// Maximum number of results to return. Must be at least 1.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default)]
    pub language: Language,
    /// Bound applied independently to each remote call (embed, index query).
    /// On expiry the search fails with the corresponding `Unavailable` error.
    #[serde(skip)]
    pub timeout: Option<Duration>,
}

impl SearchRequest {
    /// Create a request with default options.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: None,
            intensity: None,
            target_muscle: None,
            max_results: default_max_results(),
            language: Language::default(),
            timeout: None,
        }
    }

    /// Start building a request.
    pub fn builder(text: impl Into<String>) -> SearchRequestBuilder {
        SearchRequestBuilder {
            request: Self::new(text),
        }
    }
}

/// Builder for [`SearchRequest`].
pub struct SearchRequestBuilder {
    request: SearchRequest,
}

impl SearchRequestBuilder {
    pub fn level(mut self, level: Level) -> Self {
        self.request.level = Some(level);
        self
    }

    pub fn intensity(mut self, intensity: Intensity) -> Self {
        self.request.intensity = Some(intensity);
        self
    }

    pub fn target_muscle(mut self, muscle: impl Into<String>) -> Self {
        self.request.target_muscle = Some(muscle.into());
        self
    }

    pub fn max_results(mut self, max_results: usize) -> Self {
        self.request.max_results = max_results;
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.request.language = language;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> SearchRequest {
        self.request
    }
}

/// Options for the convenience operations
/// ([`recommend`](crate::search::SearchEngine::recommend) and
/// [`list_safe_exercises`](crate::search::SearchEngine::list_safe_exercises)),
/// which synthesize their own query text.
#[derive(Debug, Clone, Default)]
pub struct RecommendOptions {
    /// Result cap; the engine default applies when unset (20 for
    /// `recommend`, 50 for `list_safe_exercises`).
    pub max_results: Option<usize>,
    pub language: Language,
    /// Per-remote-call timeout, as on [`SearchRequest`].
    pub timeout: Option<Duration>,
}

impl RecommendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_filters() {
        let request = SearchRequest::builder("leg exercises")
            .level(Level::Beginner)
            .intensity(Intensity::Light)
            .target_muscle("legs")
            .max_results(5)
            .language(Language::En)
            .build();
        assert_eq!(request.text, "leg exercises");
        assert_eq!(request.level, Some(Level::Beginner));
        assert_eq!(request.intensity, Some(Intensity::Light));
        assert_eq!(request.target_muscle.as_deref(), Some("legs"));
        assert_eq!(request.max_results, 5);
        assert_eq!(request.language, Language::En);
    }

    #[test]
    fn deserializes_with_defaults() {
        let request: SearchRequest = serde_json::from_str(r#"{"text": "تمرین پا"}"#).unwrap();
        assert_eq!(request.max_results, 20);
        assert_eq!(request.language, Language::Fa);
        assert!(request.level.is_none());
    }
}
