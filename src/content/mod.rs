//! Word list generation for the category prompt mode.

#[cfg(feature = "openrouter")]
pub mod openrouter;

use futures::future::{self, BoxFuture};
use thiserror::Error;
use tracing::warn;

/// Failures raised while generating words.
#[derive(Debug, Error)]
pub enum ContentError {
    /// No provider is configured.
    #[error("content provider is not configured")]
    NotConfigured,
    /// The provider could not be reached or answered badly.
    #[error("content provider request failed: {0}")]
    Request(String),
    /// The provider answered with something that is not a word list.
    #[error("content provider returned an unusable payload: {0}")]
    Decode(String),
}

/// Source of charades words for a category.
pub trait ContentProvider: Send + Sync {
    /// Generate words associated with `category`.
    fn generate_words(&self, category: &str) -> BoxFuture<'_, Result<Vec<String>, ContentError>>;
}

/// Provider used when no backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledProvider;

impl ContentProvider for DisabledProvider {
    fn generate_words(&self, _category: &str) -> BoxFuture<'_, Result<Vec<String>, ContentError>> {
        Box::pin(future::ready(Err(ContentError::NotConfigured)))
    }
}

/// Fixed word list, handy for offline play and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticProvider(pub Vec<String>);

impl ContentProvider for StaticProvider {
    fn generate_words(&self, _category: &str) -> BoxFuture<'_, Result<Vec<String>, ContentError>> {
        Box::pin(future::ready(Ok(self.0.clone())))
    }
}

/// Parse a model answer into a word list.
///
/// Code fences are stripped, the rest must be a JSON array. Non-string entries and blank
/// strings are dropped; anything that is not an array yields an empty list.
pub fn parse_word_list(raw: &str) -> Vec<String> {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<serde_json::Value>(cleaned) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(word) => {
                    let word = word.trim();
                    (!word.is_empty()).then(|| word.to_string())
                }
                _ => None,
            })
            .collect(),
        Ok(other) => {
            warn!(kind = json_kind(&other), "word list payload is not an array");
            Vec::new()
        }
        Err(err) => {
            warn!(error = %err, "failed to parse word list payload");
            Vec::new()
        }
    }
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
