use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use reqwest::Client;
use tracing::{debug, warn};

use crate::content::{ContentError, ContentProvider, parse_word_list};

use super::{
    config::OpenRouterConfig,
    error::{OpenRouterError, OpenRouterResult},
    models::{ChatMessage, ChatRequest, ChatResponse, words_prompt},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Content provider asking an OpenRouter chat model for words.
#[derive(Clone)]
pub struct OpenRouterProvider {
    client: Client,
    endpoint: Arc<str>,
    api_key: Arc<str>,
    model: Arc<str>,
}

impl OpenRouterProvider {
    /// Build the HTTP client for `config`.
    pub fn new(config: OpenRouterConfig) -> OpenRouterResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| OpenRouterError::ClientBuilder { source })?;

        let endpoint = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );

        Ok(Self {
            client,
            endpoint: Arc::from(endpoint),
            api_key: Arc::from(config.api_key),
            model: Arc::from(config.model),
        })
    }

    /// Model answering the requests.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: String) -> OpenRouterResult<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.endpoint.as_ref())
            .bearer_auth(self.api_key.as_ref())
            .json(&body)
            .send()
            .await
            .map_err(|source| OpenRouterError::RequestSend { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(OpenRouterError::RequestStatus { status });
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|source| OpenRouterError::DecodeResponse { source })?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(OpenRouterError::EmptyChoices)
    }
}

impl ContentProvider for OpenRouterProvider {
    fn generate_words(&self, category: &str) -> BoxFuture<'_, Result<Vec<String>, ContentError>> {
        let prompt = words_prompt(category);
        let category = category.to_string();
        Box::pin(async move {
            match self.complete(prompt).await {
                Ok(content) => {
                    let words = parse_word_list(&content);
                    debug!(%category, count = words.len(), "received word list");
                    Ok(words)
                }
                Err(err) => {
                    warn!(%category, error = %err, "word list request failed");
                    Err(err.into())
                }
            }
        })
    }
}
