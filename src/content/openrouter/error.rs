//! Error types raised by the OpenRouter client.

use reqwest::StatusCode;
use thiserror::Error;

use crate::content::ContentError;

/// Convenient result alias returning [`OpenRouterError`] failures.
pub type OpenRouterResult<T> = Result<T, OpenRouterError>;

/// Failures that can occur while talking to OpenRouter.
#[derive(Debug, Error)]
pub enum OpenRouterError {
    /// Required environment variable is missing.
    #[error("missing OpenRouter environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build OpenRouter client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The completion request could not be sent.
    #[error("failed to send OpenRouter request")]
    RequestSend {
        #[source]
        source: reqwest::Error,
    },
    /// OpenRouter answered with an unexpected status code.
    #[error("unexpected OpenRouter response status {status}")]
    RequestStatus { status: StatusCode },
    /// Response payload could not be parsed into JSON.
    #[error("failed to decode OpenRouter response")]
    DecodeResponse {
        #[source]
        source: reqwest::Error,
    },
    /// The completion carried no choice.
    #[error("OpenRouter response contains no choices")]
    EmptyChoices,
}

impl From<OpenRouterError> for ContentError {
    fn from(err: OpenRouterError) -> Self {
        match err {
            OpenRouterError::MissingEnvVar { .. } => ContentError::NotConfigured,
            OpenRouterError::DecodeResponse { .. } | OpenRouterError::EmptyChoices => {
                ContentError::Decode(err.to_string())
            }
            other => ContentError::Request(other.to_string()),
        }
    }
}
