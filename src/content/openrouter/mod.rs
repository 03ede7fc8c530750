mod client;
mod config;
mod error;
mod models;

pub use client::OpenRouterProvider;
pub use config::OpenRouterConfig;
pub use error::{OpenRouterError, OpenRouterResult};

use std::sync::Arc;

use tracing::{info, warn};

use super::{ContentProvider, DisabledProvider};

/// Provider configured from the environment, or [`DisabledProvider`] when no key is set.
pub fn provider_from_env() -> Arc<dyn ContentProvider> {
    let config = match OpenRouterConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            info!(reason = %err, "word generation disabled");
            return Arc::new(DisabledProvider);
        }
    };

    match OpenRouterProvider::new(config) {
        Ok(provider) => {
            info!(model = provider.model(), "word generation backed by OpenRouter");
            Arc::new(provider)
        }
        Err(err) => {
            warn!(error = %err, "failed to build OpenRouter client; word generation disabled");
            Arc::new(DisabledProvider)
        }
    }
}
