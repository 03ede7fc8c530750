use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::phase::VisibleGamePhase;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Whether the last snapshot save succeeded.
    pub persistence: bool,
    /// Phase the game currently sits in.
    pub phase: VisibleGamePhase,
    /// Displays currently subscribed to the event stream.
    pub sse_clients: usize,
}

impl HealthResponse {
    /// Build the response; a failing snapshot store degrades the status.
    pub fn new(persistence: bool, phase: VisibleGamePhase, sse_clients: usize) -> Self {
        Self {
            status: if persistence { "ok" } else { "degraded" }.to_string(),
            persistence,
            phase,
            sse_clients,
        }
    }
}
