use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::{game::TeamSummary, phase::VisibleGamePhase};

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Build an event from a raw data string.
    pub fn new<E>(event: E, data: String) -> Self
    where
        E: Into<Option<String>>,
    {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether the last snapshot save failed.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast whenever the gameplay phase changes.
pub struct PhaseChangedEvent {
    pub phase: VisibleGamePhase,
    pub current_round: u32,
    pub current_team: Option<TeamSummary>,
    /// Set once the game is over.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_team: Option<TeamSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast every second of a turn countdown.
pub struct TimerTickEvent {
    pub remaining: u64,
    pub round: u32,
    pub team_index: usize,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast every second of the "get ready" countdown before a turn.
pub struct ReadyCountdownEvent {
    pub remaining: u64,
    pub next_team: Option<TeamSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a word list request starts or ends.
pub struct PromptsLoadingEvent {
    pub loading: bool,
    pub category: String,
    /// Number of words received, once loading is over.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}
