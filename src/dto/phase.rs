use serde::Serialize;
use utoipa::ToSchema;

use crate::state::state_machine::{GamePhase, TurnStatus};

/// Game phase exposed to the front-end (REST/SSE).
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisibleGamePhase {
    /// Teams and settings are being prepared.
    Setup,
    /// A team is acting and the clock is ticking.
    Playing,
    /// A team is acting and the clock is on hold.
    Paused,
    /// The clock ran out; the next team gets ready.
    RoundEnd,
    /// The game is finished.
    GameOver,
}

impl From<GamePhase> for VisibleGamePhase {
    fn from(value: GamePhase) -> Self {
        match value {
            GamePhase::Setup => VisibleGamePhase::Setup,
            GamePhase::TeamTurn(TurnStatus::Running) => VisibleGamePhase::Playing,
            GamePhase::TeamTurn(TurnStatus::Paused) => VisibleGamePhase::Paused,
            GamePhase::RoundEndPending => VisibleGamePhase::RoundEnd,
            GamePhase::GameOver => VisibleGamePhase::GameOver,
        }
    }
}
