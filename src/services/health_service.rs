use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report persistence, phase and listener count, logging when saves are failing.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let (healthy, phase) = state
        .read_game(|game| (game.persistence_healthy(), game.phase()))
        .await;
    if !healthy {
        warn!("snapshot saves are failing (degraded mode)");
    }
    HealthResponse::new(healthy, phase.into(), state.sse().subscriber_count())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        content::DisabledProvider,
        dao::{prompts::StaticPrompts, snapshot_store::MemorySnapshotStore},
        dto::phase::VisibleGamePhase,
        state::{AppState, GameController, controller::ControllerSettings, timer::ManualTimer},
    };

    #[tokio::test]
    async fn reports_setup_and_listeners() {
        let controller = GameController::restore(
            Arc::new(MemorySnapshotStore::new()),
            Arc::new(ManualTimer),
            Arc::new(StaticPrompts::default()),
            ControllerSettings {
                palette: Vec::new(),
                default_rounds: 3,
                default_timer_seconds: 60,
            },
        );
        let state = AppState::new(controller, Arc::new(DisabledProvider));
        let _display = state.sse().subscribe();

        let health = health_status(&state).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.phase, VisibleGamePhase::Setup);
        assert_eq!(health.sse_clients, 1);
    }
}
