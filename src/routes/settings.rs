use axum::{Json, Router, extract::State, routing::put};
use axum_valid::Valid;

use crate::{
    dto::game::{GameSummary, RoundsRequest, TimerRequest},
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Game settings routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/settings/rounds", put(set_rounds))
        .route("/settings/timer", put(set_timer))
}

/// Set the number of rounds (clamped to 2..=10) while no game is running.
#[utoipa::path(
    put,
    path = "/settings/rounds",
    tag = "settings",
    request_body = RoundsRequest,
    responses(
        (status = 200, description = "Rounds updated", body = GameSummary),
        (status = 409, description = "A game is running")
    )
)]
pub async fn set_rounds(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<RoundsRequest>>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(
        game_service::set_number_of_rounds(&state, payload.rounds).await?,
    ))
}

/// Set the turn duration in seconds.
#[utoipa::path(
    put,
    path = "/settings/timer",
    tag = "settings",
    request_body = TimerRequest,
    responses((status = 200, description = "Timer updated", body = GameSummary))
)]
pub async fn set_timer(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<TimerRequest>>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(
        game_service::set_timer_duration(&state, payload.seconds, payload.apply_now).await?,
    ))
}
