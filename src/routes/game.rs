use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::game::{GameSummary, SkipRequest},
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Routes driving the turn/round flow.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game", get(get_game))
        .route("/game/start", post(start_game))
        .route("/game/correct", post(mark_correct))
        .route("/game/skip", post(skip))
        .route("/game/previous", post(previous_prompt))
        .route("/game/pause", post(pause))
        .route("/game/resume", post(resume))
        .route("/game/ready", post(ready))
        .route("/game/next-team", post(next_team))
        .route("/game/restart", post(restart))
        .route("/game/play-again", post(play_again))
}

/// Current game state.
#[utoipa::path(
    get,
    path = "/game",
    tag = "game",
    responses((status = 200, description = "Current game state", body = GameSummary))
)]
pub async fn get_game(State(state): State<SharedState>) -> Json<GameSummary> {
    Json(game_service::get_game(&state).await)
}

/// Start the first turn of a new game.
#[utoipa::path(
    post,
    path = "/game/start",
    tag = "game",
    responses(
        (status = 200, description = "Game started", body = GameSummary),
        (status = 400, description = "No teams registered"),
        (status = 409, description = "A game is already running")
    )
)]
pub async fn start_game(State(state): State<SharedState>) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::start_game(&state).await?))
}

/// The acting team found the prompt.
#[utoipa::path(
    post,
    path = "/game/correct",
    tag = "game",
    responses(
        (status = 200, description = "Point scored, next prompt shown", body = GameSummary),
        (status = 409, description = "No turn in progress or prompts loading")
    )
)]
pub async fn mark_correct(
    State(state): State<SharedState>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::mark_correct(&state).await?))
}

/// Skip the current prompt, optionally with a penalty.
#[utoipa::path(
    post,
    path = "/game/skip",
    tag = "game",
    request_body = SkipRequest,
    responses(
        (status = 200, description = "Next prompt shown", body = GameSummary),
        (status = 409, description = "No turn in progress or prompts loading")
    )
)]
pub async fn skip(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<SkipRequest>>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::skip(&state, payload.delta).await?))
}

/// Show the previous prompt again.
#[utoipa::path(
    post,
    path = "/game/previous",
    tag = "game",
    responses(
        (status = 200, description = "Previous prompt shown", body = GameSummary),
        (status = 409, description = "No turn in progress or prompts loading")
    )
)]
pub async fn previous_prompt(
    State(state): State<SharedState>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::previous_prompt(&state).await?))
}

/// Hold the countdown.
#[utoipa::path(
    post,
    path = "/game/pause",
    tag = "game",
    responses(
        (status = 200, description = "Countdown paused", body = GameSummary),
        (status = 409, description = "No running countdown")
    )
)]
pub async fn pause(State(state): State<SharedState>) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::pause(&state).await?))
}

/// Release the countdown.
#[utoipa::path(
    post,
    path = "/game/resume",
    tag = "game",
    responses(
        (status = 200, description = "Countdown resumed", body = GameSummary),
        (status = 409, description = "Countdown is not paused")
    )
)]
pub async fn resume(State(state): State<SharedState>) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::resume(&state).await?))
}

/// Start the "get ready" countdown before the next team plays.
#[utoipa::path(
    post,
    path = "/game/ready",
    tag = "game",
    responses(
        (status = 200, description = "Ready countdown started", body = GameSummary),
        (status = 409, description = "No team waiting or countdown already running")
    )
)]
pub async fn ready(State(state): State<SharedState>) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::ready(&state).await?))
}

/// Hand the turn to the next team without a countdown.
#[utoipa::path(
    post,
    path = "/game/next-team",
    tag = "game",
    responses(
        (status = 200, description = "Next team playing", body = GameSummary),
        (status = 409, description = "No team waiting")
    )
)]
pub async fn next_team(State(state): State<SharedState>) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::next_team(&state).await?))
}

/// Forget the whole session.
#[utoipa::path(
    post,
    path = "/game/restart",
    tag = "game",
    responses((status = 200, description = "Back to setup with nothing kept", body = GameSummary))
)]
pub async fn restart(State(state): State<SharedState>) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::restart(&state).await?))
}

/// Rematch with the same teams and scores.
#[utoipa::path(
    post,
    path = "/game/play-again",
    tag = "game",
    responses(
        (status = 200, description = "Back to setup with the roster kept", body = GameSummary),
        (status = 409, description = "Game is not over")
    )
)]
pub async fn play_again(State(state): State<SharedState>) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::play_again(&state).await?))
}
