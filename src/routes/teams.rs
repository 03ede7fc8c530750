use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, post},
};
use axum_valid::Valid;

use crate::{
    dto::game::{AddTeamRequest, AdjustScoreRequest, GameSummary},
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Roster management routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/teams", post(add_team))
        .route("/teams/{index}", delete(remove_team))
        .route("/teams/{index}/score", post(adjust_score))
}

/// Register a team before the game starts.
#[utoipa::path(
    post,
    path = "/teams",
    tag = "teams",
    request_body = AddTeamRequest,
    responses(
        (status = 200, description = "Team added", body = GameSummary),
        (status = 400, description = "Blank or duplicate name, or roster full"),
        (status = 409, description = "A game is running")
    )
)]
pub async fn add_team(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<AddTeamRequest>>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::add_team(&state, payload.name).await?))
}

/// Remove a team.
#[utoipa::path(
    delete,
    path = "/teams/{index}",
    tag = "teams",
    params(("index" = usize, Path, description = "Position of the team in the roster")),
    responses(
        (status = 200, description = "Team removed", body = GameSummary),
        (status = 404, description = "No team at this position")
    )
)]
pub async fn remove_team(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::remove_team(&state, index).await?))
}

/// Correct the score of a team; scores never drop below zero.
#[utoipa::path(
    post,
    path = "/teams/{index}/score",
    tag = "teams",
    params(("index" = usize, Path, description = "Position of the team in the roster")),
    request_body = AdjustScoreRequest,
    responses(
        (status = 200, description = "Score updated", body = GameSummary),
        (status = 404, description = "No team at this position")
    )
)]
pub async fn adjust_score(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
    Valid(Json(payload)): Valid<Json<AdjustScoreRequest>>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(
        game_service::adjust_score(&state, index, payload.delta).await?,
    ))
}
