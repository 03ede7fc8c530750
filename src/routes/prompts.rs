use axum::{Json, Router, extract::State, routing::post};
use axum_valid::Valid;

use crate::{
    dto::game::{GameSummary, WordsRequest},
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Prompt deck routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/prompts/words", post(load_words))
        .route("/prompts/images", post(use_images))
}

/// Replace the deck with words generated for a category.
///
/// Responds once the word list arrived; an unavailable provider yields an empty deck.
#[utoipa::path(
    post,
    path = "/prompts/words",
    tag = "prompts",
    request_body = WordsRequest,
    responses((status = 200, description = "Word deck installed", body = GameSummary))
)]
pub async fn load_words(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<WordsRequest>>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(
        game_service::load_words(&state, payload.category).await?,
    ))
}

/// Go back to the image deck.
#[utoipa::path(
    post,
    path = "/prompts/images",
    tag = "prompts",
    responses((status = 200, description = "Image deck installed", body = GameSummary))
)]
pub async fn use_images(State(state): State<SharedState>) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(game_service::use_image_prompts(&state).await?))
}
