use axum::Router;

use crate::state::SharedState;

pub mod docs;
pub mod game;
pub mod health;
pub mod prompts;
pub mod settings;
pub mod sse;
pub mod teams;

/// Compose the game API, the event stream and the documentation under one router.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(game::router())
        .merge(teams::router())
        .merge(settings::router())
        .merge(prompts::router())
        .merge(docs::router());

    api_router.with_state(state)
}
