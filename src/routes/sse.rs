use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/sse",
    tag = "sse",
    responses((status = 200, description = "Game event stream", content_type = "text/event-stream", body = String))
)]
/// Stream game state, phase changes and countdown ticks to the front-end.
pub async fn stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let (receiver, greeting) = sse_service::subscribe(&state).await;
    info!("New SSE connection");
    sse_service::broadcast_info(state.sse(), "stream connected");
    sse_service::to_sse_stream(receiver, greeting)
}

/// Configure the SSE endpoint.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse", get(stream))
}
