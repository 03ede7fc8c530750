use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use crate::{
    dto::{
        game::GameSummary,
        sse::{Handshake, ServerEvent},
    },
    services::sse_events::EVENT_GAME_STATE,
    state::{SharedState, SseHub},
};

/// Subscribe to the SSE stream and queue the greeting for this subscriber.
///
/// The returned receiver is primed with a handshake and the current game state so a
/// freshly connected front-end can render without waiting for the next change.
pub async fn subscribe(
    state: &SharedState,
) -> (broadcast::Receiver<ServerEvent>, Vec<ServerEvent>) {
    let receiver = state.sse().subscribe();
    let (summary, healthy) = state
        .read_game(|game| (GameSummary::from(game), game.persistence_healthy()))
        .await;

    let mut greeting = Vec::with_capacity(2);
    if let Ok(event) = ServerEvent::json(
        Some("handshake".to_string()),
        &Handshake {
            message: "stream connected".into(),
            degraded: !healthy,
        },
    ) {
        greeting.push(event);
    }
    if let Ok(event) = ServerEvent::json(Some(EVENT_GAME_STATE.to_string()), &summary) {
        greeting.push(event);
    }
    (receiver, greeting)
}

/// Convert a broadcast receiver into an SSE response, forwarding events and
/// cleaning up once the client disconnects.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<ServerEvent>,
    greeting: Vec<ServerEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    tokio::spawn(async move {
        for payload in greeting {
            if tx.send(Ok(to_event(payload))).await.is_err() {
                return;
            }
        }

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            if tx.send(Ok(to_event(payload))).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "SSE subscriber lagging; skipping events");
                            continue;
                        }
                    }
                }
            }
        }

        info!("SSE stream disconnected");
    });

    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn to_event(payload: ServerEvent) -> Event {
    let mut event = Event::default().data(payload.data);
    if let Some(name) = payload.event {
        event = event.event(name);
    }
    event
}

/// Send a human-readable info message onto the SSE stream.
pub fn broadcast_info(hub: &SseHub, message: &str) {
    hub.broadcast(ServerEvent::new(
        Some("info".to_string()),
        message.to_string(),
    ));
}
