pub mod controller;
pub mod game;
mod sse;
pub mod state_machine;
pub mod timer;

use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::content::ContentProvider;

pub use self::controller::GameController;
pub use self::sse::SseHub;
pub use self::state_machine::{AbortError, ApplyError, Plan, PlanError, PlanId, Snapshot};

/// Shared handle cloned into every handler and background task.
pub type SharedState = Arc<AppState>;

/// Capacity of the SSE broadcast channel; one tick per second plus state updates.
const SSE_CAPACITY: usize = 64;

/// Central application state holding the game controller and its side channels.
pub struct AppState {
    sse: SseHub,
    game: Mutex<GameController>,
    content: Arc<dyn ContentProvider>,
    ready_session: Mutex<Option<Uuid>>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(controller: GameController, content: Arc<dyn ContentProvider>) -> SharedState {
        Arc::new(Self {
            sse: SseHub::new(SSE_CAPACITY),
            game: Mutex::new(controller),
            content,
            ready_session: Mutex::new(None),
        })
    }

    /// Broadcast hub used for the SSE stream.
    pub fn sse(&self) -> &SseHub {
        &self.sse
    }

    /// The game controller; one event is processed at a time under this lock.
    pub fn game(&self) -> &Mutex<GameController> {
        &self.game
    }

    /// Provider generating word decks.
    pub fn content(&self) -> Arc<dyn ContentProvider> {
        Arc::clone(&self.content)
    }

    /// Identifier of the "get ready" countdown in progress, if any.
    pub fn ready_session(&self) -> &Mutex<Option<Uuid>> {
        &self.ready_session
    }

    /// Read the controller under the lock and map it to a value.
    pub async fn read_game<R>(&self, f: impl FnOnce(&GameController) -> R) -> R {
        let guard = self.game.lock().await;
        f(&guard)
    }
}
