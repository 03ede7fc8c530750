use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        game::{GameSummary, TeamSummary},
        sse::{
            PhaseChangedEvent, PromptsLoadingEvent, ReadyCountdownEvent, ServerEvent,
            TimerTickEvent,
        },
    },
    state::{GameController, SharedState, timer::TurnToken},
};

/// Name of the event carrying a full [`GameSummary`].
pub const EVENT_GAME_STATE: &str = "game.state";
const EVENT_PHASE_CHANGED: &str = "phase_changed";
const EVENT_TIMER_TICK: &str = "timer.tick";
const EVENT_READY_COUNTDOWN: &str = "ready.countdown";
const EVENT_PROMPTS_LOADING: &str = "prompts.loading";

/// Broadcast the whole game state.
pub fn broadcast_game_state(state: &SharedState, summary: &GameSummary) {
    send_event(state, EVENT_GAME_STATE, summary);
}

/// Broadcast a gameplay phase change notification.
pub fn broadcast_phase_changed(state: &SharedState, game: &GameController) {
    let data = game.state();
    let team_summary = |name: &str| {
        data.teams
            .iter()
            .position(|team| team.name == name)
            .map(|index| TeamSummary::new(index, &data.teams[index]))
    };

    let payload = PhaseChangedEvent {
        phase: game.phase().into(),
        current_round: data.current_round,
        current_team: data
            .current_team()
            .map(|team| TeamSummary::new(data.current_team_index, team)),
        winning_team: data
            .winning_team
            .as_ref()
            .and_then(|winner| team_summary(&winner.name)),
    };
    send_event(state, EVENT_PHASE_CHANGED, &payload);
}

/// Broadcast the seconds left in a turn.
pub fn broadcast_timer_tick(state: &SharedState, turn: TurnToken, remaining: u64) {
    let payload = TimerTickEvent {
        remaining,
        round: turn.round,
        team_index: turn.team_index,
    };
    send_event(state, EVENT_TIMER_TICK, &payload);
}

/// Broadcast the seconds left before the next team starts.
pub fn broadcast_ready_countdown(
    state: &SharedState,
    remaining: u64,
    next_team: Option<TeamSummary>,
) {
    let payload = ReadyCountdownEvent {
        remaining,
        next_team,
    };
    send_event(state, EVENT_READY_COUNTDOWN, &payload);
}

/// Broadcast the start or the end of a word list request.
pub fn broadcast_prompts_loading(
    state: &SharedState,
    category: &str,
    loading: bool,
    count: Option<usize>,
) {
    let payload = PromptsLoadingEvent {
        loading,
        category: category.to_string(),
        count,
    };
    send_event(state, EVENT_PROMPTS_LOADING, &payload);
}

fn send_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
