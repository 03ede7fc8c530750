use std::time::Duration;

use tokio::{sync::mpsc, time::sleep};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::game::{GameSummary, TeamSummary},
    error::ServiceError,
    services::{
        sse_events::{
            broadcast_game_state, broadcast_phase_changed, broadcast_prompts_loading,
            broadcast_ready_countdown, broadcast_timer_tick,
        },
        timer::TimerEvent,
    },
    state::{
        GameController, SharedState,
        controller::TimeUpOutcome,
        state_machine::GamePhase,
        timer::TurnToken,
    },
};

/// Length of the "get ready" countdown played before the next team's turn.
pub const READY_COUNTDOWN_SECONDS: u64 = 3;

/// Current game state.
pub async fn get_game(state: &SharedState) -> GameSummary {
    state.read_game(|game| GameSummary::from(game)).await
}

/// Register a team.
pub async fn add_team(state: &SharedState, name: String) -> Result<GameSummary, ServiceError> {
    apply(state, |game| game.add_team(&name).map(drop)).await
}

/// Remove a team.
pub async fn remove_team(state: &SharedState, index: usize) -> Result<GameSummary, ServiceError> {
    apply(state, |game| game.remove_team(index).map(drop)).await
}

/// Correct the score of a team.
pub async fn adjust_score(
    state: &SharedState,
    index: usize,
    delta: i32,
) -> Result<GameSummary, ServiceError> {
    apply(state, |game| game.adjust_score(index, delta).map(drop)).await
}

/// Start a new game.
pub async fn start_game(state: &SharedState) -> Result<GameSummary, ServiceError> {
    apply(state, |game| game.start_game().map(drop)).await
}

/// Score the current prompt.
pub async fn mark_correct(state: &SharedState) -> Result<GameSummary, ServiceError> {
    apply(state, GameController::mark_correct).await
}

/// Skip the current prompt.
pub async fn skip(state: &SharedState, delta: i32) -> Result<GameSummary, ServiceError> {
    apply(state, |game| game.skip(delta)).await
}

/// Show the previous prompt again.
pub async fn previous_prompt(state: &SharedState) -> Result<GameSummary, ServiceError> {
    apply(state, GameController::previous_prompt).await
}

/// Hold the countdown.
pub async fn pause(state: &SharedState) -> Result<GameSummary, ServiceError> {
    apply(state, |game| game.pause().map(drop)).await
}

/// Release the countdown.
pub async fn resume(state: &SharedState) -> Result<GameSummary, ServiceError> {
    apply(state, |game| game.resume().map(drop)).await
}

/// Hand the turn to the next team immediately.
pub async fn next_team(state: &SharedState) -> Result<GameSummary, ServiceError> {
    cancel_ready_countdown(state).await;
    apply(state, |game| game.advance_team().map(drop)).await
}

/// Start the "get ready" countdown; the next team takes the turn when it reaches zero.
pub async fn ready(state: &SharedState) -> Result<GameSummary, ServiceError> {
    let (summary, next_team) = {
        let game = state.game().lock().await;
        if game.phase() != GamePhase::RoundEndPending {
            return Err(ServiceError::InvalidState(format!(
                "no team is waiting to play (phase {:?})",
                game.phase()
            )));
        }
        if game.state().teams.is_empty() {
            return Err(ServiceError::NoTeams);
        }
        (GameSummary::from(&*game), next_team_summary(&game))
    };

    let session = Uuid::new_v4();
    {
        let mut slot = state.ready_session().lock().await;
        if slot.is_some() {
            return Err(ServiceError::InvalidState(
                "a ready countdown is already running".into(),
            ));
        }
        slot.replace(session);
    }

    info!(%session, "ready countdown started");
    tokio::spawn(run_ready_countdown(state.clone(), session, next_team));
    Ok(summary)
}

/// Forget the whole session.
pub async fn restart(state: &SharedState) -> Result<GameSummary, ServiceError> {
    cancel_ready_countdown(state).await;
    apply(state, |game| game.restart().map(drop)).await
}

/// Rematch with the same teams.
pub async fn play_again(state: &SharedState) -> Result<GameSummary, ServiceError> {
    apply(state, |game| game.play_again().map(drop)).await
}

/// Change the number of rounds.
pub async fn set_number_of_rounds(
    state: &SharedState,
    rounds: u32,
) -> Result<GameSummary, ServiceError> {
    apply(state, |game| game.set_number_of_rounds(rounds).map(drop)).await
}

/// Change the turn duration.
pub async fn set_timer_duration(
    state: &SharedState,
    seconds: u32,
    apply_now: bool,
) -> Result<GameSummary, ServiceError> {
    apply(state, |game| {
        game.set_timer_duration(seconds, apply_now).map(drop)
    })
    .await
}

/// Switch the deck back to images.
pub async fn use_image_prompts(state: &SharedState) -> Result<GameSummary, ServiceError> {
    apply(state, |game| {
        game.use_image_prompts();
        Ok(())
    })
    .await
}

/// Generate a word deck for `category`.
///
/// The controller lock is released while the provider works; a provider failure installs an
/// empty deck and a newer request or a restart makes this one a no-op.
pub async fn load_words(state: &SharedState, category: String) -> Result<GameSummary, ServiceError> {
    let category = category.trim().to_string();
    let ticket = {
        let mut game = state.game().lock().await;
        let ticket = game.begin_word_fetch(&category)?;
        broadcast_game_state(state, &GameSummary::from(&*game));
        ticket
    };
    broadcast_prompts_loading(state, &category, true, None);

    let provider = state.content();
    let words = match provider.generate_words(&category).await {
        Ok(words) => words,
        Err(err) => {
            warn!(%category, error = %err, "word generation failed; using an empty deck");
            Vec::new()
        }
    };
    let count = words.len();

    let summary = {
        let mut game = state.game().lock().await;
        if !game.finish_word_fetch(ticket, words) {
            debug!(%category, "word list arrived after being superseded");
        }
        let summary = GameSummary::from(&*game);
        broadcast_game_state(state, &summary);
        summary
    };
    broadcast_prompts_loading(state, &category, false, Some(count));

    Ok(summary)
}

/// Consume countdown events until the timer goes away.
pub async fn run_timer_dispatcher(state: SharedState, mut events: mpsc::UnboundedReceiver<TimerEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            TimerEvent::Tick { turn, remaining } => broadcast_timer_tick(&state, turn, remaining),
            TimerEvent::Expired { turn } => handle_time_up(&state, turn).await,
        }
    }
    debug!("timer dispatcher stopped");
}

/// Apply a turn expiry to the controller and broadcast the outcome.
pub async fn handle_time_up(state: &SharedState, turn: TurnToken) {
    let mut game = state.game().lock().await;
    match game.on_time_up(turn) {
        Ok(TimeUpOutcome::Ignored) => {}
        Ok(outcome) => {
            debug!(?outcome, turn = turn.seq, "turn expired");
            broadcast_phase_changed(state, &game);
            broadcast_game_state(state, &GameSummary::from(&*game));
        }
        Err(err) => warn!(error = %err, turn = turn.seq, "failed to apply turn expiry"),
    }
}

/// Run `f` on the locked controller, then broadcast the new state (and phase when it moved).
async fn apply(
    state: &SharedState,
    f: impl FnOnce(&mut GameController) -> Result<(), ServiceError>,
) -> Result<GameSummary, ServiceError> {
    let mut game = state.game().lock().await;
    let before = game.phase();
    f(&mut *game)?;

    if game.phase() != before {
        broadcast_phase_changed(state, &game);
    }
    let summary = GameSummary::from(&*game);
    broadcast_game_state(state, &summary);
    Ok(summary)
}

fn next_team_summary(game: &GameController) -> Option<TeamSummary> {
    let teams = &game.state().teams;
    if teams.is_empty() {
        return None;
    }
    let index = (game.state().current_team_index + 1) % teams.len();
    Some(TeamSummary::new(index, &teams[index]))
}

async fn ready_session_is(state: &SharedState, session: Uuid) -> bool {
    *state.ready_session().lock().await == Some(session)
}

async fn cancel_ready_countdown(state: &SharedState) {
    if let Some(session) = state.ready_session().lock().await.take() {
        debug!(%session, "ready countdown cancelled");
    }
}

async fn run_ready_countdown(state: SharedState, session: Uuid, next_team: Option<TeamSummary>) {
    for remaining in (1..=READY_COUNTDOWN_SECONDS).rev() {
        if !ready_session_is(&state, session).await {
            return;
        }
        broadcast_ready_countdown(&state, remaining, next_team.clone());
        sleep(Duration::from_secs(1)).await;
    }

    {
        let mut slot = state.ready_session().lock().await;
        if *slot != Some(session) {
            return;
        }
        slot.take();
    }

    broadcast_ready_countdown(&state, 0, next_team);
    if let Err(err) = apply(&state, |game| game.advance_team().map(drop)).await {
        warn!(%session, error = %err, "failed to hand the turn over after the ready countdown");
    }
}
