use std::{sync::Arc, time::Duration};

use tracing::{debug, info, warn};

use crate::{
    dao::{models::GameSnapshotEntity, prompts::PromptSource, snapshot_store::SnapshotStore},
    error::ServiceError,
    state::{
        game::{GameState, PromptDeck, PromptMode, Team, TeamColor},
        state_machine::{GameEvent, GamePhase, GameStateMachine, Snapshot, TurnStatus},
        timer::{TurnTimer, TurnToken},
    },
};

/// Defaults applied to fresh sessions and after a restart.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Colors handed out to teams in insertion order.
    pub palette: Vec<TeamColor>,
    /// Number of rounds of a fresh session.
    pub default_rounds: u32,
    /// Turn duration (seconds) of a fresh session.
    pub default_timer_seconds: u32,
}

/// Handle identifying one word list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone)]
struct PendingFetch {
    ticket: FetchTicket,
    category: String,
}

/// What a turn expiry led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUpOutcome {
    /// The expiry belonged to a turn that is no longer running.
    Ignored,
    /// The turn ended; the next team gets ready.
    RoundEnd,
    /// The final turn ended and a winner is known.
    GameOver,
}

/// Owns the game data and the phase machine, applies every event to completion and
/// saves the session after each mutation.
pub struct GameController {
    state: GameState,
    machine: GameStateMachine,
    store: Arc<dyn SnapshotStore>,
    timer: Arc<dyn TurnTimer>,
    images: Arc<dyn PromptSource>,
    settings: ControllerSettings,
    countdown_armed: bool,
    next_ticket: u64,
    pending_fetch: Option<PendingFetch>,
    persistence_healthy: bool,
}

impl GameController {
    /// Build a controller from the last saved session, or a fresh one when nothing usable is stored.
    pub fn restore(
        store: Arc<dyn SnapshotStore>,
        timer: Arc<dyn TurnTimer>,
        images: Arc<dyn PromptSource>,
        settings: ControllerSettings,
    ) -> Self {
        let mut controller = Self {
            state: fresh_state(&settings),
            machine: GameStateMachine::new(),
            store,
            timer,
            images,
            settings,
            countdown_armed: false,
            next_ticket: 0,
            pending_fetch: None,
            persistence_healthy: true,
        };

        match controller.store.load() {
            Ok(Some(entity)) => {
                let mut state = GameState::from_snapshot(entity);
                if state.is_active && state.teams.is_empty() {
                    warn!("saved session is active without teams; resetting to setup");
                    state.reset_for_rematch();
                }
                let phase = restored_phase(&state);
                info!(
                    ?phase,
                    teams = state.teams.len(),
                    round = state.current_round,
                    "restored saved session"
                );
                controller.state = state;
                controller.machine = GameStateMachine::resume_at(phase);
                if controller.state.prompts.is_empty()
                    && controller.state.prompt_mode == PromptMode::Images
                {
                    controller.install_image_deck();
                }
            }
            Ok(None) => {
                info!("no saved session; starting fresh");
                controller.install_image_deck();
            }
            Err(err) => {
                warn!(error = %err, "failed to restore saved session; starting fresh");
                controller.install_image_deck();
            }
        }

        controller
    }

    /// Current game data.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    /// Phase machine snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.machine.snapshot()
    }

    /// True while a word list request is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending_fetch.is_some()
    }

    /// False once the last save attempt failed.
    pub fn persistence_healthy(&self) -> bool {
        self.persistence_healthy
    }

    /// Prompt shown to the acting team, `None` on an empty deck.
    pub fn current_prompt(&self) -> Option<&str> {
        self.state.prompts.current()
    }

    /// Team currently acting.
    pub fn current_team(&self) -> Option<&Team> {
        self.state.current_team()
    }

    /// Team playing after the current one.
    pub fn next_team(&self) -> Option<&Team> {
        self.state.next_team()
    }

    /// Token of the turn in progress.
    pub fn turn_token(&self) -> TurnToken {
        TurnToken {
            seq: self.machine.turn(),
            round: self.state.current_round,
            team_index: self.state.current_team_index,
        }
    }

    /// Register a team while no game is running.
    pub fn add_team(&mut self, name: &str) -> Result<Team, ServiceError> {
        let team = self.state.add_team(name, &self.settings.palette)?.clone();
        info!(team = %team.name, color = %team.color.name, "team added");
        self.persist();
        Ok(team)
    }

    /// Remove a team at any time; removing the last team of a running game ends it.
    pub fn remove_team(&mut self, index: usize) -> Result<Team, ServiceError> {
        let team = self.state.remove_team(index)?;
        info!(team = %team.name, index, "team removed");

        if self.state.teams.is_empty() && self.machine.phase() != GamePhase::Setup {
            self.timer.stop();
            self.countdown_armed = false;
            self.run_transition(GameEvent::RosterEmptied, |state| {
                state.reset_for_rematch();
                Ok(())
            })?;
            info!("last team removed; back to setup");
        }

        self.persist();
        Ok(team)
    }

    /// Manually correct the score of a team.
    pub fn adjust_score(&mut self, index: usize, delta: i32) -> Result<Team, ServiceError> {
        let team = self.state.adjust_score(index, delta)?.clone();
        debug!(team = %team.name, delta, score = team.score, "score adjusted");
        self.persist();
        Ok(team)
    }

    /// Start the first turn of a new game.
    pub fn start_game(&mut self) -> Result<GamePhase, ServiceError> {
        if self.state.teams.is_empty() {
            return Err(ServiceError::NoTeams);
        }

        let (_, phase) = self.run_transition(GameEvent::StartGame, |state| {
            state.is_active = true;
            state.is_over = false;
            state.winning_team = None;
            state.current_round = 1;
            state.current_team_index = 0;
            state.round_score = 0;
            state.awaiting_next_team = false;
            state.prompts.rewind();
            Ok(())
        })?;

        self.start_countdown();
        info!(
            teams = self.state.teams.len(),
            rounds = self.state.number_of_rounds,
            "game started"
        );
        self.persist();
        Ok(phase)
    }

    /// The acting team found the prompt: one point and the next prompt.
    pub fn mark_correct(&mut self) -> Result<(), ServiceError> {
        self.score_and_advance(1)
    }

    /// Move to the next prompt, applying `delta` (usually 0 or -1) to the acting team.
    pub fn skip(&mut self, delta: i32) -> Result<(), ServiceError> {
        self.score_and_advance(delta)
    }

    /// Show the previous prompt again without touching scores.
    pub fn previous_prompt(&mut self) -> Result<(), ServiceError> {
        self.ensure_prompt_actions()?;
        self.state.prompts.back();
        self.persist();
        Ok(())
    }

    /// Hold the countdown.
    pub fn pause(&mut self) -> Result<GamePhase, ServiceError> {
        let (_, phase) = self.run_transition(GameEvent::PauseTimer, |_| Ok(()))?;
        self.timer.pause();
        Ok(phase)
    }

    /// Release the countdown; a restored turn gets a fresh countdown.
    pub fn resume(&mut self) -> Result<GamePhase, ServiceError> {
        let (_, phase) = self.run_transition(GameEvent::ResumeTimer, |_| Ok(()))?;
        if self.countdown_armed {
            self.timer.resume();
        } else {
            self.start_countdown();
        }
        Ok(phase)
    }

    /// React to the countdown of `turn` reaching zero.
    pub fn on_time_up(&mut self, turn: TurnToken) -> Result<TimeUpOutcome, ServiceError> {
        let current = self.turn_token();
        if !matches!(self.machine.phase(), GamePhase::TeamTurn(_)) || turn.seq != current.seq {
            debug!(
                expired = turn.seq,
                current = current.seq,
                phase = ?self.machine.phase(),
                "ignoring stale turn expiry"
            );
            return Ok(TimeUpOutcome::Ignored);
        }

        self.timer.stop();
        self.countdown_armed = false;

        let outcome = if self.state.is_final_turn() {
            self.run_transition(GameEvent::Finish, |state| {
                state.is_over = true;
                state.awaiting_next_team = false;
                state.winning_team = state.leader().cloned();
                Ok(())
            })?;
            info!(
                winner = self.state.winning_team.as_ref().map(|team| team.name.as_str()),
                "game over"
            );
            TimeUpOutcome::GameOver
        } else {
            self.run_transition(GameEvent::TimeUp, |state| {
                state.awaiting_next_team = true;
                Ok(())
            })?;
            debug!(
                round = self.state.current_round,
                team_index = self.state.current_team_index,
                "turn ended"
            );
            TimeUpOutcome::RoundEnd
        };

        self.persist();
        Ok(outcome)
    }

    /// Hand the turn to the next team, rolling into a new round after the last one.
    pub fn advance_team(&mut self) -> Result<GamePhase, ServiceError> {
        let (_, phase) = self.run_transition(GameEvent::NextTeam, |state| {
            if state.teams.is_empty() {
                return Err(ServiceError::NoTeams);
            }
            state.rotate_team();
            state.prompts.advance();
            state.awaiting_next_team = false;
            Ok(())
        })?;

        self.start_countdown();
        debug!(
            round = self.state.current_round,
            team_index = self.state.current_team_index,
            "next team up"
        );
        self.persist();
        Ok(phase)
    }

    /// Forget the whole session: roster, scores, settings and deck.
    pub fn restart(&mut self) -> Result<GamePhase, ServiceError> {
        self.timer.stop();
        self.countdown_armed = false;
        self.pending_fetch = None;

        let settings = self.settings.clone();
        let (_, phase) = self.run_transition(GameEvent::Restart, |state| {
            *state = fresh_state(&settings);
            Ok(())
        })?;
        self.install_image_deck();
        self.clear_saved();
        info!("game restarted");
        Ok(phase)
    }

    /// Rematch with the same roster and scores after a finished game.
    pub fn play_again(&mut self) -> Result<GamePhase, ServiceError> {
        let (_, phase) = self.run_transition(GameEvent::PlayAgain, |state| {
            state.reset_for_rematch();
            Ok(())
        })?;
        self.clear_saved();
        info!(teams = self.state.teams.len(), "rematch prepared");
        self.persist();
        Ok(phase)
    }

    /// Change the number of rounds of the next game.
    pub fn set_number_of_rounds(&mut self, rounds: u32) -> Result<u32, ServiceError> {
        if self.state.is_active {
            return Err(ServiceError::InvalidState(
                "the number of rounds cannot change while a game is active".into(),
            ));
        }
        let rounds = self.state.set_number_of_rounds(rounds);
        self.persist();
        Ok(rounds)
    }

    /// Change the turn duration; `apply_now` restarts the countdown of the turn in progress.
    pub fn set_timer_duration(&mut self, seconds: u32, apply_now: bool) -> Result<u32, ServiceError> {
        self.state.timer_duration = seconds.max(1);
        if apply_now {
            match self.machine.phase() {
                GamePhase::TeamTurn(TurnStatus::Running) => self.start_countdown(),
                GamePhase::TeamTurn(TurnStatus::Paused) => {
                    self.start_countdown();
                    self.timer.pause();
                }
                _ => {}
            }
        }
        self.persist();
        Ok(self.state.timer_duration)
    }

    /// Mark a word list request for `category` as in flight, superseding any previous one.
    pub fn begin_word_fetch(&mut self, category: &str) -> Result<FetchTicket, ServiceError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(ServiceError::InvalidInput("category must not be empty".into()));
        }

        self.next_ticket += 1;
        let ticket = FetchTicket(self.next_ticket);
        if let Some(previous) = self.pending_fetch.replace(PendingFetch {
            ticket,
            category: category.to_string(),
        }) {
            debug!(category = %previous.category, "superseding pending word fetch");
        }
        Ok(ticket)
    }

    /// Install the words fetched for `ticket`; returns false when the ticket was superseded.
    pub fn finish_word_fetch(&mut self, ticket: FetchTicket, words: Vec<String>) -> bool {
        let Some(pending) = self.pending_fetch.take_if(|pending| pending.ticket == ticket) else {
            debug!(?ticket, "ignoring superseded word fetch");
            return false;
        };

        info!(category = %pending.category, words = words.len(), "word deck installed");
        self.state.prompts = PromptDeck::shuffled(words);
        self.state.prompt_mode = PromptMode::Words {
            category: pending.category,
        };
        self.persist();
        true
    }

    /// Go back to the image deck, cancelling any pending word request.
    pub fn use_image_prompts(&mut self) {
        self.pending_fetch = None;
        self.install_image_deck();
        self.persist();
    }

    fn score_and_advance(&mut self, delta: i32) -> Result<(), ServiceError> {
        self.ensure_prompt_actions()?;
        let index = self.state.current_team_index;
        if self.state.teams.is_empty() {
            return Err(ServiceError::NoTeams);
        }
        self.state.adjust_score(index, delta)?;
        self.state.prompts.advance();
        self.persist();
        Ok(())
    }

    fn ensure_prompt_actions(&self) -> Result<(), ServiceError> {
        if !matches!(self.machine.phase(), GamePhase::TeamTurn(_)) {
            return Err(ServiceError::InvalidState(format!(
                "prompt actions need a running turn (phase {:?})",
                self.machine.phase()
            )));
        }
        self.ensure_not_loading()
    }

    fn ensure_not_loading(&self) -> Result<(), ServiceError> {
        if self.is_loading() {
            return Err(ServiceError::Loading);
        }
        Ok(())
    }

    /// Plan `event`, run `work` on the game data, then apply or abort the plan.
    fn run_transition<T>(
        &mut self,
        event: GameEvent,
        work: impl FnOnce(&mut GameState) -> Result<T, ServiceError>,
    ) -> Result<(T, GamePhase), ServiceError> {
        let plan = self.machine.plan(event)?;
        match work(&mut self.state) {
            Ok(value) => {
                let next = self.machine.apply(plan.id)?;
                Ok((value, next))
            }
            Err(err) => {
                if let Err(abort_err) = self.machine.abort(plan.id) {
                    warn!(
                        ?event,
                        plan_id = %plan.id,
                        error = ?abort_err,
                        "failed to abort transition after work error"
                    );
                }
                Err(err)
            }
        }
    }

    fn start_countdown(&mut self) {
        let turn = self.turn_token();
        self.timer.start(
            turn,
            Duration::from_secs(u64::from(self.state.timer_duration)),
        );
        self.countdown_armed = true;
    }

    fn install_image_deck(&mut self) {
        let items = match self.images.list() {
            Ok(items) => items,
            Err(err) => {
                warn!(error = %err, "failed to list image prompts; using an empty deck");
                Vec::new()
            }
        };
        self.state.prompts = PromptDeck::shuffled(items);
        self.state.prompt_mode = PromptMode::Images;
    }

    fn persist(&mut self) {
        let snapshot = GameSnapshotEntity::from(&self.state);
        match self.store.save(&snapshot) {
            Ok(()) => self.persistence_healthy = true,
            Err(err) => {
                warn!(error = %err, "failed to save game snapshot");
                self.persistence_healthy = false;
            }
        }
    }

    fn clear_saved(&mut self) {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear saved game snapshot");
            self.persistence_healthy = false;
        }
    }
}

fn fresh_state(settings: &ControllerSettings) -> GameState {
    GameState::with_settings(settings.default_rounds, settings.default_timer_seconds)
}

fn restored_phase(state: &GameState) -> GamePhase {
    if !state.is_active {
        GamePhase::Setup
    } else if state.is_over {
        GamePhase::GameOver
    } else if state.awaiting_next_team {
        GamePhase::RoundEndPending
    } else {
        GamePhase::TeamTurn(TurnStatus::Paused)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::dao::{prompts::StaticPrompts, snapshot_store::MemorySnapshotStore};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum TimerCall {
        Start(TurnToken, Duration),
        Pause,
        Resume,
        Stop,
    }

    #[derive(Default)]
    struct RecordingTimer {
        calls: Mutex<Vec<TimerCall>>,
    }

    impl RecordingTimer {
        fn calls(&self) -> Vec<TimerCall> {
            self.calls.lock().unwrap().clone()
        }

        fn last_start(&self) -> Option<(TurnToken, Duration)> {
            self.calls().into_iter().rev().find_map(|call| match call {
                TimerCall::Start(token, duration) => Some((token, duration)),
                _ => None,
            })
        }
    }

    impl TurnTimer for RecordingTimer {
        fn start(&self, turn: TurnToken, duration: Duration) {
            self.calls.lock().unwrap().push(TimerCall::Start(turn, duration));
        }

        fn pause(&self) {
            self.calls.lock().unwrap().push(TimerCall::Pause);
        }

        fn resume(&self) {
            self.calls.lock().unwrap().push(TimerCall::Resume);
        }

        fn stop(&self) {
            self.calls.lock().unwrap().push(TimerCall::Stop);
        }
    }

    struct Harness {
        controller: GameController,
        store: Arc<MemorySnapshotStore>,
        timer: Arc<RecordingTimer>,
    }

    fn settings() -> ControllerSettings {
        ControllerSettings {
            palette: vec![
                TeamColor {
                    hex: "#8b5cf6".into(),
                    name: "Purple Haze".into(),
                },
                TeamColor {
                    hex: "#06b6d4".into(),
                    name: "Ocean Blue".into(),
                },
            ],
            default_rounds: 3,
            default_timer_seconds: 60,
        }
    }

    fn images() -> Arc<StaticPrompts> {
        Arc::new(StaticPrompts(
            (1..=5).map(|i| format!("/images/{i}.png")).collect(),
        ))
    }

    fn harness_with(store: MemorySnapshotStore) -> Harness {
        let store = Arc::new(store);
        let timer = Arc::new(RecordingTimer::default());
        let controller =
            GameController::restore(store.clone(), timer.clone(), images(), settings());
        Harness {
            controller,
            store,
            timer,
        }
    }

    fn harness(teams: &[&str]) -> Harness {
        let mut harness = harness_with(MemorySnapshotStore::new());
        for name in teams {
            harness.controller.add_team(name).unwrap();
        }
        harness
    }

    fn expire(controller: &mut GameController) -> TimeUpOutcome {
        let token = controller.turn_token();
        controller.on_time_up(token).unwrap()
    }

    #[test]
    fn two_teams_two_rounds_end_with_a_winner() {
        let Harness {
            mut controller,
            timer,
            ..
        } = harness(&["A", "B"]);
        controller.set_number_of_rounds(2).unwrap();

        controller.start_game().unwrap();
        assert_eq!(controller.phase(), GamePhase::TeamTurn(TurnStatus::Running));
        assert_eq!(controller.current_team().unwrap().name, "A");
        controller.mark_correct().unwrap();

        let expected = [
            ("B", 1),
            ("A", 2),
            ("B", 2),
        ];
        for (team, round) in expected {
            assert_eq!(expire(&mut controller), TimeUpOutcome::RoundEnd);
            assert_eq!(controller.phase(), GamePhase::RoundEndPending);
            controller.advance_team().unwrap();
            assert_eq!(controller.current_team().unwrap().name, team);
            assert_eq!(controller.state().current_round, round);
            assert_eq!(controller.state().round_score, 0);
        }

        controller.mark_correct().unwrap();
        controller.mark_correct().unwrap();
        assert_eq!(expire(&mut controller), TimeUpOutcome::GameOver);
        assert_eq!(controller.phase(), GamePhase::GameOver);
        assert!(controller.state().is_over);
        assert_eq!(controller.state().winning_team.as_ref().unwrap().name, "B");

        let starts = timer
            .calls()
            .into_iter()
            .filter(|call| matches!(call, TimerCall::Start(..)))
            .count();
        assert_eq!(starts, 4);
    }

    #[test]
    fn starting_without_teams_is_rejected() {
        let Harness { mut controller, .. } = harness(&[]);
        assert!(matches!(controller.start_game(), Err(ServiceError::NoTeams)));
        assert_eq!(controller.phase(), GamePhase::Setup);
        assert!(!controller.state().is_active);
    }

    #[test]
    fn prompt_advances_once_whatever_the_delta() {
        let Harness { mut controller, .. } = harness(&["A", "B"]);
        controller.start_game().unwrap();

        controller.skip(-1).unwrap();
        assert_eq!(controller.state().prompts.cursor(), 1);
        assert_eq!(controller.state().teams[0].score, 0);

        controller.mark_correct().unwrap();
        controller.skip(0).unwrap();
        assert_eq!(controller.state().prompts.cursor(), 3);
        assert_eq!(controller.state().teams[0].score, 1);
        assert_eq!(controller.state().round_score, 1);

        controller.previous_prompt().unwrap();
        assert_eq!(controller.state().prompts.cursor(), 2);
        assert_eq!(controller.state().teams[0].score, 1);
    }

    #[test]
    fn deck_wraps_without_reshuffling() {
        let Harness { mut controller, .. } = harness(&["A"]);
        controller.start_game().unwrap();
        let order = controller.state().prompts.items().to_vec();

        for _ in 0..order.len() {
            controller.skip(0).unwrap();
        }
        assert_eq!(controller.state().prompts.cursor(), 0);
        assert_eq!(controller.state().prompts.items(), order.as_slice());
    }

    #[test]
    fn prompt_actions_need_a_turn() {
        let Harness { mut controller, .. } = harness(&["A"]);
        assert!(matches!(
            controller.mark_correct(),
            Err(ServiceError::InvalidState(_))
        ));
        assert!(matches!(
            controller.previous_prompt(),
            Err(ServiceError::InvalidState(_))
        ));
    }

    #[test]
    fn stale_expiry_is_a_no_op() {
        let Harness { mut controller, .. } = harness(&["A", "B"]);
        controller.start_game().unwrap();
        let first_turn = controller.turn_token();

        assert_eq!(
            controller.on_time_up(first_turn).unwrap(),
            TimeUpOutcome::RoundEnd
        );
        assert_eq!(
            controller.on_time_up(first_turn).unwrap(),
            TimeUpOutcome::Ignored
        );

        controller.advance_team().unwrap();
        assert_eq!(
            controller.on_time_up(first_turn).unwrap(),
            TimeUpOutcome::Ignored
        );
        assert_eq!(controller.phase(), GamePhase::TeamTurn(TurnStatus::Running));
    }

    #[test]
    fn pause_and_resume_drive_the_timer() {
        let Harness {
            mut controller,
            timer,
            ..
        } = harness(&["A"]);
        controller.start_game().unwrap();
        controller.pause().unwrap();
        assert!(controller.pause().is_err());
        controller.resume().unwrap();

        let calls = timer.calls();
        assert_eq!(calls[calls.len() - 2..], [TimerCall::Pause, TimerCall::Resume]);
    }

    #[test]
    fn timer_change_applies_now_only_on_request() {
        let Harness {
            mut controller,
            timer,
            ..
        } = harness(&["A"]);
        controller.start_game().unwrap();

        controller.set_timer_duration(30, false).unwrap();
        assert_eq!(timer.last_start().unwrap().1, Duration::from_secs(60));

        controller.set_timer_duration(45, true).unwrap();
        let (token, duration) = timer.last_start().unwrap();
        assert_eq!(duration, Duration::from_secs(45));
        assert_eq!(token, controller.turn_token());
    }

    #[test]
    fn rounds_are_locked_during_a_game() {
        let Harness { mut controller, .. } = harness(&["A"]);
        assert_eq!(controller.set_number_of_rounds(12).unwrap(), 10);
        controller.start_game().unwrap();
        assert!(matches!(
            controller.set_number_of_rounds(4),
            Err(ServiceError::InvalidState(_))
        ));
    }

    #[test]
    fn loading_blocks_scoring_and_superseded_tickets_are_ignored() {
        let Harness { mut controller, .. } = harness(&["A"]);
        controller.start_game().unwrap();

        let first = controller.begin_word_fetch("animals").unwrap();
        assert!(matches!(controller.mark_correct(), Err(ServiceError::Loading)));

        let second = controller.begin_word_fetch("movies").unwrap();
        assert!(!controller.finish_word_fetch(first, vec!["cat".into()]));
        assert!(controller.is_loading());

        assert!(controller.finish_word_fetch(second, vec!["Jaws".into(), "Up".into()]));
        assert!(!controller.is_loading());
        assert_eq!(
            controller.state().prompt_mode,
            PromptMode::Words {
                category: "movies".into()
            }
        );
        assert_eq!(controller.state().prompts.len(), 2);
        controller.mark_correct().unwrap();
    }

    #[test]
    fn failed_fetch_leaves_an_empty_deck() {
        let Harness { mut controller, .. } = harness(&["A"]);
        let ticket = controller.begin_word_fetch("sports").unwrap();
        assert!(controller.finish_word_fetch(ticket, Vec::new()));
        assert_eq!(controller.current_prompt(), None);

        controller.use_image_prompts();
        assert_eq!(controller.state().prompt_mode, PromptMode::Images);
        assert_eq!(controller.state().prompts.len(), 5);
    }

    #[test]
    fn restart_clears_snapshot_and_roster() {
        let Harness {
            mut controller,
            store,
            timer,
        } = harness(&["A", "B"]);
        controller.set_timer_duration(20, false).unwrap();
        controller.start_game().unwrap();
        let ticket = controller.begin_word_fetch("food").unwrap();
        assert!(store.raw().is_some());

        controller.restart().unwrap();
        assert_eq!(controller.phase(), GamePhase::Setup);
        assert!(controller.state().teams.is_empty());
        assert_eq!(controller.state().timer_duration, 60);
        assert_eq!(controller.state().prompts.len(), 5);
        assert!(store.raw().is_none());
        assert_eq!(timer.calls().last(), Some(&TimerCall::Stop));
        assert!(!controller.finish_word_fetch(ticket, vec!["pizza".into()]));
    }

    #[test]
    fn play_again_keeps_roster_and_scores() {
        let Harness {
            mut controller,
            store,
            ..
        } = harness(&["A", "B"]);
        controller.set_number_of_rounds(2).unwrap();
        controller.start_game().unwrap();
        assert!(controller.play_again().is_err());

        controller.mark_correct().unwrap();
        for _ in 0..3 {
            expire(&mut controller);
            controller.advance_team().unwrap();
        }
        assert_eq!(expire(&mut controller), TimeUpOutcome::GameOver);

        controller.play_again().unwrap();
        assert_eq!(controller.phase(), GamePhase::Setup);
        assert_eq!(controller.state().teams.len(), 2);
        assert_eq!(controller.state().teams[0].score, 1);
        assert_eq!(controller.state().current_round, 1);
        assert!(controller.state().winning_team.is_none());

        let saved = GameSnapshotEntity::from_json(&store.raw().unwrap()).unwrap();
        assert!(!saved.is_active);
        assert_eq!(saved.teams.len(), 2);
    }

    #[test]
    fn restore_resumes_a_turn_paused() {
        let Harness {
            mut controller,
            store,
            ..
        } = harness(&["A", "B"]);
        controller.start_game().unwrap();
        controller.mark_correct().unwrap();
        let raw = store.raw().unwrap();

        let Harness {
            controller: mut restored,
            timer,
            ..
        } = harness_with(MemorySnapshotStore::with_raw(raw));
        assert_eq!(restored.phase(), GamePhase::TeamTurn(TurnStatus::Paused));
        assert_eq!(restored.state(), controller.state());

        restored.resume().unwrap();
        assert!(matches!(timer.calls().last(), Some(TimerCall::Start(..))));
    }

    #[test]
    fn restore_maps_flags_to_phases() {
        let Harness {
            mut controller,
            store,
            ..
        } = harness(&["A", "B"]);
        controller.start_game().unwrap();
        expire(&mut controller);

        let restored = harness_with(MemorySnapshotStore::with_raw(store.raw().unwrap()));
        assert_eq!(restored.controller.phase(), GamePhase::RoundEndPending);

        let restored = harness_with(MemorySnapshotStore::with_raw("{ not json"));
        assert_eq!(restored.controller.phase(), GamePhase::Setup);
        assert!(restored.controller.state().teams.is_empty());
        assert_eq!(restored.controller.state().prompts.len(), 5);
    }

    #[test]
    fn restore_keeps_a_finished_game_and_its_winner() {
        let Harness {
            mut controller,
            store,
            ..
        } = harness(&["A", "B"]);
        controller.set_number_of_rounds(2).unwrap();
        controller.start_game().unwrap();
        expire(&mut controller);
        controller.advance_team().unwrap();
        controller.mark_correct().unwrap();
        expire(&mut controller);
        controller.advance_team().unwrap();
        expire(&mut controller);
        controller.advance_team().unwrap();
        assert_eq!(expire(&mut controller), TimeUpOutcome::GameOver);

        let restored = harness_with(MemorySnapshotStore::with_raw(store.raw().unwrap()));
        assert_eq!(restored.controller.phase(), GamePhase::GameOver);
        assert_eq!(restored.controller.state(), controller.state());
        assert_eq!(
            restored
                .controller
                .state()
                .winning_team
                .as_ref()
                .map(|team| team.name.as_str()),
            Some("B")
        );
    }

    #[test]
    fn game_can_start_while_words_load() {
        let Harness { mut controller, .. } = harness(&["A"]);
        let ticket = controller.begin_word_fetch("animals").unwrap();

        assert_eq!(
            controller.start_game().unwrap(),
            GamePhase::TeamTurn(TurnStatus::Running)
        );
        assert!(matches!(controller.mark_correct(), Err(ServiceError::Loading)));
        assert!(matches!(controller.skip(0), Err(ServiceError::Loading)));

        assert!(controller.finish_word_fetch(ticket, vec!["cat".into(), "dog".into()]));
        controller.mark_correct().unwrap();
        assert_eq!(controller.state().teams[0].score, 1);
    }

    #[test]
    fn removing_every_team_ends_the_game_like_a_restore_would() {
        let Harness {
            mut controller,
            store,
            timer,
        } = harness(&["A"]);
        controller.start_game().unwrap();

        controller.remove_team(0).unwrap();
        assert_eq!(controller.phase(), GamePhase::Setup);
        assert!(!controller.state().is_active);
        assert_eq!(timer.calls().last(), Some(&TimerCall::Stop));

        let restored = harness_with(MemorySnapshotStore::with_raw(store.raw().unwrap()));
        assert_eq!(restored.controller.phase(), controller.phase());
        assert_eq!(restored.controller.state(), controller.state());

        controller.add_team("B").unwrap();
        controller.start_game().unwrap();
    }

    #[test]
    fn removing_a_team_from_a_populated_game_keeps_playing() {
        let Harness { mut controller, .. } = harness(&["A", "B"]);
        controller.start_game().unwrap();
        controller.remove_team(1).unwrap();
        assert_eq!(controller.phase(), GamePhase::TeamTurn(TurnStatus::Running));
        assert!(controller.state().is_active);
    }
}
