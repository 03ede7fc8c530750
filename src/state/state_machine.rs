use thiserror::Error;
use uuid::Uuid;

/// High-level phases the game can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No game is running; teams and settings can be managed.
    Setup,
    /// One team is acting against the clock.
    TeamTurn(TurnStatus),
    /// The clock ran out; waiting for the next team to get ready.
    RoundEndPending,
    /// The last turn of the last round ended; the winner is known.
    GameOver,
}

/// Whether the countdown of the current turn is ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    /// Countdown running.
    Running,
    /// Countdown on hold.
    Paused,
}

/// Events that can be applied to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// First turn of a new game begins.
    StartGame,
    /// Hold the countdown of the current turn.
    PauseTimer,
    /// Release the countdown of the current turn.
    ResumeTimer,
    /// The countdown reached zero before the final turn.
    TimeUp,
    /// The countdown of the final turn reached zero.
    Finish,
    /// The next team is ready and takes the turn.
    NextTeam,
    /// Back to setup after a finished game, keeping the roster.
    PlayAgain,
    /// Back to setup from anywhere, clearing the session.
    Restart,
    /// The last team left a running game.
    RosterEmptied,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: GamePhase,
    /// The event that cannot be applied from this phase.
    pub event: GameEvent,
}

/// Errors that can occur when planning a state machine transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// A transition is already pending and must be applied or aborted.
    AlreadyPending,
    /// The requested transition is not valid from the current phase.
    InvalidTransition(InvalidTransition),
}

/// Errors that can occur when applying a planned state machine transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// No transition is currently pending.
    NoPending,
    /// Plan ID does not match the pending plan.
    IdMismatch {
        /// Expected plan ID.
        expected: PlanId,
        /// Provided plan ID.
        got: PlanId,
    },
    /// State machine phase changed since the plan was created.
    PhaseMismatch {
        /// Phase when plan was created.
        expected: GamePhase,
        /// Current phase.
        actual: GamePhase,
    },
}

/// Errors that can occur when aborting a planned state machine transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortError {
    /// No transition is currently pending.
    NoPending,
    /// Plan ID does not match the pending plan.
    IdMismatch {
        /// Expected plan ID.
        expected: PlanId,
        /// Provided plan ID.
        got: PlanId,
    },
}

/// Unique identifier for a planned state transition.
pub type PlanId = Uuid;

/// A planned state machine transition that has been validated but not yet applied.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Unique identifier for this plan.
    pub id: PlanId,
    /// Phase the state machine is currently in.
    pub from: GamePhase,
    /// Phase the state machine will transition to.
    pub to: GamePhase,
    /// Event that triggered this transition.
    pub event: GameEvent,
}

/// Snapshot of the current state machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Current phase of the state machine.
    pub phase: GamePhase,
    /// Number of applied transitions.
    pub version: usize,
    /// Sequence number of the current turn (0 before the first one).
    pub turn: u64,
}

/// State machine driving turns, round ends and game over.
#[derive(Debug, Clone)]
pub struct GameStateMachine {
    phase: GamePhase,
    version: usize,
    turn: u64,
    pending: Option<Plan>,
}

impl Default for GameStateMachine {
    fn default() -> Self {
        Self::resume_at(GamePhase::Setup)
    }
}

impl GameStateMachine {
    /// Create a new state machine initialised in the setup phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state machine directly in `phase`, used when restoring a saved session.
    pub fn resume_at(phase: GamePhase) -> Self {
        Self {
            phase,
            version: 0,
            turn: 0,
            pending: None,
        }
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Sequence number of the current turn.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Create a snapshot of the current state machine state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            version: self.version,
            turn: self.turn,
        }
    }

    /// Plan a transition by validating that the event can be applied from the current phase.
    /// Returns a Plan that can later be applied or aborted.
    pub fn plan(&mut self, event: GameEvent) -> Result<Plan, PlanError> {
        if self.pending.is_some() {
            return Err(PlanError::AlreadyPending);
        }

        let next = self
            .compute_transition(event)
            .map_err(PlanError::InvalidTransition)?;

        let plan = Plan {
            id: Uuid::new_v4(),
            from: self.phase,
            to: next,
            event,
        };

        self.pending = Some(plan.clone());

        Ok(plan)
    }

    /// Apply a planned transition, moving the state machine to the next phase.
    /// Returns the new phase after the transition.
    pub fn apply(&mut self, plan_id: PlanId) -> Result<GamePhase, ApplyError> {
        let plan = self.pending.take().ok_or(ApplyError::NoPending)?;

        if plan.id != plan_id {
            let expected_plan_id = plan.id;
            self.pending = Some(plan);
            return Err(ApplyError::IdMismatch {
                expected: expected_plan_id,
                got: plan_id,
            });
        }

        if self.phase != plan.from {
            return Err(ApplyError::PhaseMismatch {
                expected: plan.from,
                actual: self.phase,
            });
        }

        if matches!(plan.event, GameEvent::StartGame | GameEvent::NextTeam) {
            self.turn += 1;
        }
        self.phase = plan.to;
        self.version += 1;

        Ok(self.phase)
    }

    /// Abort a planned transition without applying it, returning the state machine to its previous state.
    pub fn abort(&mut self, plan_id: PlanId) -> Result<(), AbortError> {
        let plan = self.pending.as_ref().ok_or(AbortError::NoPending)?;

        if plan.id != plan_id {
            return Err(AbortError::IdMismatch {
                expected: plan.id,
                got: plan_id,
            });
        }

        self.pending = None;
        Ok(())
    }

    /// Compute a transition from an event if the transition is valid.
    fn compute_transition(&self, event: GameEvent) -> Result<GamePhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (GamePhase::Setup, GameEvent::StartGame) => GamePhase::TeamTurn(TurnStatus::Running),
            (GamePhase::TeamTurn(TurnStatus::Running), GameEvent::PauseTimer) => {
                GamePhase::TeamTurn(TurnStatus::Paused)
            }
            (GamePhase::TeamTurn(TurnStatus::Paused), GameEvent::ResumeTimer) => {
                GamePhase::TeamTurn(TurnStatus::Running)
            }
            (GamePhase::TeamTurn(_), GameEvent::TimeUp) => GamePhase::RoundEndPending,
            (GamePhase::TeamTurn(_), GameEvent::Finish) => GamePhase::GameOver,
            (GamePhase::RoundEndPending, GameEvent::NextTeam) => {
                GamePhase::TeamTurn(TurnStatus::Running)
            }
            (GamePhase::GameOver, GameEvent::PlayAgain) => GamePhase::Setup,
            (_, GameEvent::Restart) => GamePhase::Setup,
            (from, GameEvent::RosterEmptied) if from != GamePhase::Setup => GamePhase::Setup,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(sm: &mut GameStateMachine, event: GameEvent) -> GamePhase {
        let plan = sm.plan(event).unwrap();
        sm.apply(plan.id).unwrap()
    }

    #[test]
    fn emptied_roster_returns_to_setup_only_from_a_game() {
        let mut sm = GameStateMachine::new();
        assert!(sm.plan(GameEvent::RosterEmptied).is_err());

        apply(&mut sm, GameEvent::StartGame);
        assert_eq!(apply(&mut sm, GameEvent::RosterEmptied), GamePhase::Setup);
    }

    #[test]
    fn initial_state_is_setup() {
        let sm = GameStateMachine::new();
        assert_eq!(sm.phase(), GamePhase::Setup);
        assert_eq!(sm.turn(), 0);
    }

    #[test]
    fn full_happy_path_through_game() {
        let mut sm = GameStateMachine::new();

        assert_eq!(
            apply(&mut sm, GameEvent::StartGame),
            GamePhase::TeamTurn(TurnStatus::Running)
        );
        assert_eq!(
            apply(&mut sm, GameEvent::PauseTimer),
            GamePhase::TeamTurn(TurnStatus::Paused)
        );
        assert_eq!(
            apply(&mut sm, GameEvent::ResumeTimer),
            GamePhase::TeamTurn(TurnStatus::Running)
        );
        assert_eq!(apply(&mut sm, GameEvent::TimeUp), GamePhase::RoundEndPending);
        assert_eq!(
            apply(&mut sm, GameEvent::NextTeam),
            GamePhase::TeamTurn(TurnStatus::Running)
        );
        assert_eq!(apply(&mut sm, GameEvent::Finish), GamePhase::GameOver);
        assert_eq!(apply(&mut sm, GameEvent::PlayAgain), GamePhase::Setup);
        assert_eq!(sm.snapshot().version, 7);
    }

    #[test]
    fn turn_sequence_moves_on_new_turns_only() {
        let mut sm = GameStateMachine::new();
        apply(&mut sm, GameEvent::StartGame);
        assert_eq!(sm.turn(), 1);
        apply(&mut sm, GameEvent::PauseTimer);
        apply(&mut sm, GameEvent::TimeUp);
        assert_eq!(sm.turn(), 1);
        apply(&mut sm, GameEvent::NextTeam);
        assert_eq!(sm.turn(), 2);
    }

    #[test]
    fn restart_is_valid_from_every_phase() {
        for phase in [
            GamePhase::Setup,
            GamePhase::TeamTurn(TurnStatus::Running),
            GamePhase::TeamTurn(TurnStatus::Paused),
            GamePhase::RoundEndPending,
            GamePhase::GameOver,
        ] {
            let mut sm = GameStateMachine::resume_at(phase);
            assert_eq!(apply(&mut sm, GameEvent::Restart), GamePhase::Setup);
        }
    }

    #[test]
    fn invalid_transition_returns_error() {
        let mut sm = GameStateMachine::new();
        let err = sm.plan(GameEvent::TimeUp).unwrap_err();
        match err {
            PlanError::InvalidTransition(invalid) => {
                assert_eq!(invalid.from, GamePhase::Setup);
                assert_eq!(invalid.event, GameEvent::TimeUp);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let mut sm = GameStateMachine::resume_at(GamePhase::RoundEndPending);
        assert!(sm.plan(GameEvent::PlayAgain).is_err());
    }

    #[test]
    fn second_plan_is_rejected_until_abort() {
        let mut sm = GameStateMachine::new();
        let plan = sm.plan(GameEvent::StartGame).unwrap();
        assert_eq!(
            sm.plan(GameEvent::StartGame).unwrap_err(),
            PlanError::AlreadyPending
        );
        sm.abort(plan.id).unwrap();
        assert!(sm.pending.is_none());
        assert_eq!(sm.phase(), GamePhase::Setup);
        assert_eq!(sm.turn(), 0);
    }

    #[test]
    fn apply_with_foreign_plan_id_keeps_pending() {
        let mut sm = GameStateMachine::new();
        let plan = sm.plan(GameEvent::StartGame).unwrap();
        let foreign = Uuid::new_v4();
        assert!(matches!(
            sm.apply(foreign),
            Err(ApplyError::IdMismatch { .. })
        ));
        assert_eq!(sm.apply(plan.id).unwrap(), GamePhase::TeamTurn(TurnStatus::Running));
    }
}
