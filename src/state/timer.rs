use std::time::Duration;

/// Identifies one team turn so a late expiry can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnToken {
    /// Turn sequence number handed out by the state machine.
    pub seq: u64,
    /// Round the turn belongs to.
    pub round: u32,
    /// Team acting during the turn.
    pub team_index: usize,
}

/// Countdown driving a team turn.
///
/// Implementations report ticks and a single expiry per started countdown through their own
/// channel; the controller only issues commands.
pub trait TurnTimer: Send + Sync {
    /// Start a countdown of `duration` for `turn`, replacing any running countdown.
    fn start(&self, turn: TurnToken, duration: Duration);
    /// Hold the running countdown.
    fn pause(&self);
    /// Release a held countdown.
    fn resume(&self);
    /// Cancel the countdown without reporting an expiry.
    fn stop(&self);
}

/// Timer that never ticks, for setups driving expiries by hand.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualTimer;

impl TurnTimer for ManualTimer {
    fn start(&self, _turn: TurnToken, _duration: Duration) {}

    fn pause(&self) {}

    fn resume(&self) {}

    fn stop(&self) {}
}
