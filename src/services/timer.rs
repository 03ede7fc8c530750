use std::{sync::Mutex, time::Duration};

use tokio::{
    runtime::Handle,
    sync::{mpsc, watch},
    time::{Instant, sleep_until},
};
use tracing::debug;

use crate::state::timer::{TurnTimer, TurnToken};

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Notification emitted by a running countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Seconds left in the turn, sent at start and once per elapsed second.
    Tick {
        /// Turn the countdown belongs to.
        turn: TurnToken,
        /// Whole seconds left.
        remaining: u64,
    },
    /// The countdown reached zero.
    Expired {
        /// Turn the countdown belongs to.
        turn: TurnToken,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Running,
    Paused,
    Cancelled,
}

/// One-second countdown running as a Tokio task per turn.
pub struct CountdownTimer {
    runtime: Handle,
    events: mpsc::UnboundedSender<TimerEvent>,
    control: Mutex<Option<watch::Sender<Control>>>,
}

impl CountdownTimer {
    /// Build a timer spawning its countdowns on `runtime`, with the receiving end of its events.
    pub fn new(runtime: Handle) -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let timer = Self {
            runtime,
            events,
            control: Mutex::new(None),
        };
        (timer, receiver)
    }

    fn send_control(&self, value: Control) {
        let guard = self
            .control
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(control) = guard.as_ref() {
            control.send_if_modified(|current| {
                if *current == Control::Cancelled || *current == value {
                    return false;
                }
                *current = value;
                true
            });
        }
    }
}

impl TurnTimer for CountdownTimer {
    fn start(&self, turn: TurnToken, duration: Duration) {
        let (control, receiver) = watch::channel(Control::Running);
        let previous = self
            .control
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(control);
        if let Some(previous) = previous {
            let _ = previous.send(Control::Cancelled);
        }

        debug!(turn = turn.seq, seconds = duration.as_secs(), "countdown started");
        self.runtime.spawn(run_countdown(
            turn,
            duration.as_secs(),
            receiver,
            self.events.clone(),
        ));
    }

    fn pause(&self) {
        self.send_control(Control::Paused);
    }

    fn resume(&self) {
        self.send_control(Control::Running);
    }

    fn stop(&self) {
        let previous = self
            .control
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(previous) = previous {
            let _ = previous.send(Control::Cancelled);
        }
    }
}

async fn run_countdown(
    turn: TurnToken,
    seconds: u64,
    mut control: watch::Receiver<Control>,
    events: mpsc::UnboundedSender<TimerEvent>,
) {
    let mut remaining = seconds;
    let mut next_tick = Instant::now() + ONE_SECOND;
    // Time left in the current second when the countdown was paused.
    let mut held: Option<Duration> = None;

    if events.send(TimerEvent::Tick { turn, remaining }).is_err() {
        return;
    }

    while remaining > 0 {
        let status = *control.borrow_and_update();
        match status {
            Control::Cancelled => {
                debug!(turn = turn.seq, remaining, "countdown cancelled");
                return;
            }
            Control::Paused => {
                if held.is_none() {
                    held = Some(next_tick.saturating_duration_since(Instant::now()));
                }
                if control.changed().await.is_err() {
                    return;
                }
            }
            Control::Running => {
                if let Some(left) = held.take() {
                    next_tick = Instant::now() + left;
                }
                tokio::select! {
                    _ = sleep_until(next_tick) => {
                        remaining -= 1;
                        next_tick += ONE_SECOND;
                        if events.send(TimerEvent::Tick { turn, remaining }).is_err() {
                            return;
                        }
                    }
                    changed = control.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                }
            }
        }
    }

    let _ = events.send(TimerEvent::Expired { turn });
}
