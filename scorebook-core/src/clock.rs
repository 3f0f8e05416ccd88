//! Intermission countdown
//!
//! A cancellable one-tick-per-second countdown for timeouts and breaks. It
//! runs as its own tokio task and never touches the ledger, so it cannot
//! interleave with stat writes.
//!
//! ```text
//!  IntermissionClock::start(secs)
//!        │  spawns
//!        ▼
//!  countdown task ── interval tick ──► ClockEvent { remaining, phase }
//!        ▲                                   │ mpsc (unbounded)
//!        │ oneshot cancel                    ▼
//!  cancel() / start() / drop            caller renders MM:SS
//! ```

use crate::config::ClockConfig;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

/// Standard break lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntermissionPreset {
    /// Between games (20:00)
    GameIntermission,
    /// Halftime (10:00)
    Halftime,
    /// Full timeout (1:00)
    FullTimeout,
    /// Half timeout (0:30)
    HalfTimeout,
}

impl IntermissionPreset {
    /// Every preset, longest first
    pub const ALL: [IntermissionPreset; 4] = [
        IntermissionPreset::GameIntermission,
        IntermissionPreset::Halftime,
        IntermissionPreset::FullTimeout,
        IntermissionPreset::HalfTimeout,
    ];

    /// Length in seconds
    pub fn seconds(&self) -> u32 {
        match self {
            IntermissionPreset::GameIntermission => 1200,
            IntermissionPreset::Halftime => 600,
            IntermissionPreset::FullTimeout => 60,
            IntermissionPreset::HalfTimeout => 30,
        }
    }

    /// Short name accepted by [`IntermissionPreset::parse`]
    pub fn name(&self) -> &'static str {
        match self {
            IntermissionPreset::GameIntermission => "intermission",
            IntermissionPreset::Halftime => "halftime",
            IntermissionPreset::FullTimeout => "timeout",
            IntermissionPreset::HalfTimeout => "half-timeout",
        }
    }

    /// Parse a preset name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
    }
}

/// How far a countdown has progressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPhase {
    /// More than half the time left
    Early,
    /// Half or less left
    Midway,
    /// Inside the closing threshold
    Closing,
    /// Time's up
    Expired,
}

/// Phase of a countdown that started at `start` seconds
///
/// The closing threshold is 5 seconds for countdowns of a minute or less and
/// 30 seconds otherwise.
pub fn clock_phase(start: u32, remaining: u32) -> ClockPhase {
    let threshold = if start <= 60 { 5 } else { 30 };
    if remaining == 0 {
        ClockPhase::Expired
    } else if remaining <= threshold {
        ClockPhase::Closing
    } else if u64::from(remaining) * 2 <= u64::from(start) {
        ClockPhase::Midway
    } else {
        ClockPhase::Early
    }
}

/// `MM:SS`
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// One countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockEvent {
    /// Seconds left after this tick
    pub remaining: u32,
    /// Phase after this tick
    pub phase: ClockPhase,
}

struct Countdown {
    cancel: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Runs at most one countdown at a time
pub struct IntermissionClock {
    tick: Duration,
    running: Option<Countdown>,
}

impl IntermissionClock {
    /// Clock with a custom tick length
    pub fn new(tick: Duration) -> Self {
        Self { tick, running: None }
    }

    /// Clock with the configured tick length
    pub fn from_config(config: &ClockConfig) -> Self {
        Self::new(Duration::from_millis(config.tick_ms))
    }

    /// Start counting down from `seconds`, replacing any running countdown
    ///
    /// Must be called from within a tokio runtime. The receiver yields one
    /// event per tick and closes after the expiry event or on cancellation.
    pub fn start(&mut self, seconds: u32) -> mpsc::UnboundedReceiver<ClockEvent> {
        self.cancel();

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let task = tokio::spawn(run_countdown(seconds, self.tick, events_tx, cancel_rx));

        tracing::info!(seconds, clock = %format_clock(seconds), "Countdown started");
        self.running = Some(Countdown {
            cancel: cancel_tx,
            task,
        });
        events_rx
    }

    /// Stop the running countdown; `false` if none was running
    pub fn cancel(&mut self) -> bool {
        match self.running.take() {
            Some(countdown) if !countdown.task.is_finished() => {
                let _ = countdown.cancel.send(());
                tracing::debug!("Countdown cancelled");
                true
            }
            _ => false,
        }
    }

    /// Whether a countdown is still ticking
    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|countdown| !countdown.task.is_finished())
    }
}

async fn run_countdown(
    start: u32,
    tick: Duration,
    events: mpsc::UnboundedSender<ClockEvent>,
    mut cancel: oneshot::Receiver<()>,
) {
    let mut remaining = start;
    if remaining == 0 {
        let _ = events.send(ClockEvent {
            remaining,
            phase: ClockPhase::Expired,
        });
        return;
    }

    let mut ticker = interval_at(Instant::now() + tick, tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            // Explicit cancel, or the clock was dropped
            _ = &mut cancel => break,

            _ = ticker.tick() => {
                remaining -= 1;
                let event = ClockEvent {
                    remaining,
                    phase: clock_phase(start, remaining),
                };
                if events.send(event).is_err() {
                    break;
                }
                if remaining == 0 {
                    tracing::info!("Time's up");
                    break;
                }
            }
        }
    }
}
