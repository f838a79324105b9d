//! Global Mode State Machine
//!
//! Exactly one [`Mode`] is active at a time. Approach and Retreat alternate on
//! their own countdown (the [`Phase`]); Begin, Frightened and Captured are
//! interludes that pause that countdown without touching it.
//!
//! ```text
//!            level load / capture done
//!                     │
//!                     ▼
//!                 ┌───────┐  timeout   ┌──────────┐ timeout ┌─────────┐
//!                 │ Begin │──────────► │ Approach │◄───────►│ Retreat │
//!                 └───────┘  (resume)  └──────────┘         └─────────┘
//!                     ▲                     │ ▲  trigger item   │ ▲
//!                     │                     ▼ │  / timeout      ▼ │
//!                 ┌──────────┐  capture  ┌────────────┐
//!                 │ Captured │◄──────────│ Frightened │
//!                 └──────────┘           └────────────┘
//! ```
//!
//! The controller only keeps time. Side effects (facing flips, immunity,
//! resets) belong to the world and are driven by the returned
//! [`ModeTransition`].

use serde::{Serialize, Deserialize};

use crate::core::clock::clamp_delta;

/// Active global mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Mode {
    /// Frozen intro after level load or capture
    Begin = 0,
    /// Chase phase
    Approach = 1,
    /// Scatter phase
    Retreat = 2,
    /// Pursuers vulnerable
    Frightened = 3,
    /// Player being caught
    Captured = 4,
}

impl Mode {
    /// Do movers run in this mode?
    #[inline]
    pub fn is_active_play(self) -> bool {
        matches!(self, Mode::Approach | Mode::Retreat | Mode::Frightened)
    }
}

/// The Approach/Retreat alternation underneath any interlude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Phase {
    /// Chase
    Approach = 0,
    /// Scatter
    Retreat = 1,
}

impl Phase {
    /// The other phase.
    #[inline]
    pub fn other(self) -> Phase {
        match self {
            Phase::Approach => Phase::Retreat,
            Phase::Retreat => Phase::Approach,
        }
    }

    /// Mode shown while this phase runs uninterrupted.
    #[inline]
    pub fn as_mode(self) -> Mode {
        match self {
            Phase::Approach => Mode::Approach,
            Phase::Retreat => Mode::Retreat,
        }
    }
}

// =============================================================================
// TIMINGS
// =============================================================================

/// Mode durations in milliseconds plus the capture animation pacing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeTimings {
    /// Begin after loading a level
    pub begin_level_ms: i64,
    /// Begin after a capture
    pub begin_restart_ms: i64,
    /// Approach duration on level 1
    pub approach_base_ms: i64,
    /// Approach reduction per level above 1
    pub approach_step_ms: i64,
    /// Approach floor
    pub approach_min_ms: i64,
    /// Retreat duration on level 1
    pub retreat_base_ms: i64,
    /// Retreat reduction per level above 1
    pub retreat_step_ms: i64,
    /// Retreat floor
    pub retreat_min_ms: i64,
    /// Frightened duration
    pub frightened_ms: i64,
    /// Captured duration
    pub captured_ms: i64,
    /// Ticks between capture animation steps
    pub capture_step_ticks: u32,
    /// Minimum time an eaten pursuer stays dead
    pub respawn_ms: i64,
}

impl Default for ModeTimings {
    fn default() -> Self {
        Self {
            begin_level_ms: 3000,
            begin_restart_ms: 1000,
            approach_base_ms: 10_000,
            approach_step_ms: 500,
            approach_min_ms: 5000,
            retreat_base_ms: 10_000,
            retreat_step_ms: 1500,
            retreat_min_ms: 1000,
            frightened_ms: 5000,
            captured_ms: 1500,
            capture_step_ticks: 15,
            respawn_ms: 2000,
        }
    }
}

impl ModeTimings {
    /// Approach duration for a level (1-based).
    pub fn approach_duration(&self, level: u32) -> i64 {
        scaled(self.approach_base_ms, self.approach_step_ms, self.approach_min_ms, level)
    }

    /// Retreat duration for a level (1-based).
    pub fn retreat_duration(&self, level: u32) -> i64 {
        scaled(self.retreat_base_ms, self.retreat_step_ms, self.retreat_min_ms, level)
    }

    /// Duration of a phase on a level.
    pub fn phase_duration(&self, phase: Phase, level: u32) -> i64 {
        match phase {
            Phase::Approach => self.approach_duration(level),
            Phase::Retreat => self.retreat_duration(level),
        }
    }
}

fn scaled(base: i64, step: i64, floor: i64, level: u32) -> i64 {
    let steps = level.saturating_sub(1) as i64;
    base.saturating_sub(step.saturating_mul(steps)).max(floor)
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// A timer expiry reported by [`ModeController::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeTransition {
    /// Begin finished; the paused phase resumed.
    BeginEnded {
        /// Phase now running
        resumed: Phase,
    },
    /// Approach and Retreat swapped.
    PhaseSwitched {
        /// Phase now running
        to: Phase,
    },
    /// Frightened ran out; the paused phase resumed.
    FrightenedEnded {
        /// Phase now running
        resumed: Phase,
    },
    /// Capture animation finished; now in Begin.
    CaptureEnded,
}

/// Countdown-driven global mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeController {
    mode: Mode,
    phase: Phase,
    phase_remaining_ms: i64,
    interlude_remaining_ms: i64,
    level: u32,
    timings: ModeTimings,
}

impl ModeController {
    /// Fresh controller for a level: Begin, with Approach queued at full length.
    pub fn new(level: u32, timings: ModeTimings) -> Self {
        Self {
            mode: Mode::Begin,
            phase: Phase::Approach,
            phase_remaining_ms: timings.approach_duration(level),
            interlude_remaining_ms: timings.begin_level_ms,
            level,
            timings,
        }
    }

    /// Active mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Approach/Retreat phase in progress (possibly paused).
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Remaining time of the current phase.
    #[inline]
    pub fn phase_remaining_ms(&self) -> i64 {
        self.phase_remaining_ms
    }

    /// Remaining time of the active interlude (Begin, Frightened, Captured).
    #[inline]
    pub fn interlude_remaining_ms(&self) -> i64 {
        self.interlude_remaining_ms
    }

    /// Level the durations were scaled for.
    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Timing table in use.
    #[inline]
    pub fn timings(&self) -> &ModeTimings {
        &self.timings
    }

    /// Is Frightened active?
    #[inline]
    pub fn is_frightened(&self) -> bool {
        self.mode == Mode::Frightened
    }

    /// Count down the active timer. Non-positive deltas do nothing.
    ///
    /// At most one transition fires per call; overshoot past an expiry is
    /// dropped rather than carried into the next timer.
    pub fn advance(&mut self, delta_ms: i64) -> Option<ModeTransition> {
        let delta = clamp_delta(delta_ms);
        if delta == 0 {
            return None;
        }

        match self.mode {
            Mode::Begin => {
                self.interlude_remaining_ms -= delta;
                if self.interlude_remaining_ms <= 0 {
                    self.interlude_remaining_ms = 0;
                    self.mode = self.phase.as_mode();
                    return Some(ModeTransition::BeginEnded { resumed: self.phase });
                }
            }
            Mode::Approach | Mode::Retreat => {
                self.phase_remaining_ms -= delta;
                if self.phase_remaining_ms <= 0 {
                    self.phase = self.phase.other();
                    self.phase_remaining_ms = self.timings.phase_duration(self.phase, self.level);
                    self.mode = self.phase.as_mode();
                    return Some(ModeTransition::PhaseSwitched { to: self.phase });
                }
            }
            Mode::Frightened => {
                self.interlude_remaining_ms -= delta;
                if self.interlude_remaining_ms <= 0 {
                    self.interlude_remaining_ms = 0;
                    self.mode = self.phase.as_mode();
                    return Some(ModeTransition::FrightenedEnded { resumed: self.phase });
                }
            }
            Mode::Captured => {
                self.interlude_remaining_ms -= delta;
                if self.interlude_remaining_ms <= 0 {
                    self.mode = Mode::Begin;
                    self.interlude_remaining_ms = self.timings.begin_restart_ms;
                    return Some(ModeTransition::CaptureEnded);
                }
            }
        }
        None
    }

    /// Start (or re-arm) Frightened.
    ///
    /// Returns `true` on a fresh entry, `false` when an active Frightened was
    /// only re-armed to its full duration.
    pub fn enter_frightened(&mut self) -> bool {
        let fresh = self.mode != Mode::Frightened;
        self.mode = Mode::Frightened;
        self.interlude_remaining_ms = self.timings.frightened_ms;
        fresh
    }

    /// Start the capture interlude. Cancels Frightened.
    pub fn enter_captured(&mut self) {
        self.mode = Mode::Captured;
        self.interlude_remaining_ms = self.timings.captured_ms;
    }
}

// =============================================================================
// TESTS
// =============================================================================
