//! Game Events
//!
//! Events generated during simulation, in emission order. The presentation
//! layer reacts to them through [`GameHooks`]; audio is requested with
//! [`SoundCue`] events and never awaited.

use serde::{Serialize, Deserialize};

use crate::game::mode::Mode;
use crate::game::state::{ItemKind, PursuerVariant};

/// Audio the presentation layer may play. Fire-and-forget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Background music for a level
    LevelMusic {
        /// 1-based level number
        level: u32,
    },
    /// A pursuer was eaten
    PursuerEaten,
    /// The player was caught
    PlayerCaught,
    /// Out of lives
    GameOver,
    /// Final level cleared
    Victory,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Player consumed an item
    ItemConsumed {
        item_id: u32,
        kind: ItemKind,
        points: u32,
        new_score: u32,
        remaining: u32,
    },

    /// Frightened began (or was re-armed while active)
    FrightenedStarted {
        rearmed: bool,
    },

    /// Frightened ran out
    FrightenedEnded,

    /// Player ate a frightened pursuer
    PursuerEaten {
        pursuer: u8,
        variant: PursuerVariant,
        points: u32,
    },

    /// Eaten pursuer came back to life at its spawn
    PursuerRespawned {
        pursuer: u8,
        variant: PursuerVariant,
    },

    /// Player was caught; the capture animation starts
    PlayerCaptured {
        pursuer: u8,
        variant: PursuerVariant,
    },

    /// Capture finished and a life was taken
    LifeLost {
        lives_left: u32,
    },

    /// Global mode changed
    ModeChanged {
        old_mode: Mode,
        new_mode: Mode,
    },

    /// Last ordinary item eaten
    LevelComplete {
        level: u32,
        score: u32,
    },

    /// No lives left
    GameOver {
        score: u32,
    },

    /// Cleared the final level
    GameWon {
        score: u32,
    },

    /// Play a sound
    Sound(SoundCue),
}

/// A game event stamped with the tick it happened on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Create item consumed event.
    pub fn item_consumed(
        tick: u32,
        item_id: u32,
        kind: ItemKind,
        points: u32,
        new_score: u32,
        remaining: u32,
    ) -> Self {
        Self::new(
            tick,
            GameEventData::ItemConsumed {
                item_id,
                kind,
                points,
                new_score,
                remaining,
            },
        )
    }

    /// Create mode changed event.
    pub fn mode_changed(tick: u32, old_mode: Mode, new_mode: Mode) -> Self {
        Self::new(tick, GameEventData::ModeChanged { old_mode, new_mode })
    }

    /// Create sound cue event.
    pub fn sound(tick: u32, cue: SoundCue) -> Self {
        Self::new(tick, GameEventData::Sound(cue))
    }

    /// Is this a sound request?
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self.data {
            GameEventData::Sound(cue) => Some(cue),
            _ => None,
        }
    }
}

// =============================================================================
// HOOKS
// =============================================================================

/// Callbacks for the surrounding UI/state layer. All default to no-ops.
pub trait GameHooks {
    /// Level cleared.
    fn on_level_complete(&mut self, _level: u32, _score: u32) {}

    /// A life was lost.
    fn on_life_lost(&mut self, _lives_left: u32) {}

    /// Out of lives.
    fn on_game_over(&mut self, _score: u32) {}

    /// Final level cleared.
    fn on_game_won(&mut self, _score: u32) {}

    /// Play a sound. Must not block.
    fn on_sound(&mut self, _cue: SoundCue) {}
}

/// Hooks that ignore everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl GameHooks for NoHooks {}

/// Route one event to the matching hook.
pub fn dispatch_event<H: GameHooks + ?Sized>(event: &GameEvent, hooks: &mut H) {
    match &event.data {
        GameEventData::LevelComplete { level, score } => hooks.on_level_complete(*level, *score),
        GameEventData::LifeLost { lives_left } => hooks.on_life_lost(*lives_left),
        GameEventData::GameOver { score } => hooks.on_game_over(*score),
        GameEventData::GameWon { score } => hooks.on_game_won(*score),
        GameEventData::Sound(cue) => hooks.on_sound(*cue),
        _ => {}
    }
}
