//! Game Session
//!
//! Top-level orchestrator owning the explicit session state, the current
//! level's world, the level source and the frame clock. It walks the game
//! through its levels:
//!
//! ```text
//!   Playing ──level cleared──► LevelTransition ──timeout──► Playing (next level)
//!      │                              │
//!      │ last life lost               └─ no next level ──► Won
//!      ▼
//!   GameOver
//! ```
//!
//! Score, high score and lives carry from one level to the next.

use thiserror::Error;
use tracing::info;

use crate::core::clock::{clamp_delta, FrameClock, SystemTimeSource, TimeSource};
use crate::game::events::{GameEvent, GameEventData, SoundCue};
use crate::game::level::{LevelError, LevelSource};
use crate::game::mode::Mode;
use crate::game::snapshot::RenderSnapshot;
use crate::game::state::{Direction, GameProgress, World};
use crate::game::tick::{tick, ConfigError, SimConfig, TickResult};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// A level is being played.
    Playing,
    /// Level cleared; the next one loads when the countdown ends.
    LevelTransition {
        /// Time left before the next level
        remaining_ms: i64,
    },
    /// Final level cleared.
    Won,
    /// Out of lives.
    GameOver,
}

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The level source has nothing to play.
    #[error("level source is empty")]
    NoLevels,

    /// A level failed to decode.
    #[error("level load failed: {0}")]
    Level(#[from] LevelError),

    /// Configuration is unusable.
    #[error("bad configuration: {0}")]
    Config(#[from] ConfigError),
}

/// A game from the first level to a win or a game over.
pub struct Session<L: LevelSource, T: TimeSource = SystemTimeSource> {
    state: SessionState,
    world: World,
    config: SimConfig,
    levels: L,
    clock: FrameClock<T>,
    pending_events: Vec<GameEvent>,
}

impl<L: LevelSource> Session<L, SystemTimeSource> {
    /// Start a game on level 1, timed by the wall clock.
    pub fn new(levels: L, config: SimConfig) -> Result<Self, SessionError> {
        Self::with_clock(levels, config, SystemTimeSource::new())
    }
}

impl<L: LevelSource, T: TimeSource> Session<L, T> {
    /// Start a game on level 1 with an injected time source.
    pub fn with_clock(levels: L, config: SimConfig, source: T) -> Result<Self, SessionError> {
        config.validate()?;
        if levels.level_count() == 0 {
            return Err(SessionError::NoLevels);
        }

        let progress = GameProgress::new(config.starting_lives);
        let world = load_world(&levels, 1, progress, &config)?;
        let mut session = Self {
            state: SessionState::Playing,
            world,
            config,
            levels,
            clock: FrameClock::new(source),
            pending_events: Vec::new(),
        };
        session.announce_level();
        Ok(session)
    }

    /// Restart from level 1. The high score survives.
    pub fn new_game(&mut self) -> Result<(), SessionError> {
        let mut progress = GameProgress::new(self.config.starting_lives);
        progress.high_score = self.world.progress.high_score;
        self.world = load_world(&self.levels, 1, progress, &self.config)?;
        self.state = SessionState::Playing;
        self.pending_events.clear();
        self.announce_level();
        Ok(())
    }

    /// Advance one frame by `delta_ms`.
    ///
    /// `pressed` is the direction newly pressed this frame, if any.
    pub fn advance(&mut self, delta_ms: i64, pressed: Option<Direction>) -> Result<TickResult, SessionError> {
        let mut result = match self.state {
            SessionState::Playing => self.play(delta_ms, pressed),
            SessionState::LevelTransition { remaining_ms } => {
                let remaining_ms = remaining_ms - clamp_delta(delta_ms);
                if remaining_ms <= 0 {
                    self.next_level()?;
                } else {
                    self.state = SessionState::LevelTransition { remaining_ms };
                }
                TickResult::default()
            }
            SessionState::Won | SessionState::GameOver => TickResult::default(),
        };

        if !self.pending_events.is_empty() {
            let mut events = std::mem::take(&mut self.pending_events);
            events.append(&mut result.events);
            result.events = events;
        }
        result.level_complete = self.world.level_complete;
        result.game_over = self.world.game_over;
        Ok(result)
    }

    /// Advance one frame using the injected clock for the delta.
    pub fn advance_with_clock(&mut self, pressed: Option<Direction>) -> Result<TickResult, SessionError> {
        let delta = self.clock.delta_ms();
        self.advance(delta, pressed)
    }

    fn play(&mut self, delta_ms: i64, pressed: Option<Direction>) -> TickResult {
        let mut result = tick(&mut self.world, delta_ms, pressed, &self.config);

        if result.game_over {
            self.state = SessionState::GameOver;
        } else if result.level_complete {
            let level = self.world.progress.level;
            if level >= self.levels.level_count() {
                let score = self.world.progress.score;
                info!(level, score, "game won");
                self.state = SessionState::Won;
                let tick = self.world.tick;
                result.events.push(GameEvent::new(tick, GameEventData::GameWon { score }));
                result.events.push(GameEvent::sound(tick, SoundCue::Victory));
            } else {
                self.state = SessionState::LevelTransition {
                    remaining_ms: self.config.level_transition_ms,
                };
            }
        }
        result
    }

    fn next_level(&mut self) -> Result<(), SessionError> {
        let number = self.world.progress.level + 1;
        let progress = self.world.progress.clone();
        self.world = load_world(&self.levels, number, progress, &self.config)?;
        self.state = SessionState::Playing;
        self.announce_level();
        Ok(())
    }

    fn announce_level(&mut self) {
        let level = self.world.progress.level;
        self.pending_events.push(GameEvent::sound(0, SoundCue::LevelMusic { level }));
    }

    /// Session lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current score.
    pub fn score(&self) -> u32 {
        self.world.progress.score
    }

    /// Best score this session.
    pub fn high_score(&self) -> u32 {
        self.world.progress.high_score
    }

    /// Lives left.
    pub fn lives(&self) -> u32 {
        self.world.progress.lives
    }

    /// Current 1-based level.
    pub fn level(&self) -> u32 {
        self.world.progress.level
    }

    /// Current global mode.
    pub fn mode(&self) -> Mode {
        self.world.mode()
    }

    /// Render data for the current frame.
    pub fn snapshot(&self) -> RenderSnapshot {
        self.world.snapshot()
    }

    /// The current level's world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Configuration in use.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The injected time source.
    pub fn time_source_mut(&mut self) -> &mut T {
        self.clock.source_mut()
    }
}

fn load_world<L: LevelSource>(
    levels: &L,
    number: u32,
    progress: GameProgress,
    config: &SimConfig,
) -> Result<World, SessionError> {
    let data = levels.level(number)?;
    info!(level = number, width = data.width, height = data.height, "level loaded");
    Ok(World::new(&data, number, progress, config))
}
