//! Game Logic Module
//!
//! All maze simulation code. Deterministic given a seed and an input script.
//!
//! ## Module Structure
//!
//! - `level`: Level data contract and the reference text decoder
//! - `grid`: Static obstacle map
//! - `state`: World, player, pursuer and item state
//! - `input`: Input latch and recorded frames
//! - `mode`: Global mode state machine and its timers
//! - `movement`: Grid-aligned stepping and player steering
//! - `pursuit`: Pursuer target selection and direction choice
//! - `collision`: Box overlap scans
//! - `tick`: Authoritative simulation loop and configuration
//! - `events`: Game events, sound cues and hooks
//! - `snapshot`: Read-only render view

pub mod level;
pub mod grid;
pub mod state;
pub mod input;
pub mod mode;
pub mod movement;
pub mod pursuit;
pub mod collision;
pub mod tick;
pub mod events;
pub mod snapshot;

// Re-export key types
pub use level::{LevelData, LevelError, LevelSource, EmbeddedLevels, TextLevels, TileCode};
pub use state::{World, Direction, PursuerVariant, ItemKind, GameProgress};
pub use input::{InputFrame, InputLatch};
pub use mode::{Mode, Phase, ModeTimings};
pub use tick::{tick, SimConfig, ConfigError, TickResult};
pub use events::{GameEvent, GameEventData, GameHooks, NoHooks, SoundCue};
pub use snapshot::RenderSnapshot;
