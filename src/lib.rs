//! # Maze Chase
//!
//! Deterministic simulation core for a maze-chase arcade game: one player
//! collects items on a tile grid while four pursuers hunt it under a timed
//! global mode.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        MAZE CHASE                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── fixed.rs    - Q16.16 fixed-point arithmetic             │
//! │  ├── vec2.rs     - Pixel vectors and tile addresses          │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  ├── hash.rs     - State hashing for verification            │
//! │  └── clock.rs    - Injected time source, frame deltas        │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── level.rs    - Level data and text decoder               │
//! │  ├── grid.rs     - Obstacle map                              │
//! │  ├── state.rs    - World and entity state                    │
//! │  ├── mode.rs     - Global mode state machine                 │
//! │  ├── movement.rs - Grid-aligned movement                     │
//! │  ├── pursuit.rs  - Pursuer AI                                │
//! │  ├── collision.rs- Collision detection                       │
//! │  ├── tick.rs     - Authoritative simulation loop             │
//! │  ├── events.rs   - Events, sound cues, hooks                 │
//! │  └── snapshot.rs - Render view                               │
//! │                                                              │
//! │  session.rs      - Level progression, win / game over        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are deterministic:
//! - No floating-point arithmetic in game logic
//! - Entities live in vectors with a fixed scan order
//! - Wall time only enters through an injected [`TimeSource`]
//! - All randomness from seeded Xorshift128+
//!
//! Given the same levels, seed, frame deltas and key presses, two runs end
//! in **identical state**, checked with [`World::compute_hash`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod session;

// Re-export commonly used types
pub use crate::core::fixed::{Fixed, FIXED_ONE, FIXED_SCALE, TILE_SIZE};
pub use crate::core::vec2::{FixedVec2, TilePos};
pub use crate::core::rng::DeterministicRng;
pub use crate::core::clock::{FrameClock, ManualTimeSource, SystemTimeSource, TimeSource};
pub use game::{
    Direction, EmbeddedLevels, GameEvent, GameEventData, GameHooks, InputFrame, LevelData,
    LevelSource, Mode, RenderSnapshot, SimConfig, SoundCue, TextLevels, TickResult, World,
};
pub use session::{Session, SessionError, SessionState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal frame rate (Hz) for scripted runs
pub const TICK_RATE: u32 = 60;

/// Nominal frame time in milliseconds at [`TICK_RATE`]
pub const FRAME_MS: i64 = 1000 / TICK_RATE as i64;
