//! Core deterministic primitives.
//!
//! Fixed-point numbers, vectors, the seeded RNG and state hashing. The frame
//! clock lives here too; it is the only place wall time enters the crate.

pub mod fixed;
pub mod vec2;
pub mod rng;
pub mod hash;
pub mod clock;

// Re-export core types
pub use fixed::{Fixed, FIXED_ONE, FIXED_SCALE, TILE_SIZE};
pub use vec2::{FixedVec2, TilePos};
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash};
pub use clock::{FrameClock, ManualTimeSource, SystemTimeSource, TimeSource};
