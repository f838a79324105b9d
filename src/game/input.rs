//! Input Latch
//!
//! The input collaborator reports at most one newly pressed direction per
//! frame. The latch holds the most recent one as the player's standing intent
//! until another direction is pressed or the latch is reset after a capture.

use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher};
use crate::game::state::Direction;

/// One recorded frame: elapsed time and the newly pressed key, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Milliseconds since the previous frame
    pub delta_ms: i64,
    /// Direction pressed this frame
    pub pressed: Option<Direction>,
}

impl InputFrame {
    /// Frame with a key press.
    pub const fn new(delta_ms: i64, pressed: Option<Direction>) -> Self {
        Self { delta_ms, pressed }
    }

    /// Frame with no key press.
    pub const fn idle(delta_ms: i64) -> Self {
        Self { delta_ms, pressed: None }
    }
}

/// Digest of a recorded input script.
pub fn hash_input_script(frames: &[InputFrame]) -> StateHash {
    let mut hasher = StateHasher::for_input_script();
    hasher.update_u32(frames.len() as u32);
    for frame in frames {
        hasher.update_u64(frame.delta_ms as u64);
        hasher.update_u8(frame.pressed.map_or(0, |d| d as u8 + 1));
    }
    hasher.finalize()
}

/// Last pressed direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLatch {
    held: Option<Direction>,
}

impl InputLatch {
    /// Empty latch.
    pub const fn new() -> Self {
        Self { held: None }
    }

    /// Record this frame's press, if any. `None` keeps the previous intent.
    #[inline]
    pub fn press(&mut self, pressed: Option<Direction>) {
        if let Some(dir) = pressed {
            self.held = Some(dir);
        }
    }

    /// Current intent.
    #[inline]
    pub fn intent(&self) -> Option<Direction> {
        self.held
    }

    /// Forget the held direction.
    #[inline]
    pub fn reset(&mut self) {
        self.held = None;
    }

    /// Stable byte for state hashing (0 = nothing held).
    pub fn hash_byte(&self) -> u8 {
        match self.held {
            None => 0,
            Some(dir) => dir as u8 + 1,
        }
    }
}
