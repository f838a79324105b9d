//! Frame Clock
//!
//! Mode timers count down in elapsed milliseconds. The simulation never reads
//! the wall clock itself; a [`TimeSource`] is injected and [`FrameClock`]
//! turns successive readings into per-frame deltas.

use std::time::Instant;

/// Monotonic millisecond source.
pub trait TimeSource {
    /// Current reading in milliseconds. Only differences are meaningful.
    fn now_ms(&mut self) -> i64;
}

/// Wall-clock source backed by [`Instant`].
#[derive(Debug, Clone)]
pub struct SystemTimeSource {
    start: Instant,
}

impl SystemTimeSource {
    /// Start measuring from now.
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now_ms(&mut self) -> i64 {
        self.start.elapsed().as_millis() as i64
    }
}

/// Hand-driven source for tests and scripted replays.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: i64,
}

impl ManualTimeSource {
    /// Source reading `start` until moved.
    pub fn new(start: i64) -> Self {
        Self { now: start }
    }

    /// Move the reading forward (or backward, for irregular clocks).
    pub fn advance(&mut self, delta_ms: i64) {
        self.now = self.now.wrapping_add(delta_ms);
    }

    /// Jump to an absolute reading.
    pub fn set(&mut self, now_ms: i64) {
        self.now = now_ms;
    }
}

impl TimeSource for ManualTimeSource {
    fn now_ms(&mut self) -> i64 {
        self.now
    }
}

/// Converts time-source readings into non-negative frame deltas.
#[derive(Debug, Clone)]
pub struct FrameClock<T: TimeSource> {
    source: T,
    last: Option<i64>,
}

impl<T: TimeSource> FrameClock<T> {
    /// Wrap a time source. The first delta is zero.
    pub fn new(source: T) -> Self {
        Self { source, last: None }
    }

    /// Milliseconds since the previous call.
    ///
    /// A reading earlier than the previous one yields zero and becomes the new
    /// reference point, so timers never run backward.
    pub fn delta_ms(&mut self) -> i64 {
        let now = self.source.now_ms();
        let delta = match self.last {
            Some(last) => now.saturating_sub(last),
            None => 0,
        };
        self.last = Some(now);
        delta.max(0)
    }

    /// Access the wrapped source.
    pub fn source_mut(&mut self) -> &mut T {
        &mut self.source
    }
}

/// Clamp an externally supplied delta so it never rewinds a timer.
#[inline]
pub fn clamp_delta(delta_ms: i64) -> i64 {
    delta_ms.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_delta_is_zero() {
        let mut clock = FrameClock::new(ManualTimeSource::new(500));
        assert_eq!(clock.delta_ms(), 0);
        clock.source_mut().advance(16);
        assert_eq!(clock.delta_ms(), 16);
    }

    #[test]
    fn test_backward_clock_clamps() {
        let mut clock = FrameClock::new(ManualTimeSource::new(1000));
        clock.delta_ms();
        clock.source_mut().set(900);
        assert_eq!(clock.delta_ms(), 0);
        clock.source_mut().set(950);
        assert_eq!(clock.delta_ms(), 50);
    }

    #[test]
    fn test_clamp_delta() {
        assert_eq!(clamp_delta(-5), 0);
        assert_eq!(clamp_delta(0), 0);
        assert_eq!(clamp_delta(17), 17);
    }
}
