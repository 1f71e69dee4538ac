//! Local timestamps for ping packets.

use std::time::Instant;

/// Hands out strictly increasing millisecond timestamps.
///
/// Based on the monotonic clock, so wall-clock jumps can't make a ping
/// go backwards. Values wrap at `u32::MAX` like the wire field does, and
/// two consecutive calls never return the same value even when they land
/// in the same millisecond.
#[derive(Debug, Clone)]
pub struct PingClock {
    start: Instant,
    last: Option<u32>,
}

impl PingClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last: None,
        }
    }

    /// Returns the next timestamp.
    pub fn next_timestamp(&mut self) -> u32 {
        // Truncation to the 32-bit wire field is intended.
        let elapsed = self.start.elapsed().as_millis() as u32;
        let next = match self.last {
            Some(last) if elapsed.wrapping_sub(last) as i32 <= 0 => last.wrapping_add(1),
            _ => elapsed,
        };
        self.last = Some(next);
        next
    }
}

impl Default for PingClock {
    fn default() -> Self {
        Self::new()
    }
}
