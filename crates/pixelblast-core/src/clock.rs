use crate::constants::{TIME_OFFSET_RANGE, TIME_VELOCITY};
use instant::Instant;
use rand::Rng;
use std::time::Duration;

/// Monotonic source for the shader's time uniform.
///
/// `time = offset + elapsed_seconds * TIME_VELOCITY`; the offset is fixed for
/// the lifetime of a session.
#[derive(Clone, Copy, Debug)]
pub struct AnimationClock {
    start: Instant,
    offset: f32,
}

impl AnimationClock {
    pub fn new(start: Instant, offset: f32) -> Self {
        Self { start, offset }
    }

    /// Start at a random point of the field so separate mounts differ.
    pub fn randomized(start: Instant) -> Self {
        let offset = rand::thread_rng().gen_range(0.0..TIME_OFFSET_RANGE);
        Self::new(start, offset)
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        if now > self.start {
            now - self.start
        } else {
            Duration::ZERO
        }
    }

    pub fn time_at(&self, now: Instant) -> f32 {
        self.offset + self.elapsed_at(now).as_secs_f32() * TIME_VELOCITY
    }
}
