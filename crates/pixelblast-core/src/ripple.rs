use crate::constants::{MAX_RIPPLES, RIPPLE_INACTIVE};
use glam::Vec2;

/// A recorded pointer press: surface pixel position (origin bottom-left) and
/// the time-uniform value at the moment of the press.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleEvent {
    pub position: Vec2,
    pub time: f32,
}

/// Fixed-capacity ring of ripple origins.
///
/// Writes go round-robin; the oldest slot is overwritten once the ring is
/// full. Slots are never cleared: an old ripple keeps decaying in the shader
/// until it is overwritten.
#[derive(Clone, Debug, Default)]
pub struct RippleBuffer {
    slots: [Option<RippleEvent>; MAX_RIPPLES],
    written: u64,
}

impl RippleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot the next push will write, always in `[0, MAX_RIPPLES)`.
    #[inline]
    pub fn next_slot(&self) -> usize {
        (self.written % MAX_RIPPLES as u64) as usize
    }

    /// Store a ripple and return the slot it landed in.
    pub fn push(&mut self, event: RippleEvent) -> usize {
        let slot = self.next_slot();
        self.slots[slot] = Some(event);
        self.written += 1;
        slot
    }

    /// Total number of pushes since creation.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    pub fn capacity(&self) -> usize {
        MAX_RIPPLES
    }

    pub fn get(&self, slot: usize) -> Option<&RippleEvent> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RippleEvent> {
        self.slots.iter().flatten()
    }

    /// Pack slots as `(x, y, time, 0)`; empty slots carry the inactive sentinel.
    pub fn packed(&self) -> [[f32; 4]; MAX_RIPPLES] {
        let mut out = [[RIPPLE_INACTIVE[0], RIPPLE_INACTIVE[1], 0.0, 0.0]; MAX_RIPPLES];
        for (dst, slot) in out.iter_mut().zip(self.slots.iter()) {
            if let Some(ev) = slot {
                *dst = [ev.position.x, ev.position.y, ev.time, 0.0];
            }
        }
        out
    }
}
