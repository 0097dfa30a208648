//! Cancellable, self-rescheduling frame loop.
//!
//! The loop owns a [`FrameScheduler`] that asks the platform for exactly one
//! callback per display refresh. Each callback runs the frame body and, unless
//! the body asks to stop, requests the next one. Cancellation is idempotent
//! and a callback that still fires after it does nothing.

/// Platform hook for "call me on the next display refresh".
pub trait FrameScheduler {
    type Handle: Copy;

    /// Request one callback. `None` when the platform refused.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// What the frame body wants the loop to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Stop,
}

pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<S::Handle>,
    cancelled: bool,
    ticks: u64,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            cancelled: false,
            ticks: 0,
        }
    }

    /// Request the first frame, or re-arm a stalled loop. No-op once
    /// cancelled or already pending.
    pub fn start(&mut self) {
        if self.cancelled || self.pending.is_some() {
            return;
        }
        self.pending = self.scheduler.request_frame();
        if self.pending.is_none() {
            log::warn!("frame scheduler refused the first frame");
        }
    }

    /// Entry point for the platform callback. Returns whether `body` ran.
    pub fn on_frame<F>(&mut self, body: F) -> bool
    where
        F: FnOnce() -> FrameControl,
    {
        if self.cancelled {
            return false;
        }
        self.pending = None;
        self.ticks += 1;
        match body() {
            FrameControl::Continue => {
                if !self.cancelled {
                    self.pending = self.scheduler.request_frame();
                    if self.pending.is_none() {
                        log::warn!("frame scheduler refused the next frame; loop stalled");
                    }
                }
            }
            FrameControl::Stop => self.cancel(),
        }
        true
    }

    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        log::debug!("frame loop cancelled after {} ticks", self.ticks);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
