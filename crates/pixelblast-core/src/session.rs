//! Lifecycle of one mounted background.
//!
//! A [`BlastSession`] ties a host [`Container`] (the element the canvas lives
//! in) to a GPU [`Backend`]. It owns the surface state, the ripple ring and the
//! animation clock, and is driven from outside: the platform calls
//! [`resize`](BlastSession::resize) on container size notifications,
//! [`pointer_down`](BlastSession::pointer_down) on presses and
//! [`frame`](BlastSession::frame) once per display refresh.

use crate::clock::AnimationClock;
use crate::config::BlastConfig;
use crate::error::BlastError;
use crate::ripple::{RippleBuffer, RippleEvent};
use crate::surface::{page_to_surface, CssRect, SurfaceChange, SurfaceState};
use crate::uniforms::BlastUniforms;
use glam::Vec2;
use instant::Instant;

/// The element hosting the drawing surface.
pub trait Container {
    /// Client size in CSS pixels.
    fn client_size(&self) -> (f64, f64);

    /// Unclamped device pixel ratio.
    fn pixel_ratio(&self) -> f64;

    /// Insert the drawing surface into the container.
    fn mount_surface(&mut self);

    /// Apply a new drawable (backing store) size to the surface element.
    fn set_drawable_size(&mut self, width: u32, height: u32);

    /// Remove the drawing surface; must be safe to call when not mounted.
    fn unmount_surface(&mut self);
}

/// GPU resources that draw the field.
pub trait Backend: Sized {
    /// (Re)configure the swap surface. Only called with a non-zero size.
    fn configure(&mut self, width: u32, height: u32);

    fn draw(&mut self, uniforms: &BlastUniforms) -> Result<(), BlastError>;

    /// Largest surface extent per axis the backend can present.
    fn max_extent(&self) -> u32 {
        u32::MAX
    }

    /// Release every GPU object held by the backend.
    fn release(self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    /// Nothing drawn this frame (hidden surface, backend not ready, transient
    /// surface error); the loop keeps going.
    Skipped,
    /// Disposed or failed for good; the loop should stop.
    Stopped,
}

pub struct BlastSession<C: Container, B: Backend> {
    config: BlastConfig,
    container: C,
    backend: Option<B>,
    surface: SurfaceState,
    ripples: RippleBuffer,
    clock: AnimationClock,
    time: f32,
    draws: u64,
    failed: bool,
    disposed: bool,
}

impl<C: Container, B: Backend> BlastSession<C, B> {
    /// Mount the surface into `container` and take the first measurement.
    pub fn attach(config: BlastConfig, mut container: C, clock: AnimationClock) -> Self {
        container.mount_surface();
        let mut session = Self {
            config,
            container,
            backend: None,
            surface: SurfaceState::default(),
            ripples: RippleBuffer::new(),
            time: clock.offset(),
            clock,
            draws: 0,
            failed: false,
            disposed: false,
        };
        session.resize();
        log::info!(
            "[blast] attached {}x{} px (ratio {:.2})",
            session.surface.width(),
            session.surface.height(),
            session.surface.pixel_ratio()
        );
        session
    }

    /// Hand over a ready backend. Returns `false` (and releases it) when the
    /// session was disposed while the backend was being created.
    pub fn install_backend(&mut self, backend: B) -> bool {
        if self.disposed {
            backend.release();
            return false;
        }
        self.surface.set_max_extent(backend.max_extent());
        if let Some(old) = self.backend.replace(backend) {
            old.release();
        }
        self.failed = false;
        // re-measure under the backend's size limit; a resize configures it
        let change = self.resize();
        if !matches!(change, SurfaceChange::Resized { .. }) && self.surface.is_drawable() {
            let (width, height) = (self.surface.width(), self.surface.height());
            if let Some(backend) = self.backend.as_mut() {
                backend.configure(width, height);
            }
        }
        log::info!("[blast] gpu backend installed");
        true
    }

    /// Record that the backend could not be created. Later frames report
    /// [`FrameOutcome::Stopped`] so the loop ends.
    pub fn backend_failed(&mut self, err: &BlastError) {
        if self.disposed {
            return;
        }
        log::error!("[blast] gpu init failed: {err}; background stays transparent");
        self.failed = true;
    }

    /// Re-measure the container and resize the surface to match.
    pub fn resize(&mut self) -> SurfaceChange {
        if self.disposed {
            return SurfaceChange::Unchanged;
        }
        let (css_w, css_h) = self.container.client_size();
        let change = self
            .surface
            .measure(css_w, css_h, self.container.pixel_ratio());
        match change {
            SurfaceChange::Resized { width, height } => {
                self.container.set_drawable_size(width, height);
                if let Some(backend) = self.backend.as_mut() {
                    backend.configure(width, height);
                }
                log::debug!("[blast] resized to {}x{}", width, height);
            }
            SurfaceChange::Hidden => log::debug!("[blast] zero-area container, drawing paused"),
            SurfaceChange::Unchanged => {}
        }
        change
    }

    /// Record a ripple for a press at client coordinates inside `rect`.
    /// Returns the ring slot used, or `None` when the press was ignored.
    pub fn pointer_down(&mut self, client: Vec2, rect: CssRect) -> Option<usize> {
        if self.disposed || !self.config.ripples {
            return None;
        }
        let position =
            page_to_surface(client, rect, self.surface.width(), self.surface.height())?;
        let slot = self.ripples.push(RippleEvent {
            position,
            time: self.time,
        });
        log::debug!(
            "[blast] ripple {} at ({:.1},{:.1}) t={:.3}",
            slot,
            position.x,
            position.y,
            self.time
        );
        Some(slot)
    }

    /// Advance the time uniform to `now` and draw once.
    pub fn frame(&mut self, now: Instant) -> FrameOutcome {
        if self.disposed || self.failed {
            return FrameOutcome::Stopped;
        }
        self.time = self.clock.time_at(now);
        if !self.surface.is_drawable() {
            return FrameOutcome::Skipped;
        }
        let Some(backend) = self.backend.as_mut() else {
            return FrameOutcome::Skipped;
        };
        let uniforms = BlastUniforms::new(&self.config, &self.surface, self.time, &self.ripples);
        match backend.draw(&uniforms) {
            Ok(()) => {
                self.draws += 1;
                FrameOutcome::Drawn
            }
            Err(BlastError::SurfaceLost) => {
                backend.configure(self.surface.width(), self.surface.height());
                FrameOutcome::Skipped
            }
            Err(e) if !e.is_fatal() => FrameOutcome::Skipped,
            Err(e) => {
                log::error!("[blast] fatal render error: {e}; background disabled");
                if let Some(backend) = self.backend.take() {
                    backend.release();
                }
                self.failed = true;
                FrameOutcome::Stopped
            }
        }
    }

    /// Release GPU resources and remove the surface. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(backend) = self.backend.take() {
            backend.release();
        }
        self.container.unmount_surface();
        log::info!("[blast] disposed after {} draws", self.draws);
    }

    pub fn config(&self) -> &BlastConfig {
        &self.config
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn surface(&self) -> &SurfaceState {
        &self.surface
    }

    pub fn ripples(&self) -> &RippleBuffer {
        &self.ripples
    }

    /// Current value of the time uniform.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
