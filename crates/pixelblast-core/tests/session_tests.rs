// Lifecycle tests for BlastSession using in-memory container and backend fakes.

use glam::Vec2;
use instant::Instant;
use pixelblast_core::*;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct ContainerLog {
    css: (f64, f64),
    dpr: f64,
    children: usize,
    drawable: Vec<(u32, u32)>,
}

#[derive(Clone, Default)]
struct FakeContainer(Rc<RefCell<ContainerLog>>);

impl FakeContainer {
    fn sized(w: f64, h: f64, dpr: f64) -> Self {
        let c = Self::default();
        {
            let mut log = c.0.borrow_mut();
            log.css = (w, h);
            log.dpr = dpr;
        }
        c
    }

    fn set_css(&self, w: f64, h: f64) {
        self.0.borrow_mut().css = (w, h);
    }

    fn children(&self) -> usize {
        self.0.borrow().children
    }
}

impl Container for FakeContainer {
    fn client_size(&self) -> (f64, f64) {
        self.0.borrow().css
    }

    fn pixel_ratio(&self) -> f64 {
        self.0.borrow().dpr
    }

    fn mount_surface(&mut self) {
        self.0.borrow_mut().children += 1;
    }

    fn set_drawable_size(&mut self, width: u32, height: u32) {
        self.0.borrow_mut().drawable.push((width, height));
    }

    fn unmount_surface(&mut self) {
        let mut log = self.0.borrow_mut();
        log.children = log.children.saturating_sub(1);
    }
}

#[derive(Default)]
struct BackendLog {
    configured: Vec<(u32, u32)>,
    draws: Vec<BlastUniforms>,
    fail_next: Option<BlastError>,
    released: usize,
    limit: Option<u32>,
}

#[derive(Clone, Default)]
struct FakeBackend(Rc<RefCell<BackendLog>>);

impl FakeBackend {
    fn draws(&self) -> usize {
        self.0.borrow().draws.len()
    }

    fn released(&self) -> usize {
        self.0.borrow().released
    }

    fn fail_next(&self, err: BlastError) {
        self.0.borrow_mut().fail_next = Some(err);
    }

    fn limited(limit: u32) -> Self {
        let b = Self::default();
        b.0.borrow_mut().limit = Some(limit);
        b
    }
}

impl Backend for FakeBackend {
    fn configure(&mut self, width: u32, height: u32) {
        self.0.borrow_mut().configured.push((width, height));
    }

    fn draw(&mut self, uniforms: &BlastUniforms) -> Result<(), BlastError> {
        let mut log = self.0.borrow_mut();
        if let Some(err) = log.fail_next.take() {
            return Err(err);
        }
        log.draws.push(*uniforms);
        Ok(())
    }

    fn max_extent(&self) -> u32 {
        self.0.borrow().limit.unwrap_or(u32::MAX)
    }

    fn release(self) {
        self.0.borrow_mut().released += 1;
    }
}

fn session(
    container: &FakeContainer,
    config: BlastConfig,
) -> BlastSession<FakeContainer, FakeBackend> {
    BlastSession::attach(
        config,
        container.clone(),
        AnimationClock::new(Instant::now(), 42.0),
    )
}

fn rect_for(s: &BlastSession<FakeContainer, FakeBackend>) -> CssRect {
    let (width, height) = s.surface().css_size();
    CssRect {
        left: 0.0,
        top: 0.0,
        width,
        height,
    }
}

#[test]
fn attach_mounts_and_sizes_the_surface() {
    let c = FakeContainer::sized(300.0, 150.0, 3.0);
    let s = session(&c, BlastConfig::default());
    assert_eq!(c.children(), 1);
    assert_eq!(s.surface().width(), 600);
    assert_eq!(s.surface().height(), 300);
    assert_eq!(c.0.borrow().drawable, vec![(600, 300)]);
    assert_eq!(s.time(), 42.0);
}

#[test]
fn zero_size_container_draws_nothing_until_resized() {
    let c = FakeContainer::sized(0.0, 0.0, 1.0);
    let backend = FakeBackend::default();
    let mut s = session(&c, BlastConfig::default());
    assert!(s.install_backend(backend.clone()));
    assert!(backend.0.borrow().configured.is_empty());

    for _ in 0..5 {
        assert_eq!(s.frame(Instant::now()), FrameOutcome::Skipped);
    }
    assert_eq!(backend.draws(), 0);

    c.set_css(64.0, 32.0);
    assert_eq!(
        s.resize(),
        SurfaceChange::Resized {
            width: 64,
            height: 32
        }
    );
    assert_eq!(backend.0.borrow().configured, vec![(64, 32)]);
    assert_eq!(s.frame(Instant::now()), FrameOutcome::Drawn);
    assert_eq!(backend.draws(), 1);
}

#[test]
fn collapsing_the_container_pauses_drawing() {
    let c = FakeContainer::sized(64.0, 64.0, 1.0);
    let backend = FakeBackend::default();
    let mut s = session(&c, BlastConfig::default());
    s.install_backend(backend.clone());
    assert_eq!(s.frame(Instant::now()), FrameOutcome::Drawn);

    c.set_css(0.0, 64.0);
    assert_eq!(s.resize(), SurfaceChange::Hidden);
    assert_eq!(s.frame(Instant::now()), FrameOutcome::Skipped);
    assert_eq!(backend.draws(), 1);
    // the last configured size is kept
    assert_eq!(backend.0.borrow().configured, vec![(64, 64)]);
}

#[test]
fn frames_before_the_backend_is_ready_are_skipped() {
    let c = FakeContainer::sized(10.0, 10.0, 1.0);
    let mut s = session(&c, BlastConfig::default());
    assert!(!s.has_backend());
    assert_eq!(s.frame(Instant::now()), FrameOutcome::Skipped);
}

#[test]
fn dispose_releases_everything_and_is_idempotent() {
    let c = FakeContainer::sized(10.0, 10.0, 1.0);
    let backend = FakeBackend::default();
    let mut s = session(&c, BlastConfig::default());
    s.install_backend(backend.clone());

    s.dispose();
    assert_eq!(c.children(), 0);
    assert_eq!(backend.released(), 1);
    assert!(s.is_disposed());
    // a normal shutdown is not a failure
    assert!(!s.is_failed());

    s.dispose();
    assert_eq!(c.children(), 0);
    assert_eq!(backend.released(), 1);

    assert_eq!(s.frame(Instant::now()), FrameOutcome::Stopped);
    assert_eq!(s.pointer_down(Vec2::new(1.0, 1.0), rect_for(&s)), None);
    assert_eq!(backend.draws(), 0);
}

#[test]
fn backend_arriving_after_dispose_is_released() {
    let c = FakeContainer::sized(10.0, 10.0, 1.0);
    let mut s = session(&c, BlastConfig::default());
    s.dispose();
    let late = FakeBackend::default();
    assert!(!s.install_backend(late.clone()));
    assert_eq!(late.released(), 1);
    assert!(!s.has_backend());
}

#[test]
fn pointer_press_lands_in_flipped_surface_space() {
    let c = FakeContainer::sized(100.0, 50.0, 2.0);
    let backend = FakeBackend::default();
    let mut s = session(&c, BlastConfig::default());
    s.install_backend(backend.clone());
    let rect = CssRect {
        left: 20.0,
        top: 10.0,
        width: 100.0,
        height: 50.0,
    };

    let slot = s.pointer_down(Vec2::new(45.0, 20.0), rect);
    assert_eq!(slot, Some(0));
    let ev = s.ripples().get(0).copied().unwrap();
    assert!((ev.position.x - 50.0).abs() < 1e-4);
    assert!((ev.position.y - 80.0).abs() < 1e-4);
    assert_eq!(ev.time, s.time());

    s.frame(Instant::now());
    let u = backend.0.borrow().draws[0];
    assert_eq!(u.ripples[0][0], ev.position.x);
    assert_eq!(u.ripples[1][0], -1.0);
}

#[test]
fn eleventh_press_overwrites_the_oldest_slot() {
    let c = FakeContainer::sized(100.0, 100.0, 1.0);
    let mut s = session(&c, BlastConfig::default());
    let rect = rect_for(&s);
    let slots: Vec<_> = (0..12)
        .map(|i| s.pointer_down(Vec2::new(i as f32, 5.0), rect))
        .collect();
    assert_eq!(slots[10], Some(0));
    assert_eq!(slots[11], Some(1));
    assert_eq!(s.ripples().get(0).unwrap().position.x, 10.0);
    assert_eq!(s.ripples().len(), 10);
}

#[test]
fn presses_are_ignored_when_ripples_are_off() {
    let c = FakeContainer::sized(100.0, 100.0, 1.0);
    let cfg = BlastConfig {
        ripples: false,
        ..BlastConfig::default()
    };
    let mut s = session(&c, cfg);
    let rect = rect_for(&s);
    assert_eq!(s.pointer_down(Vec2::new(5.0, 5.0), rect), None);
    assert!(s.ripples().is_empty());
}

#[test]
fn lost_surface_reconfigures_and_keeps_running() {
    let c = FakeContainer::sized(32.0, 32.0, 1.0);
    let backend = FakeBackend::default();
    let mut s = session(&c, BlastConfig::default());
    s.install_backend(backend.clone());

    backend.fail_next(BlastError::SurfaceLost);
    assert_eq!(s.frame(Instant::now()), FrameOutcome::Skipped);
    assert_eq!(backend.0.borrow().configured, vec![(32, 32), (32, 32)]);

    backend.fail_next(BlastError::SurfaceTimeout);
    assert_eq!(s.frame(Instant::now()), FrameOutcome::Skipped);
    assert_eq!(s.frame(Instant::now()), FrameOutcome::Drawn);
    assert!(!s.is_failed());
}

#[test]
fn fatal_draw_error_stops_and_releases() {
    let c = FakeContainer::sized(32.0, 32.0, 1.0);
    let backend = FakeBackend::default();
    let mut s = session(&c, BlastConfig::default());
    s.install_backend(backend.clone());

    backend.fail_next(BlastError::OutOfMemory);
    assert_eq!(s.frame(Instant::now()), FrameOutcome::Stopped);
    assert!(s.is_failed());
    assert_eq!(backend.released(), 1);
    assert_eq!(s.frame(Instant::now()), FrameOutcome::Stopped);

    // dispose after failure still unmounts, without a second release
    s.dispose();
    assert_eq!(c.children(), 0);
    assert_eq!(backend.released(), 1);
}

#[test]
fn uniforms_reflect_config_and_pixel_ratio() {
    let c = FakeContainer::sized(40.0, 20.0, 1.5);
    let backend = FakeBackend::default();
    let cfg = BlastConfig {
        pixel_size: 6.0,
        shape: ShapeKind::Diamond,
        ..BlastConfig::default()
    };
    let mut s = session(&c, cfg);
    s.install_backend(backend.clone());
    s.frame(Instant::now());
    let u = backend.0.borrow().draws[0];
    assert_eq!(u.resolution, [60.0, 30.0]);
    assert_eq!(u.pixel_size, 9.0);
    assert_eq!(u.shape, 3);
    assert!(u.time >= 42.0);
}

/// Hands out sequential handles; the loop only needs to see whether a
/// successor was requested.
#[derive(Default)]
struct CountingScheduler {
    requested: u32,
}

impl FrameScheduler for CountingScheduler {
    type Handle = u32;

    fn request_frame(&mut self) -> Option<u32> {
        self.requested += 1;
        Some(self.requested)
    }

    fn cancel_frame(&mut self, _handle: u32) {}
}

#[test]
fn failed_backend_init_stops_the_frame_loop() {
    let c = FakeContainer::sized(64.0, 64.0, 1.0);
    let mut s = session(&c, BlastConfig::default());
    let mut frames = FrameLoop::new(CountingScheduler::default());
    frames.start();
    assert_eq!(s.frame(Instant::now()), FrameOutcome::Skipped);

    s.backend_failed(&BlastError::NoAdapter);
    assert!(s.is_failed());

    let mut ticks = 0;
    while frames.on_frame(|| match s.frame(Instant::now()) {
        FrameOutcome::Stopped => FrameControl::Stop,
        FrameOutcome::Drawn | FrameOutcome::Skipped => FrameControl::Continue,
    }) {
        ticks += 1;
        assert!(ticks < 100, "frame loop never stopped");
    }
    assert_eq!(ticks, 1);
    assert!(frames.is_cancelled());
    assert!(!frames.is_pending());

    // the container is still unmounted on dispose
    s.dispose();
    assert_eq!(c.children(), 0);
}

#[test]
fn init_failure_after_dispose_is_ignored() {
    let c = FakeContainer::sized(64.0, 64.0, 1.0);
    let mut s = session(&c, BlastConfig::default());
    s.dispose();
    s.backend_failed(&BlastError::NoAdapter);
    assert!(!s.is_failed());
    assert_eq!(s.frame(Instant::now()), FrameOutcome::Stopped);
}

#[test]
fn backend_size_limit_clamps_surface_and_pointer_space() {
    let c = FakeContainer::sized(800.0, 300.0, 2.0);
    let backend = FakeBackend::limited(1024);
    let mut s = session(&c, BlastConfig::default());
    assert_eq!(s.surface().width(), 1600);

    assert!(s.install_backend(backend.clone()));
    assert_eq!(s.surface().width(), 1024);
    assert_eq!(s.surface().height(), 600);
    assert_eq!(c.0.borrow().drawable.last(), Some(&(1024, 600)));
    assert_eq!(backend.0.borrow().configured, vec![(1024, 600)]);

    assert_eq!(s.frame(Instant::now()), FrameOutcome::Drawn);
    assert_eq!(backend.0.borrow().draws[0].resolution, [1024.0, 600.0]);

    let rect = rect_for(&s);
    s.pointer_down(Vec2::new(400.0, 150.0), rect);
    let ev = s.ripples().get(0).copied().unwrap();
    assert!((ev.position.x - 512.0).abs() < 1e-3);
    assert!((ev.position.y - 300.0).abs() < 1e-3);

    // later resizes stay under the limit
    c.set_css(1000.0, 200.0);
    assert_eq!(
        s.resize(),
        SurfaceChange::Resized {
            width: 1024,
            height: 400
        }
    );
    assert_eq!(backend.0.borrow().configured.last(), Some(&(1024, 400)));
}
