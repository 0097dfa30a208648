use glam::Vec2;
use instant::Instant;
use std::sync::Arc;
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use pixelblast_core::{
    AnimationClock, BlastConfig, BlastSession, Container, CssRect, FrameControl, FrameLoop,
    FrameOutcome, FrameScheduler, GpuRenderer, CONFIG_KEYS,
};

const ENV_PREFIX: &str = "PIXELBLAST_";

/// Environment variable for a configuration key: `pixel-size` -> `PIXELBLAST_PIXEL_SIZE`.
fn env_key(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.to_ascii_uppercase().replace('-', "_"))
}

fn config_from_env() -> BlastConfig {
    for key in CONFIG_KEYS {
        if let Ok(v) = std::env::var(env_key(key)) {
            log::info!("{} = {}", env_key(key), v);
        }
    }
    BlastConfig::from_lookup(|key| std::env::var(env_key(key)).ok()).unwrap_or_else(|e| {
        log::warn!("invalid configuration ({e}); using defaults");
        BlastConfig::default()
    })
}

/// The window stands in for the host element; its logical size is the CSS size.
struct WindowContainer {
    window: Arc<Window>,
}

impl WindowContainer {
    fn rect(&self) -> CssRect {
        let (width, height) = self.client_size();
        CssRect {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }
}

impl Container for WindowContainer {
    fn client_size(&self) -> (f64, f64) {
        let size: LogicalSize<f64> = self
            .window
            .inner_size()
            .to_logical(self.window.scale_factor());
        (size.width, size.height)
    }

    fn pixel_ratio(&self) -> f64 {
        self.window.scale_factor()
    }

    fn mount_surface(&mut self) {
        self.window.set_visible(true);
    }

    fn set_drawable_size(&mut self, width: u32, height: u32) {
        // the window owns its backing size; the surface is configured separately
        log::debug!("drawable size {}x{}", width, height);
    }

    fn unmount_surface(&mut self) {
        self.window.set_visible(false);
    }
}

/// One redraw request per frame; winit coalesces duplicates.
struct RedrawScheduler {
    window: Arc<Window>,
}

impl FrameScheduler for RedrawScheduler {
    type Handle = ();

    fn request_frame(&mut self) -> Option<()> {
        self.window.request_redraw();
        Some(())
    }

    fn cancel_frame(&mut self, _handle: ()) {}
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = config_from_env();
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("PixelBlast (native)")
            .with_inner_size(LogicalSize::new(960.0, 600.0))
            .with_transparent(true)
            .with_visible(false)
            .build(&event_loop)?,
    );

    let mut session: BlastSession<WindowContainer, GpuRenderer<'static>> = BlastSession::attach(
        config,
        WindowContainer {
            window: window.clone(),
        },
        AnimationClock::randomized(Instant::now()),
    );

    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(window.clone())?;
    let gpu = match pollster::block_on(GpuRenderer::new(&instance, surface)) {
        Ok(gpu) => gpu,
        Err(e) => {
            log::error!("gpu init error: {e}");
            session.dispose();
            return Err(e.into());
        }
    };
    log::info!("surface format {:?}", gpu.format());
    session.install_backend(gpu);

    let mut frame_loop = FrameLoop::new(RedrawScheduler {
        window: window.clone(),
    });
    frame_loop.start();
    let mut cursor = Vec2::ZERO;

    event_loop.run(move |event, elwt| {
        if let Event::WindowEvent { event, .. } = event {
            match event {
                WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                    session.resize();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let logical = position.to_logical::<f64>(window.scale_factor());
                    cursor = Vec2::new(logical.x as f32, logical.y as f32);
                }
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                } => {
                    let rect = session.container().rect();
                    session.pointer_down(cursor, rect);
                }
                WindowEvent::RedrawRequested => {
                    let ran = frame_loop.on_frame(|| match session.frame(Instant::now()) {
                        FrameOutcome::Stopped => FrameControl::Stop,
                        FrameOutcome::Drawn | FrameOutcome::Skipped => FrameControl::Continue,
                    });
                    // a redraw queued before CloseRequested lands here with ran == false
                    if ran && frame_loop.is_cancelled() {
                        if session.is_failed() {
                            log::error!("rendering failed, closing");
                        }
                        session.dispose();
                        elwt.exit();
                    }
                }
                WindowEvent::CloseRequested => {
                    frame_loop.cancel();
                    session.dispose();
                    elwt.exit();
                }
                _ => {}
            }
        }
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_are_upper_snake_case() {
        assert_eq!(env_key("pixel-size"), "PIXELBLAST_PIXEL_SIZE");
        assert_eq!(env_key("color"), "PIXELBLAST_COLOR");
        for key in CONFIG_KEYS {
            let k = env_key(key);
            assert!(k.starts_with(ENV_PREFIX));
            assert!(k.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }
}
