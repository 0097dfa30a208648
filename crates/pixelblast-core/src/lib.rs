//! Platform-independent core of the PixelBlast background: configuration,
//! surface sizing, the ripple ring, the time uniform, the frame loop and the
//! wgpu renderer. Front-ends supply a [`Container`] and a [`FrameScheduler`].

pub mod clock;
pub mod config;
pub mod constants;
pub mod driver;
pub mod error;
pub mod gpu;
pub mod ripple;
pub mod session;
pub mod shading;
pub mod surface;
pub mod uniforms;

pub static PIXEL_BLAST_WGSL: &str = include_str!("../shaders/pixel_blast.wgsl");

pub use clock::AnimationClock;
pub use config::{BlastConfig, ShapeKind, CONFIG_KEYS};
pub use driver::{FrameControl, FrameLoop, FrameScheduler};
pub use error::{BlastError, ConfigError};
pub use gpu::GpuRenderer;
pub use ripple::{RippleBuffer, RippleEvent};
pub use session::{Backend, BlastSession, Container, FrameOutcome};
pub use surface::{CssRect, SurfaceChange, SurfaceState};
pub use uniforms::BlastUniforms;
