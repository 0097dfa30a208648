use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("`{key}` is not a number: {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("`{key}` is out of range: {value}")]
    OutOfRange { key: &'static str, value: f32 },
    #[error("`{key}` is not a flag: {value:?}")]
    InvalidFlag { key: &'static str, value: String },
    #[error("unknown shape {0:?}, expected solid, circle, triangle or diamond")]
    UnknownShape(String),
    #[error("invalid colour {0:?}, expected #rrggbb")]
    InvalidColor(String),
}

/// GPU setup and per-frame failures.
#[derive(Debug, Error)]
pub enum BlastError {
    #[error("surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter")]
    NoAdapter,
    #[error("device request failed: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no usable texture format")]
    UnsupportedSurface,
    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),
    #[error("surface lost or outdated")]
    SurfaceLost,
    #[error("timed out acquiring the next surface texture")]
    SurfaceTimeout,
    #[error("out of GPU memory")]
    OutOfMemory,
    #[error("surface error: {0}")]
    Surface(String),
}

impl BlastError {
    /// Whether the component must stop drawing for good.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, BlastError::SurfaceLost | BlastError::SurfaceTimeout)
    }
}

impl From<wgpu::SurfaceError> for BlastError {
    fn from(e: wgpu::SurfaceError) -> Self {
        match e {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => BlastError::SurfaceLost,
            wgpu::SurfaceError::Timeout => BlastError::SurfaceTimeout,
            wgpu::SurfaceError::OutOfMemory => BlastError::OutOfMemory,
            other => BlastError::Surface(other.to_string()),
        }
    }
}
