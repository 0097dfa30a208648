use crate::config::BlastConfig;
use crate::constants::MAX_RIPPLES;
use crate::ripple::RippleBuffer;
use crate::surface::SurfaceState;

/// Uniform block consumed by `pixel_blast.wgsl`.
///
/// Layout follows WGSL uniform rules: the ripple array starts on a 16-byte
/// boundary and every element is a `vec4<f32>` of `(x, y, time, 0)`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlastUniforms {
    pub color: [f32; 4],
    pub resolution: [f32; 2],
    pub time: f32,
    pub pixel_size: f32,
    pub scale: f32,
    pub density: f32,
    pub jitter: f32,
    pub enable_ripples: u32,
    pub ripple_speed: f32,
    pub ripple_thickness: f32,
    pub ripple_intensity: f32,
    pub edge_fade: f32,
    pub shape: u32,
    pub _pad: [u32; 3],
    pub ripples: [[f32; 4]; MAX_RIPPLES],
}

impl BlastUniforms {
    pub fn new(
        config: &BlastConfig,
        surface: &SurfaceState,
        time: f32,
        ripples: &RippleBuffer,
    ) -> Self {
        Self {
            color: [config.color.x, config.color.y, config.color.z, 1.0],
            resolution: surface.resolution(),
            time,
            pixel_size: config.pixel_size * surface.pixel_ratio() as f32,
            scale: config.scale,
            density: config.density,
            jitter: config.jitter,
            enable_ripples: config.ripples as u32,
            ripple_speed: config.ripple_speed,
            ripple_thickness: config.ripple_thickness,
            ripple_intensity: config.ripple_intensity,
            edge_fade: config.edge_fade,
            shape: config.shape.shader_index(),
            _pad: [0; 3],
            ripples: ripples.packed(),
        }
    }
}
