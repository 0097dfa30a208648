//! Scalar mirror of the fragment stage in `shaders/pixel_blast.wgsl`.
//!
//! Rendering always runs on the GPU; this module exists so the field's
//! invariants (density monotonicity, edge fade, ripple max-blend) can be
//! checked on the host. `fwidth` is replaced by the analytic derivative of the
//! distance field across one framebuffer pixel.

use crate::constants::*;
use crate::uniforms::BlastUniforms;
use glam::{Vec2, Vec3};

#[inline]
fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn step(edge: f32, x: f32) -> f32 {
    if x < edge {
        0.0
    } else {
        1.0
    }
}

pub fn bayer2(a: Vec2) -> f32 {
    let a = a.floor();
    fract(a.x / 2.0 + a.y * a.y * 0.75)
}

pub fn bayer4(a: Vec2) -> f32 {
    bayer2(0.5 * a) * 0.25 + bayer2(a)
}

/// Ordered 8x8 dither threshold in `[0, 1)`.
pub fn bayer8(a: Vec2) -> f32 {
    bayer4(0.5 * a) * 0.25 + bayer2(a)
}

#[inline]
pub fn hash11(n: f32) -> f32 {
    fract(n.sin() * 43758.5453)
}

fn lattice(ip: Vec3, o: Vec3) -> f32 {
    hash11((ip + o).dot(Vec3::new(1.0, 57.0, 113.0)))
}

/// Quintic-interpolated value noise in `[-1, 1]`.
pub fn value_noise(p: Vec3) -> f32 {
    let ip = p.floor();
    let fp = p - ip;
    let n000 = lattice(ip, Vec3::new(0.0, 0.0, 0.0));
    let n100 = lattice(ip, Vec3::new(1.0, 0.0, 0.0));
    let n010 = lattice(ip, Vec3::new(0.0, 1.0, 0.0));
    let n110 = lattice(ip, Vec3::new(1.0, 1.0, 0.0));
    let n001 = lattice(ip, Vec3::new(0.0, 0.0, 1.0));
    let n101 = lattice(ip, Vec3::new(1.0, 0.0, 1.0));
    let n011 = lattice(ip, Vec3::new(0.0, 1.0, 1.0));
    let n111 = lattice(ip, Vec3::new(1.0, 1.0, 1.0));
    let w = fp * fp * fp * (fp * (fp * 6.0 - Vec3::splat(15.0)) + Vec3::splat(10.0));
    let x00 = mix(n000, n100, w.x);
    let x10 = mix(n010, n110, w.x);
    let x01 = mix(n001, n101, w.x);
    let x11 = mix(n011, n111, w.x);
    mix(mix(x00, x10, w.y), mix(x01, x11, w.y), w.z) * 2.0 - 1.0
}

pub fn fbm(uv: Vec2, t: f32, scale: f32) -> f32 {
    let p = (uv * scale).extend(t);
    let mut sum = 1.0;
    let mut freq = 1.0;
    for _ in 0..NOISE_OCTAVES {
        sum += value_noise(p * freq);
        freq *= NOISE_LACUNARITY;
    }
    sum * 0.5 + 0.5
}

/// Base feed before ripples: noise sample shifted by the density bias.
#[inline]
pub fn density_feed(noise: f32, density: f32) -> f32 {
    noise * 0.5 + FEED_BIAS + (density - 0.5) * DENSITY_WEIGHT
}

/// Binary dither decision for one pixel cell.
#[inline]
pub fn dither(feed: f32, threshold: f32) -> f32 {
    step(0.5, feed + threshold - 0.5)
}

/// Contribution of one ripple at distance `r` (cell UV units) after `t`
/// time-uniform units.
pub fn ripple_ring(r: f32, t: f32, speed: f32, thickness: f32, intensity: f32) -> f32 {
    let band = (r - speed * t) / thickness;
    let ring = (-band * band).exp();
    let atten = (-RIPPLE_TIME_DECAY * t).exp() * (-RIPPLE_DISTANCE_DECAY * r).exp();
    ring * atten * intensity
}

/// Edge fade factor for a bottom-left-origin fragment.
pub fn edge_fade(frag: Vec2, resolution: Vec2, fade: f32) -> f32 {
    if fade <= 0.0 {
        return 1.0;
    }
    let norm = frag / resolution;
    let edge = norm.x.min(norm.y).min((1.0 - norm.x).min(1.0 - norm.y));
    smoothstep(0.0, fade, edge)
}

/// Linear to sRGB transfer for one channel.
#[inline]
pub fn srgb_encode(c: f32) -> f32 {
    if c >= 0.003_130_8 {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    } else {
        c * 12.92
    }
}

struct Cell {
    frag: Vec2,
    pixel_id: Vec2,
    pixel_uv: Vec2,
    cell_px: f32,
    uv: Vec2,
    aspect: f32,
}

fn cell(frag_bl: Vec2, u: &BlastUniforms) -> Cell {
    let resolution = Vec2::from(u.resolution);
    let frag = frag_bl - resolution * 0.5;
    let aspect = resolution.x / resolution.y;
    let scaled = frag / u.pixel_size;
    let cell_px = CELL_PIXEL_MULTIPLIER * u.pixel_size;
    let cell_coord = (frag / cell_px).floor() * cell_px;
    Cell {
        frag,
        pixel_id: scaled.floor(),
        pixel_uv: scaled - scaled.floor(),
        cell_px,
        uv: cell_coord / resolution * Vec2::new(aspect, 1.0),
        aspect,
    }
}

/// Feed value (noise + density + ripples) at a bottom-left-origin fragment.
pub fn feed_at(frag_bl: Vec2, u: &BlastUniforms) -> f32 {
    let c = cell(frag_bl, u);
    let resolution = Vec2::from(u.resolution);
    let noise = fbm(c.uv, u.time * NOISE_TIME_SCALE, u.scale);
    let mut feed = density_feed(noise, u.density);
    if u.enable_ripples == 1 {
        for ripple in u.ripples.iter().filter(|r| r[0] >= 0.0) {
            let origin = Vec2::new(ripple[0], ripple[1]);
            let cuv = ((origin - resolution * 0.5 - Vec2::splat(c.cell_px * 0.5)) / resolution)
                * Vec2::new(c.aspect, 1.0);
            let t = (u.time - ripple[2]).max(0.0);
            let r = c.uv.distance(cuv);
            feed = feed.max(ripple_ring(
                r,
                t,
                u.ripple_speed,
                u.ripple_thickness,
                u.ripple_intensity,
            ));
        }
    }
    feed
}

/// Coverage of the pixel cell containing `frag_bl`, before shape masking.
pub fn coverage_at(frag_bl: Vec2, u: &BlastUniforms) -> f32 {
    let c = cell(frag_bl, u);
    let threshold = bayer8(c.frag / u.pixel_size);
    let bw = dither(feed_at(frag_bl, u), threshold);
    let h = hash11(c.pixel_id.dot(Vec2::new(127.1, 311.7)));
    bw * (1.0 + (h - 0.5) * u.jitter)
}

fn mask(u: &BlastUniforms, c: &Cell, coverage: f32) -> f32 {
    // one framebuffer pixel spans 1/pixel_size of a cell
    let px = 1.0 / u.pixel_size;
    let p = c.pixel_uv;
    match u.shape {
        SHAPE_CIRCLE => {
            let r = coverage.sqrt() * 0.25;
            let d = (p - Vec2::splat(0.5)).length() - r;
            let aa = (0.5 * 2.0 * px).max(1e-4);
            coverage * (1.0 - smoothstep(-aa, aa, d * 2.0))
        }
        SHAPE_TRIANGLE => {
            let s = c.pixel_id.x + c.pixel_id.y;
            let flip = s - 2.0 * (s * 0.5).floor() > 0.5;
            let x = if flip { 1.0 - p.x } else { p.x };
            let r = coverage.sqrt();
            let d = p.y - r * (1.0 - x);
            let aa = ((1.0 + r) * px).max(1e-4);
            coverage * (0.5 - d / aa).clamp(0.0, 1.0)
        }
        SHAPE_DIAMOND => {
            let r = coverage.sqrt() * 0.564;
            step((p.x - 0.49).abs() + (p.y - 0.49).abs(), r)
        }
        _ => coverage,
    }
}

/// Straight (non-premultiplied) output of the fragment stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub color: Vec3,
    pub alpha: f32,
}

pub fn shade(frag_bl: Vec2, u: &BlastUniforms) -> Sample {
    let c = cell(frag_bl, u);
    let coverage = coverage_at(frag_bl, u);
    let m = mask(u, &c, coverage)
        * edge_fade(frag_bl, Vec2::from(u.resolution), u.edge_fade);
    let color = Vec3::new(
        srgb_encode(u.color[0]),
        srgb_encode(u.color[1]),
        srgb_encode(u.color[2]),
    );
    Sample {
        color,
        alpha: m.clamp(0.0, 1.0),
    }
}
