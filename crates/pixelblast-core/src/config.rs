//! Construction-time shading parameters.
//!
//! A [`BlastConfig`] is read once when a background is mounted and never
//! changes afterwards. Front-ends feed it through [`BlastConfig::from_lookup`]
//! with whatever key source they have (DOM `data-*` attributes, environment
//! variables); missing keys keep their defaults.

use crate::constants::*;
use crate::error::ConfigError;
use glam::Vec3;
use std::str::FromStr;

/// Footprint drawn inside each lit pixel cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShapeKind {
    Solid,
    #[default]
    Circle,
    Triangle,
    Diamond,
}

impl ShapeKind {
    /// Selector value understood by the fragment shader.
    pub fn shader_index(self) -> u32 {
        match self {
            ShapeKind::Solid => SHAPE_SOLID,
            ShapeKind::Circle => SHAPE_CIRCLE,
            ShapeKind::Triangle => SHAPE_TRIANGLE,
            ShapeKind::Diamond => SHAPE_DIAMOND,
        }
    }
}

impl FromStr for ShapeKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solid" | "square" => Ok(ShapeKind::Solid),
            "circle" => Ok(ShapeKind::Circle),
            "triangle" => Ok(ShapeKind::Triangle),
            "diamond" => Ok(ShapeKind::Diamond),
            _ => Err(ConfigError::UnknownShape(s.to_string())),
        }
    }
}

/// Keys accepted by [`BlastConfig::from_lookup`], in kebab-case.
pub const CONFIG_KEYS: [&str; 11] = [
    "pixel-size",
    "scale",
    "density",
    "jitter",
    "ripples",
    "ripple-speed",
    "ripple-thickness",
    "ripple-intensity",
    "edge-fade",
    "shape",
    "color",
];

#[derive(Clone, Debug, PartialEq)]
pub struct BlastConfig {
    /// Pixel cell edge in CSS pixels; scaled by the clamped device pixel ratio.
    pub pixel_size: f32,
    /// Spatial frequency of the noise field.
    pub scale: f32,
    pub density: f32,
    pub jitter: f32,
    pub ripples: bool,
    pub ripple_speed: f32,
    pub ripple_thickness: f32,
    pub ripple_intensity: f32,
    /// Edge fade width in normalised surface units; 0 disables the fade.
    pub edge_fade: f32,
    pub shape: ShapeKind,
    /// Base colour in linear RGB.
    pub color: Vec3,
}

impl Default for BlastConfig {
    fn default() -> Self {
        Self {
            pixel_size: DEFAULT_PIXEL_SIZE,
            scale: DEFAULT_SCALE,
            density: DEFAULT_DENSITY,
            jitter: DEFAULT_JITTER,
            ripples: true,
            ripple_speed: DEFAULT_RIPPLE_SPEED,
            ripple_thickness: DEFAULT_RIPPLE_THICKNESS,
            ripple_intensity: DEFAULT_RIPPLE_INTENSITY,
            edge_fade: DEFAULT_EDGE_FADE,
            shape: ShapeKind::Circle,
            color: linear_from_hex(DEFAULT_COLOR_HEX).unwrap_or(Vec3::ONE),
        }
    }
}

impl BlastConfig {
    /// Build a configuration from a key lookup, starting from the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let number = |key: &'static str, slot: &mut f32| -> Result<(), ConfigError> {
            if let Some(raw) = lookup(key) {
                *slot = parse_number(key, &raw)?;
            }
            Ok(())
        };
        number("pixel-size", &mut cfg.pixel_size)?;
        number("scale", &mut cfg.scale)?;
        number("density", &mut cfg.density)?;
        number("jitter", &mut cfg.jitter)?;
        number("ripple-speed", &mut cfg.ripple_speed)?;
        number("ripple-thickness", &mut cfg.ripple_thickness)?;
        number("ripple-intensity", &mut cfg.ripple_intensity)?;
        number("edge-fade", &mut cfg.edge_fade)?;
        if let Some(raw) = lookup("ripples") {
            cfg.ripples = parse_flag("ripples", &raw)?;
        }
        if let Some(raw) = lookup("shape") {
            cfg.shape = raw.parse()?;
        }
        if let Some(raw) = lookup("color") {
            cfg.color = linear_from_hex(&raw)?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would divide by zero or produce NaN in the shader.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("pixel-size", self.pixel_size),
            ("scale", self.scale),
            ("ripple-thickness", self.ripple_thickness),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::OutOfRange { key, value });
            }
        }
        let non_negative = [
            ("jitter", self.jitter),
            ("ripple-speed", self.ripple_speed),
            ("ripple-intensity", self.ripple_intensity),
            ("edge-fade", self.edge_fade),
        ];
        for (key, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::OutOfRange { key, value });
            }
        }
        if !self.density.is_finite() {
            return Err(ConfigError::OutOfRange {
                key: "density",
                value: self.density,
            });
        }
        Ok(())
    }
}

fn parse_number(key: &'static str, raw: &str) -> Result<f32, ConfigError> {
    raw.trim()
        .parse::<f32>()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: raw.to_string(),
        })
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: raw.to_string(),
        }),
    }
}

/// sRGB transfer function inverse for one channel in [0, 1].
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Parse `#rrggbb` (sRGB) into linear RGB.
pub fn linear_from_hex(hex: &str) -> Result<Vec3, ConfigError> {
    let invalid = || ConfigError::InvalidColor(hex.to_string());
    let digits = hex.trim().strip_prefix('#').ok_or_else(invalid)?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |i: usize| -> Result<f32, ConfigError> {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map(|v| srgb_to_linear(v as f32 / 255.0))
            .map_err(|_| invalid())
    };
    Ok(Vec3::new(channel(0)?, channel(2)?, channel(4)?))
}
