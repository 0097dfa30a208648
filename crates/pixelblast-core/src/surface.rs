//! Drawable-size bookkeeping and page-to-surface coordinate mapping.

use crate::constants::MAX_PIXEL_RATIO;
use glam::Vec2;

/// Clamp a reported device pixel ratio to `(0, MAX_PIXEL_RATIO]`.
#[inline]
pub fn clamp_pixel_ratio(dpr: f64) -> f64 {
    if dpr.is_finite() && dpr > 0.0 {
        dpr.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

/// Drawable pixels along one axis for a CSS extent.
#[inline]
pub fn drawable_extent(css: f64, pixel_ratio: f64) -> u32 {
    if css.is_finite() && css > 0.0 {
        (css * pixel_ratio).floor() as u32
    } else {
        0
    }
}

/// Outcome of re-measuring the container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceChange {
    Resized { width: u32, height: u32 },
    Unchanged,
    /// Zero drawable area; drawing is suspended until a positive resize.
    Hidden,
}

/// Measured CSS size, clamped pixel ratio and the drawable size the GPU
/// surface is configured with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceState {
    css_width: f64,
    css_height: f64,
    pixel_ratio: f64,
    width: u32,
    height: u32,
    max_extent: u32,
    hidden: bool,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            css_width: 0.0,
            css_height: 0.0,
            pixel_ratio: 1.0,
            width: 0,
            height: 0,
            max_extent: u32::MAX,
            hidden: true,
        }
    }
}

impl SurfaceState {
    pub fn measure(&mut self, css_width: f64, css_height: f64, dpr: f64) -> SurfaceChange {
        let ratio = clamp_pixel_ratio(dpr);
        let width = drawable_extent(css_width, ratio).min(self.max_extent);
        let height = drawable_extent(css_height, ratio).min(self.max_extent);
        self.css_width = css_width;
        self.css_height = css_height;
        if width == 0 || height == 0 {
            // keep the last configured size; nothing is drawn while hidden
            self.hidden = true;
            return SurfaceChange::Hidden;
        }
        let changed = self.hidden
            || width != self.width
            || height != self.height
            || ratio != self.pixel_ratio;
        self.pixel_ratio = ratio;
        self.hidden = false;
        if !changed {
            return SurfaceChange::Unchanged;
        }
        self.width = width;
        self.height = height;
        SurfaceChange::Resized { width, height }
    }

    /// Cap both axes of the drawable size, e.g. at the GPU's texture limit.
    /// Takes effect on the next [`measure`](Self::measure).
    pub fn set_max_extent(&mut self, limit: u32) {
        self.max_extent = limit.max(1);
    }

    pub fn max_extent(&self) -> u32 {
        self.max_extent
    }

    #[inline]
    pub fn is_drawable(&self) -> bool {
        !self.hidden && self.width > 0 && self.height > 0
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn css_size(&self) -> (f64, f64) {
        (self.css_width, self.css_height)
    }

    /// Resolution uniform; always the configured drawable size.
    pub fn resolution(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

/// Bounding rectangle of the drawing surface in page (client) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CssRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Map a client-space point onto surface pixels with the origin at the
/// bottom-left, as the fragment shader sees them.
///
/// Returns `None` for zero-area rectangles, an unsized surface or non-finite
/// input.
pub fn page_to_surface(client: Vec2, rect: CssRect, width: u32, height: u32) -> Option<Vec2> {
    if !(rect.width > 0.0 && rect.height > 0.0) || width == 0 || height == 0 {
        return None;
    }
    let sx = width as f64 / rect.width;
    let sy = height as f64 / rect.height;
    let x = (client.x as f64 - rect.left) * sx;
    let y = (rect.height - (client.y as f64 - rect.top)) * sy;
    let p = Vec2::new(x as f32, y as f32);
    p.is_finite().then_some(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped_at_two() {
        assert_eq!(clamp_pixel_ratio(1.0), 1.0);
        assert_eq!(clamp_pixel_ratio(1.5), 1.5);
        assert_eq!(clamp_pixel_ratio(3.0), 2.0);
        assert_eq!(clamp_pixel_ratio(0.0), 1.0);
        assert_eq!(clamp_pixel_ratio(f64::NAN), 1.0);
    }

    #[test]
    fn drawable_size_floors_scaled_css() {
        let mut s = SurfaceState::default();
        assert_eq!(
            s.measure(100.5, 50.25, 2.0),
            SurfaceChange::Resized {
                width: 201,
                height: 100
            }
        );
        assert_eq!(s.resolution(), [201.0, 100.0]);
        assert_eq!(s.measure(100.5, 50.25, 2.0), SurfaceChange::Unchanged);
        // 3x displays render at 2x
        assert_eq!(
            s.measure(100.0, 100.0, 3.0),
            SurfaceChange::Resized {
                width: 200,
                height: 200
            }
        );
    }

    #[test]
    fn zero_area_hides_then_recovers() {
        let mut s = SurfaceState::default();
        assert!(!s.is_drawable());
        s.measure(10.0, 10.0, 1.0);
        assert!(s.is_drawable());
        assert_eq!(s.measure(0.0, 0.0, 1.0), SurfaceChange::Hidden);
        assert!(!s.is_drawable());
        assert_eq!(s.width(), 10);
        // same size as before still reports a resize after being hidden
        assert_eq!(
            s.measure(10.0, 10.0, 1.0),
            SurfaceChange::Resized {
                width: 10,
                height: 10
            }
        );
        assert!(s.is_drawable());
    }

    #[test]
    fn max_extent_caps_each_axis() {
        let mut s = SurfaceState::default();
        s.measure(5000.0, 800.0, 2.0);
        assert_eq!(s.width(), 10000);
        s.set_max_extent(8192);
        assert_eq!(
            s.measure(5000.0, 800.0, 2.0),
            SurfaceChange::Resized {
                width: 8192,
                height: 1600
            }
        );
        assert_eq!(s.resolution(), [8192.0, 1600.0]);
        assert_eq!(s.measure(5000.0, 800.0, 2.0), SurfaceChange::Unchanged);
        assert_eq!(s.max_extent(), 8192);
        s.set_max_extent(0);
        assert_eq!(s.max_extent(), 1);
    }

    #[test]
    fn page_mapping_flips_and_scales() {
        let rect = CssRect {
            left: 10.0,
            top: 20.0,
            width: 100.0,
            height: 50.0,
        };
        let p = page_to_surface(Vec2::new(35.0, 30.0), rect, 200, 100).unwrap();
        assert!((p.x - 50.0).abs() < 1e-4);
        assert!((p.y - 80.0).abs() < 1e-4);
        // top-left of the rect maps to the top of the surface
        let tl = page_to_surface(Vec2::new(10.0, 20.0), rect, 200, 100).unwrap();
        assert_eq!(tl, Vec2::new(0.0, 100.0));
    }

    #[test]
    fn page_mapping_rejects_degenerate_input() {
        let empty = CssRect {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
        };
        assert!(page_to_surface(Vec2::ZERO, empty, 10, 10).is_none());
        let rect = CssRect {
            width: 10.0,
            height: 10.0,
            ..empty
        };
        assert!(page_to_surface(Vec2::ZERO, rect, 0, 10).is_none());
        assert!(page_to_surface(Vec2::new(f32::NAN, 1.0), rect, 10, 10).is_none());
    }
}
