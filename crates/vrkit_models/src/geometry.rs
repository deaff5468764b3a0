//! Pixel and normalized geometry value types.
//!
//! Screen-space values use a top-left origin with y pointing down. Every type
//! here is a small `Copy` value; conversions create fresh values.

use serde::{Deserialize, Serialize};

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeI {
    pub width: u32,
    pub height: u32,
}

/// Normalized (or otherwise fractional) dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeF {
    pub width: f64,
    pub height: f64,
}

/// Pixel offset, top-left origin, y-down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionI {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionF {
    pub x: f64,
    pub y: f64,
}

/// A top-left + size rectangle in pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RectI {
    pub size: SizeI,
    pub position: PositionI,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RectF {
    pub size: SizeF,
    pub position: PositionF,
}

/// Controls whether `scaled_to_fit` may enlarge, shrink, or both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScaleToFitMode {
    #[default]
    ShrinkOrGrow,
    GrowOnly,
    ShrinkOnly,
}

impl ScaleToFitMode {
    /// Returns `true` if a uniform `scale` is permitted under this mode.
    #[inline]
    fn allows(self, scale: f64) -> bool {
        match self {
            ScaleToFitMode::ShrinkOrGrow => true,
            ScaleToFitMode::GrowOnly => scale >= 1.0,
            ScaleToFitMode::ShrinkOnly => scale <= 1.0,
        }
    }
}

/// Uniform factor that fits `(w, h)` inside `(cw, ch)` without distortion.
#[inline]
fn fit_scale(w: f64, h: f64, cw: f64, ch: f64) -> f64 {
    (cw / w).min(ch / h)
}

impl SizeI {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A size with either side equal to zero has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The smaller of width and height.
    #[inline]
    pub fn min_dimension(&self) -> u32 {
        self.width.min(self.height)
    }

    /// Scales this size uniformly so it fits inside `container`, keeping the
    /// aspect ratio. The result is rounded to whole pixels.
    pub fn scaled_to_fit(&self, container: SizeI, mode: ScaleToFitMode) -> SizeI {
        let scaled = SizeF::from(*self).scaled_to_fit(container.into(), mode);
        SizeI::new(
            scaled.width.round() as u32,
            scaled.height.round() as u32,
        )
    }
}

impl SizeF {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Scales this size uniformly so it fits inside `container`.
    pub fn scaled_to_fit(&self, container: SizeF, mode: ScaleToFitMode) -> SizeF {
        let scale = fit_scale(self.width, self.height, container.width, container.height);
        if !mode.allows(scale) {
            return *self;
        }

        SizeF::new(self.width * scale, self.height * scale)
    }
}

impl PositionI {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl PositionF {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl RectI {
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            size: SizeI::new(width, height),
            position: PositionI::new(x, y),
        }
    }
}

impl RectF {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            size: SizeF::new(width, height),
            position: PositionF::new(x, y),
        }
    }
}

impl From<SizeI> for SizeF {
    #[inline]
    fn from(size: SizeI) -> Self {
        SizeF::new(size.width as f64, size.height as f64)
    }
}

impl From<PositionI> for PositionF {
    #[inline]
    fn from(pos: PositionI) -> Self {
        PositionF::new(pos.x as f64, pos.y as f64)
    }
}

impl From<RectI> for RectF {
    #[inline]
    fn from(rect: RectI) -> Self {
        RectF {
            size: rect.size.into(),
            position: rect.position.into(),
        }
    }
}
