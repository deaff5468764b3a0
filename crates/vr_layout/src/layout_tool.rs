//! Free-space search used to auto-place new overlays.
//!
//! `RectangleLayoutTool` walks a grid of candidate top-left positions inside
//! a container rect, nearest-to-anchor first, and returns the first candidate
//! that overlaps none of the already occupied rectangles.

use crate::error::LayoutError;
use glam::DVec2;
use vrkit_models::{PositionF, RectF, RectI, SizeF};

/// Grid step for integral (pixel) containers.
const INTEGRAL_INCREMENT: f64 = 1.0;

/// Grid step for floating (normalized) containers.
const FLOATING_INCREMENT: f64 = 0.1;

/// Tolerance when counting grid steps, so `1.0 / 0.1` yields 10 steps.
const STEP_EPSILON: f64 = 1e-9;

/// Upper bound on grid candidates per search; larger grids are rejected.
pub const MAX_CANDIDATES: u64 = 4_000_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutRect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Strict overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &LayoutRect) -> bool {
        !(self.x + self.width <= other.x
            || other.x + other.width <= self.x
            || self.y + self.height <= other.y
            || other.y + other.height <= self.y)
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

impl From<RectF> for LayoutRect {
    fn from(rect: RectF) -> Self {
        LayoutRect::new(
            rect.position.x,
            rect.position.y,
            rect.size.width,
            rect.size.height,
        )
    }
}

impl From<RectI> for LayoutRect {
    fn from(rect: RectI) -> Self {
        RectF::from(rect).into()
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    position: DVec2,
    distance: f64,
}

#[derive(Debug, Clone)]
pub struct RectangleLayoutTool {
    rect: RectF,
    is_floating: bool,
    increment: f64,
    preferred_position: PositionF,
    occupied: Vec<LayoutRect>,
}

impl RectangleLayoutTool {
    /// Creates a tool over `rect`.
    ///
    /// `is_floating` selects a 0.1 grid (normalized/VR space) instead of a
    /// 1 px grid. `preferred_position` defaults to the container centre.
    pub fn new(
        rect: impl Into<RectF>,
        is_floating: bool,
        preferred_position: Option<PositionF>,
    ) -> Self {
        let rect = rect.into();
        let center = PositionF::new(
            rect.position.x + rect.size.width / 2.0,
            rect.position.y + rect.size.height / 2.0,
        );

        Self {
            rect,
            is_floating,
            increment: if is_floating {
                FLOATING_INCREMENT
            } else {
                INTEGRAL_INCREMENT
            },
            preferred_position: preferred_position.unwrap_or(center),
            occupied: Vec::new(),
        }
    }

    /// Euclidean distance between two points.
    pub fn calculate_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
        DVec2::new(x1, y1).distance(DVec2::new(x2, y2))
    }

    pub fn center_position(&self) -> PositionF {
        PositionF::new(
            self.rect.position.x + self.rect.size.width / 2.0,
            self.rect.position.y + self.rect.size.height / 2.0,
        )
    }

    #[inline]
    pub fn is_floating(&self) -> bool {
        self.is_floating
    }

    #[inline]
    pub fn increment(&self) -> f64 {
        self.increment
    }

    #[inline]
    pub fn total_size(&self) -> SizeF {
        self.rect.size
    }

    #[inline]
    pub fn preferred_position(&self) -> PositionF {
        self.preferred_position
    }

    #[inline]
    pub fn occupied(&self) -> &[LayoutRect] {
        &self.occupied
    }

    pub fn push(&mut self, rect: impl Into<LayoutRect>) {
        self.occupied.push(rect.into());
    }

    pub fn extend<I>(&mut self, rects: I)
    where
        I: IntoIterator,
        I::Item: Into<LayoutRect>,
    {
        self.occupied.extend(rects.into_iter().map(Into::into));
    }

    /// Number of grid steps that fit in `free` space (inclusive of zero).
    fn step_count(&self, free: f64) -> Option<u64> {
        if free.is_nan() || free < 0.0 {
            return None;
        }
        Some((free / self.increment + STEP_EPSILON).floor() as u64)
    }

    /// Finds the top-left position closest to the anchor where a
    /// `target_width` x `target_height` rect overlaps nothing occupied.
    ///
    /// Distance is measured from the candidate's centre to the anchor.
    /// Returns `None` when the target does not fit anywhere, or when the
    /// grid would exceed [`MAX_CANDIDATES`] positions.
    pub fn find_position_closest_to_anchor(
        &self,
        target_width: f64,
        target_height: f64,
    ) -> Option<PositionF> {
        let x_steps = self.step_count(self.rect.size.width - target_width)?;
        let y_steps = self.step_count(self.rect.size.height - target_height)?;

        let origin = DVec2::new(self.rect.position.x, self.rect.position.y);
        let half = DVec2::new(target_width, target_height) / 2.0;
        let anchor = DVec2::new(self.preferred_position.x, self.preferred_position.y);

        let candidate_count = x_steps
            .checked_add(1)
            .zip(y_steps.checked_add(1))
            .and_then(|(columns, rows)| columns.checked_mul(rows))
            .filter(|count| *count <= MAX_CANDIDATES);
        let Some(candidate_count) = candidate_count else {
            log::warn!(
                "Search grid for {}x{} in {:?} exceeds {} candidates",
                target_width,
                target_height,
                self.rect.size,
                MAX_CANDIDATES
            );
            return None;
        };

        let mut candidates = Vec::with_capacity(candidate_count as usize);
        for i in 0..=x_steps {
            for j in 0..=y_steps {
                let offset = DVec2::new(i as f64, j as f64) * self.increment;
                let position = origin + offset;
                candidates.push(Candidate {
                    position,
                    distance: (position + half).distance(anchor),
                });
            }
        }

        log::trace!(
            "Checking {} candidate positions for {}x{}",
            candidates.len(),
            target_width,
            target_height
        );

        // Stable, so equally distant candidates keep grid order.
        candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        let found = candidates.into_iter().find(|candidate| {
            let rect = LayoutRect::new(
                candidate.position.x,
                candidate.position.y,
                target_width,
                target_height,
            );
            !self.occupied.iter().any(|shape| rect.intersects(shape))
        });

        match found {
            Some(candidate) => {
                let position = PositionF::new(candidate.position.x, candidate.position.y);
                log::debug!("Optimal position is ({}, {})", position.x, position.y);
                Some(position)
            }
            None => {
                log::debug!("No available space for {}x{}", target_width, target_height);
                None
            }
        }
    }

    /// Finds a free position and marks it occupied, so successive calls
    /// place rectangles without overlap.
    pub fn place(
        &mut self,
        target_width: f64,
        target_height: f64,
    ) -> Result<PositionF, LayoutError> {
        let position = self
            .find_position_closest_to_anchor(target_width, target_height)
            .ok_or(LayoutError::NoSpaceAvailable {
                width: target_width,
                height: target_height,
            })?;

        self.push(LayoutRect::new(
            position.x,
            position.y,
            target_width,
            target_height,
        ));
        Ok(position)
    }
}
