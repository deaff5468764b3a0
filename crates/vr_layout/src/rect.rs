//! Rectangle guards shared by the transform and the editor callers.

use vrkit_models::{PositionF, RectF, RectI};

/// Read access to a rectangle's edges as `f64`, for integer and float rects.
pub trait RectBounds {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
    fn width(&self) -> f64;
    fn height(&self) -> f64;
}

impl RectBounds for RectI {
    #[inline]
    fn x(&self) -> f64 {
        self.position.x as f64
    }
    #[inline]
    fn y(&self) -> f64 {
        self.position.y as f64
    }
    #[inline]
    fn width(&self) -> f64 {
        self.size.width as f64
    }
    #[inline]
    fn height(&self) -> f64 {
        self.size.height as f64
    }
}

impl RectBounds for RectF {
    #[inline]
    fn x(&self) -> f64 {
        self.position.x
    }
    #[inline]
    fn y(&self) -> f64 {
        self.position.y
    }
    #[inline]
    fn width(&self) -> f64 {
        self.size.width
    }
    #[inline]
    fn height(&self) -> f64 {
        self.size.height
    }
}

/// Inclusive bounds test: points on any edge are inside.
pub fn is_point_in_rect<R: RectBounds>(point: impl Into<PositionF>, rect: &R) -> bool {
    let p = point.into();
    p.x >= rect.x()
        && p.x <= rect.x() + rect.width()
        && p.y >= rect.y()
        && p.y <= rect.y() + rect.height()
}

/// A rect is valid when present, all four components are finite numbers, and
/// both sides are strictly positive. Negative positions are allowed.
pub fn is_rect_valid<R: RectBounds>(rect: Option<&R>) -> bool {
    let Some(rect) = rect else {
        return false;
    };

    let components = [rect.x(), rect.y(), rect.width(), rect.height()];
    components.iter().all(|v| v.is_finite()) && rect.width() > 0.0 && rect.height() > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrkit_models::PositionI;

    #[test]
    fn test_rect_valid_boundaries() {
        assert!(!is_rect_valid(Some(&RectI::new(0, 0, 0, 5))));
        assert!(!is_rect_valid::<RectI>(None));
        assert!(is_rect_valid(Some(&RectI::new(-5, -5, 1, 1))));
    }

    #[test]
    fn test_rect_valid_rejects_non_finite() {
        assert!(!is_rect_valid(Some(&RectF::new(f64::NAN, 0.0, 1.0, 1.0))));
        assert!(!is_rect_valid(Some(&RectF::new(0.0, 0.0, f64::INFINITY, 1.0))));
        assert!(!is_rect_valid(Some(&RectF::new(0.0, 0.0, 1.0, -1.0))));
        assert!(is_rect_valid(Some(&RectF::new(-0.5, 0.5, 0.1, 0.1))));
    }

    #[test]
    fn test_point_in_rect_is_inclusive() {
        let rect = RectI::new(10, 10, 20, 20);
        assert!(is_point_in_rect(PositionI::new(10, 10), &rect));
        assert!(is_point_in_rect(PositionI::new(30, 30), &rect));
        assert!(is_point_in_rect(PositionF::new(20.5, 11.0), &rect));
        assert!(!is_point_in_rect(PositionI::new(31, 30), &rect));
        assert!(!is_point_in_rect(PositionF::new(15.0, 9.99), &rect));
    }
}
