// src/lib.rs
//! Shared data model for VRKit overlay placement.
//!
//! This crate defines the plain value shapes that the layout transform and
//! the dashboard/overlay records are expressed in:
//! - Integer (pixel) and floating (normalized) sizes, positions and rects.
//! - The VR widget pose and layout, plus the fixed layout constants.
//! - Overlay placements, dashboards and overlay id helpers.

pub mod geometry;
pub mod overlay;
pub mod vr;

// Re-export commonly used types for convenience.
pub use self::geometry::{PositionF, PositionI, RectF, RectI, ScaleToFitMode, SizeF, SizeI};
pub use self::overlay::{
    DashboardConfig, OverlayBrowserWindowType, OverlayIdError, OverlayKind, OverlayPlacement,
};
pub use self::vr::{
    VRLayout, VRPose, VR_LAYOUT_BOUNDS_DIAMETER, VR_LAYOUT_BOUNDS_RADIUS, VR_LAYOUT_DEPTH,
    VR_LAYOUT_MAX_WIDGETS, VR_LAYOUT_SCREEN_DIMENSION,
};
