// src/lib.rs
//! Conversion between normalized VR widget placement and 2D pixel rectangles.
//!
//! The VR space is a fixed square of diameter 2 centred on the origin; screen
//! surfaces are arbitrary pixel sizes. Conversions scale by the smaller
//! surface dimension so the square always fits without distortion, and are
//! exact inverses of each other up to pixel rounding.

pub mod dashboard;
pub mod error;
pub mod layout_tool;
pub mod rect;
pub mod transform;

pub use self::error::LayoutError;
pub use self::layout_tool::{LayoutRect, RectangleLayoutTool};
pub use self::rect::{is_point_in_rect, is_rect_valid, RectBounds};
pub use self::transform::{
    convert_screen_rect_to_vr_layout, convert_vr_layout_to_screen_rect,
    convert_vr_size_to_screen_rect, try_convert_screen_rect_to_vr_layout,
    try_convert_vr_layout_to_screen_rect,
};
