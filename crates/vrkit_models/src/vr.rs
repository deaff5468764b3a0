//! VR widget placement types and the fixed layout constants.
//!
//! The normalized VR space is a square of diameter `VR_LAYOUT_BOUNDS_DIAMETER`
//! centred on the origin, so both axes span `[-1, 1]`. Unlike screen space,
//! the vertical axis (`eye_y`) is up-positive.

use crate::geometry::{RectI, SizeF};
use serde::{Deserialize, Serialize};

/// Side length of the normalized VR bounding square.
pub const VR_LAYOUT_BOUNDS_DIAMETER: f64 = 2.0;

/// Half of [`VR_LAYOUT_BOUNDS_DIAMETER`].
pub const VR_LAYOUT_BOUNDS_RADIUS: f64 = VR_LAYOUT_BOUNDS_DIAMETER / 2.0;

/// Pixel resolution of the full VR bounding square when pre-rendering widget
/// backing textures.
pub const VR_LAYOUT_SCREEN_DIMENSION: f64 = 2048.0;

/// Upper bound on concurrently placed VR overlays.
pub const VR_LAYOUT_MAX_WIDGETS: usize = 8;

/// All VR widgets live on a single depth plane.
pub const VR_LAYOUT_DEPTH: f64 = -1.0;

/// Centre of a VR widget in head-centred normalized space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VRPose {
    pub x: f64,
    /// Up-positive vertical position.
    pub eye_y: f64,
    pub z: f64,
}

impl VRPose {
    /// Creates a pose on the fixed widget depth plane.
    #[inline]
    pub const fn new(x: f64, eye_y: f64) -> Self {
        Self {
            x,
            eye_y,
            z: VR_LAYOUT_DEPTH,
        }
    }
}

impl Default for VRPose {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Full placement of a VR widget.
///
/// `screen_rect` is derived from `size` at the canonical backing texture
/// resolution. It is NOT the rectangle the widget occupies in any editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VRLayout {
    pub pose: VRPose,
    pub size: SizeF,
    pub screen_rect: RectI,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_defaults_to_widget_plane() {
        assert_eq!(VRPose::default().z, -1.0);
        assert_eq!(VRPose::new(0.5, 0.25).z, VR_LAYOUT_DEPTH);
        assert_eq!(VR_LAYOUT_BOUNDS_RADIUS, 1.0);
    }

    #[test]
    fn test_layout_uses_eye_y_field_name() {
        let layout = VRLayout {
            pose: VRPose::new(0.0, 0.5),
            size: SizeF::new(1.0, 1.0),
            screen_rect: RectI::new(0, 0, 1024, 1024),
        };
        let json = serde_json::to_value(layout).unwrap();
        assert_eq!(json["pose"]["eyeY"], 0.5);
        assert_eq!(json["screenRect"]["size"]["width"], 1024);

        let back: VRLayout = serde_json::from_value(json).unwrap();
        assert_eq!(back, layout);
    }
}
