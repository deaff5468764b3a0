//! Screen <-> VR placement conversions.
//!
//! Screen rects are top-left + size in a surface's pixel space (y-down).
//! VR layouts are centre pose + size in the normalized `[-1, 1]` square
//! (y-up). Both directions scale by `min(surface) / VR_LAYOUT_BOUNDS_DIAMETER`.

use crate::error::LayoutError;
use crate::rect::is_rect_valid;
use vrkit_models::{
    PositionI, RectI, SizeF, SizeI, VRLayout, VRPose, VR_LAYOUT_BOUNDS_DIAMETER,
    VR_LAYOUT_BOUNDS_RADIUS, VR_LAYOUT_DEPTH, VR_LAYOUT_SCREEN_DIMENSION,
};

/// Pixels per normalized VR unit on the given surface.
#[inline]
fn surface_scale(surface: SizeI) -> f64 {
    surface.min_dimension() as f64 / VR_LAYOUT_BOUNDS_DIAMETER
}

/// Rounds half away from zero; saturates out-of-range values.
#[inline]
fn round_px(value: f64) -> i32 {
    value.round() as i32
}

#[inline]
fn round_len(value: f64) -> u32 {
    value.round() as u32
}

/// Computes the canonical backing-texture rect for a VR widget of `vr_size`.
///
/// The result depends only on the normalized size, never on a physical
/// display, and is always positioned at the origin.
pub fn convert_vr_size_to_screen_rect(vr_size: impl Into<SizeF>) -> RectI {
    let vr_size = vr_size.into();
    let scale = VR_LAYOUT_SCREEN_DIMENSION / VR_LAYOUT_BOUNDS_DIAMETER;

    RectI {
        size: SizeI::new(
            round_len(vr_size.width * scale),
            round_len(vr_size.height * scale),
        ),
        position: PositionI::default(),
    }
}

/// Converts an editor-surface rectangle into a VR layout.
///
/// No validation is performed; see [`try_convert_screen_rect_to_vr_layout`].
pub fn convert_screen_rect_to_vr_layout(surface: SizeI, screen_rect: RectI) -> VRLayout {
    let scale = surface_scale(surface);

    let size = SizeF::new(
        screen_rect.size.width as f64 / scale,
        screen_rect.size.height as f64 / scale,
    );

    // Left/top edges -> centre, with the vertical axis flipped to up-positive.
    let x = (screen_rect.position.x as f64 / scale) - VR_LAYOUT_BOUNDS_RADIUS + (size.width / 2.0);
    let eye_y =
        -((screen_rect.position.y as f64 / scale) - VR_LAYOUT_BOUNDS_RADIUS) - (size.height / 2.0);

    VRLayout {
        pose: VRPose {
            x,
            eye_y,
            z: VR_LAYOUT_DEPTH,
        },
        size,
        screen_rect: convert_vr_size_to_screen_rect(size),
    }
}

/// Converts a VR layout back into a rectangle on the given editor surface.
///
/// Size and position are both rounded to the nearest pixel.
pub fn convert_vr_layout_to_screen_rect(surface: SizeI, vr_layout: &VRLayout) -> RectI {
    let scale = surface_scale(surface);
    let VRLayout { pose, size, .. } = vr_layout;

    let x = (pose.x + VR_LAYOUT_BOUNDS_RADIUS - size.width / 2.0) * scale;
    let y = (-pose.eye_y + VR_LAYOUT_BOUNDS_RADIUS - size.height / 2.0) * scale;

    RectI {
        size: SizeI::new(round_len(size.width * scale), round_len(size.height * scale)),
        position: PositionI::new(round_px(x), round_px(y)),
    }
}

fn check_surface(surface: SizeI) -> Result<(), LayoutError> {
    if surface.is_empty() {
        return Err(LayoutError::InvalidSurface {
            width: surface.width,
            height: surface.height,
        });
    }
    Ok(())
}

/// [`convert_screen_rect_to_vr_layout`] with the surface and rect guarded.
pub fn try_convert_screen_rect_to_vr_layout(
    surface: SizeI,
    screen_rect: RectI,
) -> Result<VRLayout, LayoutError> {
    check_surface(surface)?;
    if !is_rect_valid(Some(&screen_rect)) {
        return Err(LayoutError::InvalidRect(format!("{screen_rect:?}")));
    }

    Ok(convert_screen_rect_to_vr_layout(surface, screen_rect))
}

/// [`convert_vr_layout_to_screen_rect`] with the surface and layout guarded.
pub fn try_convert_vr_layout_to_screen_rect(
    surface: SizeI,
    vr_layout: &VRLayout,
) -> Result<RectI, LayoutError> {
    check_surface(surface)?;

    let SizeF { width, height } = vr_layout.size;
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(LayoutError::InvalidVrSize { width, height });
    }

    let VRPose { x, eye_y, .. } = vr_layout.pose;
    if !(x.is_finite() && eye_y.is_finite()) {
        return Err(LayoutError::InvalidVrPose { x, eye_y });
    }

    Ok(convert_vr_layout_to_screen_rect(surface, vr_layout))
}
