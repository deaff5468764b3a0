//! Dashboard-level helpers over the layout transform.
//!
//! Loading a dashboard refreshes the canonical backing rects of its VR
//! placements, and the VR editor maps placements to and from its surface.

use crate::error::LayoutError;
use crate::rect::is_rect_valid;
use crate::transform::{
    convert_vr_layout_to_screen_rect, convert_vr_size_to_screen_rect,
    try_convert_screen_rect_to_vr_layout,
};
use vrkit_models::{
    DashboardConfig, OverlayPlacement, RectF, RectI, SizeI, VR_LAYOUT_MAX_WIDGETS,
};

/// Number of placements that carry a VR layout.
pub fn vr_placement_count(config: &DashboardConfig) -> usize {
    config
        .placements
        .iter()
        .filter(|p| p.vr_layout.is_some())
        .count()
}

/// Whether the dashboard places more VR widgets than the compositor accepts.
pub fn exceeds_vr_widget_limit(config: &DashboardConfig) -> bool {
    vr_placement_count(config) > VR_LAYOUT_MAX_WIDGETS
}

/// Recomputes `vr_layout.screen_rect` for every VR placement with a usable
/// size. Dashboards without VR enabled are left untouched.
///
/// Returns the number of placements refreshed.
pub fn refresh_canonical_screen_rects(config: &mut DashboardConfig) -> usize {
    if !config.vr_enabled {
        return 0;
    }

    if exceeds_vr_widget_limit(config) {
        log::warn!(
            "Dashboard ({}) has {} VR placements, more than the {} supported",
            config.id,
            vr_placement_count(config),
            VR_LAYOUT_MAX_WIDGETS
        );
    }

    let mut refreshed = 0;
    for placement in config.placements.iter_mut() {
        let Some(vr_layout) = placement.vr_layout.as_mut() else {
            continue;
        };

        let size_rect = RectF {
            size: vr_layout.size,
            ..RectF::default()
        };
        if !is_rect_valid(Some(&size_rect)) {
            log::debug!("Placement ({}) has no usable VR size", placement.id);
            continue;
        }

        vr_layout.screen_rect = convert_vr_size_to_screen_rect(vr_layout.size);
        refreshed += 1;
    }

    log::debug!("Refreshed {} canonical rects on dashboard ({})", refreshed, config.id);
    refreshed
}

/// Editor-surface rects for every VR placement, keyed by placement id.
pub fn editor_screen_rects(surface: SizeI, config: &DashboardConfig) -> Vec<(&str, RectI)> {
    config
        .placements
        .iter()
        .filter_map(|p| {
            p.vr_layout
                .as_ref()
                .map(|vr| (p.id.as_str(), convert_vr_layout_to_screen_rect(surface, vr)))
        })
        .collect()
}

/// Applies an editor drag/resize result to a placement's VR layout.
pub fn apply_editor_rect(
    surface: SizeI,
    placement: &mut OverlayPlacement,
    editor_rect: RectI,
) -> Result<(), LayoutError> {
    let vr_layout = try_convert_screen_rect_to_vr_layout(surface, editor_rect)?;
    placement.vr_layout = Some(vr_layout);
    Ok(())
}
