//! Overlay placement and dashboard records, plus overlay id helpers.
//!
//! Overlay ids are `::`-separated paths rooted at `overlay`:
//!   component id: `overlay::<id>::<KIND>`
//!   unique id:    `overlay::<id>::<KIND>::<WINDOW_TYPE>`

use crate::geometry::RectI;
use crate::vr::VRLayout;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const OVERLAY_ID_PREFIX: &str = "overlay";
pub const OVERLAY_ID_SEPARATOR: &str = "::";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayIdError {
    #[error("Invalid id kind (component or unique) {0}")]
    InvalidIdKind(String),
    #[error("Invalid uniqueId {0}")]
    InvalidUniqueId(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverlayKind {
    TrackMap,
    Clock,
    Custom,
    Plugin,
    EditorInfo,
}

impl OverlayKind {
    pub const fn name(self) -> &'static str {
        match self {
            OverlayKind::TrackMap => "TRACK_MAP",
            OverlayKind::Clock => "CLOCK",
            OverlayKind::Custom => "CUSTOM",
            OverlayKind::Plugin => "PLUGIN",
            OverlayKind::EditorInfo => "EDITOR_INFO",
        }
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where an overlay is shown: a desktop window or a VR widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverlayBrowserWindowType {
    Screen,
    Vr,
}

impl OverlayBrowserWindowType {
    pub const ALL: [OverlayBrowserWindowType; 2] =
        [OverlayBrowserWindowType::Screen, OverlayBrowserWindowType::Vr];

    pub const fn name(self) -> &'static str {
        match self {
            OverlayBrowserWindowType::Screen => "SCREEN",
            OverlayBrowserWindowType::Vr => "VR",
        }
    }
}

impl fmt::Display for OverlayBrowserWindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One overlay placed on a dashboard, with its screen and/or VR geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayPlacement {
    pub id: String,
    pub overlay_id: String,
    pub screen_rect: Option<RectI>,
    pub vr_layout: Option<VRLayout>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    pub id: String,
    pub name: String,
    pub vr_enabled: bool,
    pub screen_enabled: bool,
    pub placements: Vec<OverlayPlacement>,
}

/// Splits an id into segments, dropping a leading `overlay` root.
fn id_segments(id: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = id.split(OVERLAY_ID_SEPARATOR).collect();
    if parts.first() == Some(&OVERLAY_ID_PREFIX) {
        parts.remove(0);
    }
    parts
}

fn join_id(parts: &[&str]) -> String {
    let mut all = Vec::with_capacity(parts.len() + 1);
    all.push(OVERLAY_ID_PREFIX);
    all.extend_from_slice(parts);
    all.join(OVERLAY_ID_SEPARATOR)
}

pub fn is_valid_overlay_id_kind(id: &str) -> bool {
    id.strip_prefix(OVERLAY_ID_PREFIX)
        .is_some_and(|rest| rest.starts_with(OVERLAY_ID_SEPARATOR))
}

pub fn assert_valid_overlay_id_kind(id: &str) -> Result<&str, OverlayIdError> {
    if is_valid_overlay_id_kind(id) {
        Ok(id)
    } else {
        Err(OverlayIdError::InvalidIdKind(id.to_string()))
    }
}

pub fn is_valid_overlay_unique_id(id: &str) -> bool {
    is_valid_overlay_id_kind(id)
        && OverlayBrowserWindowType::ALL
            .iter()
            .any(|window_type| id.ends_with(window_type.name()))
}

pub fn assert_valid_overlay_unique_id(id: &str) -> Result<&str, OverlayIdError> {
    if is_valid_overlay_unique_id(id) {
        Ok(id)
    } else {
        Err(OverlayIdError::InvalidUniqueId(id.to_string()))
    }
}

/// Builds `overlay::<id>::<KIND>`.
pub fn overlay_component_id(id: &str, kind: OverlayKind) -> String {
    let mut parts = id_segments(id);
    parts.push(kind.name());
    join_id(&parts)
}

/// Builds `overlay::<id>::<KIND>::<WINDOW_TYPE>` from either a bare overlay
/// id or an existing component id of the same kind.
pub fn overlay_unique_id(
    id_or_component_id: &str,
    window_type: OverlayBrowserWindowType,
    kind: OverlayKind,
) -> String {
    let mut parts = id_segments(id_or_component_id);
    if parts.last() == Some(&kind.name()) {
        parts.pop();
    }
    parts.push(kind.name());
    parts.push(window_type.name());
    join_id(&parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_id() {
        assert_eq!(
            overlay_component_id("track-map-1", OverlayKind::TrackMap),
            "overlay::track-map-1::TRACK_MAP"
        );
        // An already rooted id is not rooted twice.
        assert_eq!(
            overlay_component_id("overlay::clock", OverlayKind::Clock),
            "overlay::clock::CLOCK"
        );
    }

    #[test]
    fn test_unique_id_from_id_and_component_id() {
        let from_id = overlay_unique_id("abc", OverlayBrowserWindowType::Vr, OverlayKind::Plugin);
        assert_eq!(from_id, "overlay::abc::PLUGIN::VR");

        let component = overlay_component_id("abc", OverlayKind::Plugin);
        let from_component =
            overlay_unique_id(&component, OverlayBrowserWindowType::Vr, OverlayKind::Plugin);
        assert_eq!(from_component, from_id);
        assert!(is_valid_overlay_unique_id(&from_id));
    }

    #[test]
    fn test_id_validation() {
        assert!(is_valid_overlay_id_kind("overlay::x::CLOCK"));
        assert!(!is_valid_overlay_id_kind("overlayx::CLOCK"));
        assert!(!is_valid_overlay_unique_id("overlay::x::CLOCK"));
        assert!(is_valid_overlay_unique_id("overlay::x::CLOCK::SCREEN"));

        assert_eq!(
            assert_valid_overlay_unique_id("clock"),
            Err(OverlayIdError::InvalidUniqueId("clock".into()))
        );
        assert_eq!(
            assert_valid_overlay_id_kind("overlay::x::CLOCK"),
            Ok("overlay::x::CLOCK")
        );
    }

    #[test]
    fn test_dashboard_deserializes_with_missing_fields() {
        let json = r#"{
            "id": "dash-1",
            "vrEnabled": true,
            "placements": [
                { "id": "p1", "overlayId": "clock",
                  "vrLayout": { "pose": { "x": 0.0, "eyeY": 0.0, "z": -1.0 },
                                "size": { "width": 0.5, "height": 0.5 },
                                "screenRect": { "size": { "width": 0, "height": 0 },
                                                "position": { "x": 0, "y": 0 } } } }
            ]
        }"#;
        let config: DashboardConfig = serde_json::from_str(json).unwrap();
        assert!(config.vr_enabled);
        assert!(!config.screen_enabled);
        assert_eq!(config.placements.len(), 1);
        assert!(config.placements[0].screen_rect.is_none());
        assert_eq!(config.placements[0].vr_layout.unwrap().size.width, 0.5);
    }

    #[test]
    fn test_kind_names_match_serde() {
        assert_eq!(
            serde_json::to_value(OverlayKind::EditorInfo).unwrap(),
            serde_json::json!(OverlayKind::EditorInfo.name())
        );
        assert_eq!(OverlayBrowserWindowType::Vr.to_string(), "VR");
    }
}
