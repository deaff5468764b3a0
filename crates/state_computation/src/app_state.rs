//! The slice of shared application state the session computations read.

use serde::{Deserialize, Serialize};

/// Which session, if any, is currently driving the overlays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActiveSessionType {
    #[default]
    None,
    Live,
    Disk,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub auto_connect_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionDetail {
    pub id: u64,
    pub is_available: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionManagerState {
    pub active_session_type: ActiveSessionType,
    pub live_session: Option<SessionDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SharedAppState {
    pub settings: AppSettings,
    pub sessions: SessionManagerState,
}

impl SharedAppState {
    /// Whether a live session exists and reports itself available.
    pub fn is_live_session_available(&self) -> bool {
        self.sessions
            .live_session
            .as_ref()
            .is_some_and(|session| session.is_available)
    }

    /// The live session id, if a live session with a non-zero id exists.
    pub fn live_session_id(&self) -> Option<u64> {
        self.sessions
            .live_session
            .as_ref()
            .map(|session| session.id)
            .filter(|id| *id != 0)
    }
}
