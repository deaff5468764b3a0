// src/lib.rs
//! Memoized, predicate-gated derivations over an observable shared state.
//!
//! - [`SharedState`] holds a value and notifies observers after each update.
//! - [`CachedStateComputation`] selects a source value from that state,
//!   recomputes a target only when the source changes, and notifies its own
//!   listeners when a predicate accepts the new target.
//! - [`LiveAutoConnectComputation`] uses the primitive to signal "connect to
//!   the live session" at most once per live session id.

pub mod app_state;
pub mod computation;
pub mod live_auto_connect;
pub mod shared_state;

pub use self::app_state::{ActiveSessionType, AppSettings, SessionDetail, SessionManagerState, SharedAppState};
pub use self::computation::{
    CachedStateComputation, ChangeEvent, ComputationOptions, ComputationState, ListenerId,
    TargetSource, TransformContext,
};
pub use self::live_auto_connect::{AutoConnectSource, LiveAutoConnectChangeEvent, LiveAutoConnectComputation};
pub use self::shared_state::{ObserverId, SharedState};
