//! Auto-connect to a live session, at most once per live session id.
//!
//! While auto-connect is enabled, the live session is available, and no
//! session is active, the computation emits the live session id the first
//! time it is seen. Ids already emitted are remembered in the instance cache,
//! so re-evaluations (including after the active session type flips and
//! reverts) never signal the same id twice.

use crate::app_state::{ActiveSessionType, SharedAppState};
use crate::computation::{
    CachedStateComputation, ChangeEvent, ComputationOptions, ComputationState, ListenerId,
    TargetSource, TransformContext,
};
use crate::shared_state::SharedState;
use std::collections::HashSet;
use std::sync::Arc;

/// The inputs the auto-connect decision depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AutoConnectSource {
    pub auto_connect_enabled: bool,
    pub is_available: bool,
    pub active_session_type: ActiveSessionType,
    pub live_session_id: Option<u64>,
}

/// `Some(id)` means "connect to live session `id` now"; `None` means no action.
pub type AutoConnectTarget = Option<u64>;

pub type LiveAutoConnectChangeEvent = ChangeEvent<AutoConnectSource, AutoConnectTarget>;

type Inner =
    CachedStateComputation<SharedAppState, AutoConnectSource, AutoConnectTarget, HashSet<u64>>;

pub fn select_auto_connect_source(state: &SharedAppState) -> AutoConnectSource {
    AutoConnectSource {
        auto_connect_enabled: state.settings.auto_connect_enabled,
        is_available: state.is_live_session_available(),
        active_session_type: state.sessions.active_session_type,
        live_session_id: state.live_session_id(),
    }
}

/// Decides whether to connect, recording every id it signals in `seen`.
pub fn auto_connect_transform(
    source: &AutoConnectSource,
    seen: &mut HashSet<u64>,
) -> AutoConnectTarget {
    if !source.auto_connect_enabled
        || !source.is_available
        || source.active_session_type != ActiveSessionType::None
    {
        return None;
    }

    let id = source.live_session_id?;
    if seen.insert(id) {
        log::info!("Live session ({}) is available, auto-connecting", id);
        Some(id)
    } else {
        log::debug!("Already auto-connected to live session ({})", id);
        None
    }
}

/// Only a real id, with auto-connect still enabled and the session still
/// available, is worth acting on.
pub fn auto_connect_predicate(target: &AutoConnectTarget, source: &AutoConnectSource) -> bool {
    target.is_some() && source.auto_connect_enabled && source.is_available
}

pub struct LiveAutoConnectComputation {
    inner: Arc<Inner>,
}

impl LiveAutoConnectComputation {
    pub fn new(shared_state: Arc<SharedState<SharedAppState>>) -> Self {
        Self::with_options(shared_state, true)
    }

    /// As [`new`](Self::new), optionally deferring the first evaluation until
    /// the state changes or [`evaluate`](Self::evaluate) is called.
    pub fn with_options(
        shared_state: Arc<SharedState<SharedAppState>>,
        start_immediate: bool,
    ) -> Self {
        let options = ComputationOptions::default()
            .start_immediate(start_immediate)
            .predicate(|ts: TargetSource<'_, AutoConnectSource, AutoConnectTarget>| {
                auto_connect_predicate(ts.target, ts.source)
            });

        let inner = CachedStateComputation::new(
            shared_state,
            |state: &SharedAppState, _: &ComputationState<_, _, _>| select_auto_connect_source(state),
            |source: &AutoConnectSource,
             _old: Option<&AutoConnectSource>,
             ctx: &mut TransformContext<'_, AutoConnectTarget, HashSet<u64>>| {
                auto_connect_transform(source, ctx.custom_cache)
            },
            options,
        );

        Self { inner }
    }

    /// The last live session id signalled for connection.
    pub fn current_target(&self) -> Option<u64> {
        self.inner.current_target().flatten()
    }

    /// Whether `id` has already been signalled.
    pub fn has_connected(&self, id: u64) -> bool {
        self.inner.with_state(|state| state.custom_cache.contains(&id))
    }

    pub fn on_change(
        &self,
        listener: impl Fn(&LiveAutoConnectChangeEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        self.inner.on_change(listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.inner.off(id)
    }

    pub fn evaluate(&self) {
        self.inner.evaluate();
    }

    pub fn dispose(&self) {
        self.inner.dispose();
    }
}
