//! Generic cached state computation.
//!
//! On every state notification:
//!   1. select a source value from the state
//!   2. stop if it equals the previously selected source
//!   3. record it as the previous source
//!   4. transform it into a target (with access to an instance-owned cache)
//!   5. if the predicate accepts the target, store it and notify listeners
//!
//! A rejected target is discarded; the current target keeps its old value.
//! Panics in the selector, transform or predicate propagate to whoever
//! triggered the notification.

use crate::shared_state::{ObserverId, SharedState};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

pub type ListenerId = u64;

type Selector<S, V, T, C> = Box<dyn Fn(&S, &ComputationState<V, T, C>) -> V + Send + Sync>;
type Transform<V, T, C> =
    Box<dyn Fn(&V, Option<&V>, &mut TransformContext<'_, T, C>) -> T + Send + Sync>;
type Predicate<V, T> = Box<dyn Fn(TargetSource<'_, V, T>) -> bool + Send + Sync>;
type IsEqual<V> = Box<dyn Fn(&V, &V) -> bool + Send + Sync>;
type CacheInit<C> = Box<dyn FnOnce() -> C + Send>;
type Listener<V, T> = Arc<dyn Fn(&ChangeEvent<V, T>) + Send + Sync>;

/// Per-instance state, guarded by the recompute lock.
#[derive(Debug)]
pub struct ComputationState<V, T, C> {
    /// Last selected source, whether or not its target was accepted.
    pub source: Option<V>,
    /// Last accepted target.
    pub target: Option<T>,
    pub updated_at: Option<DateTime<Utc>>,
    pub custom_cache: C,
}

/// What the transform may see and touch besides the sources.
pub struct TransformContext<'a, T, C> {
    pub custom_cache: &'a mut C,
    pub current_target: Option<&'a T>,
}

/// A freshly computed target and the source it came from.
pub struct TargetSource<'a, V, T> {
    pub target: &'a T,
    pub source: &'a V,
}

#[derive(Debug, Clone)]
pub struct ChangeEvent<V, T> {
    pub target: T,
    pub source: V,
    pub old_target: Option<T>,
    pub old_source: Option<V>,
    pub updated_at: DateTime<Utc>,
}

pub struct ComputationOptions<V, T, C> {
    /// Evaluate once during construction instead of waiting for the first
    /// state change.
    pub start_immediate: bool,
    /// Gate on emitting a recomputed target. `None` accepts everything.
    pub predicate: Option<Predicate<V, T>>,
    /// Source equality used for memoization.
    pub is_equal: IsEqual<V>,
    /// Seeds the instance-owned cache; invoked exactly once.
    pub custom_cache_init: CacheInit<C>,
}

impl<V, T, C> Default for ComputationOptions<V, T, C>
where
    V: PartialEq + 'static,
    T: 'static,
    C: Default + 'static,
{
    fn default() -> Self {
        Self {
            start_immediate: true,
            predicate: None,
            is_equal: Box::new(|a: &V, b: &V| a == b),
            custom_cache_init: Box::new(C::default),
        }
    }
}

impl<V, T, C> ComputationOptions<V, T, C> {
    pub fn start_immediate(mut self, start_immediate: bool) -> Self {
        self.start_immediate = start_immediate;
        self
    }

    pub fn predicate(
        mut self,
        predicate: impl Fn(TargetSource<'_, V, T>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    pub fn is_equal(mut self, is_equal: impl Fn(&V, &V) -> bool + Send + Sync + 'static) -> Self {
        self.is_equal = Box::new(is_equal);
        self
    }

    pub fn custom_cache_init(mut self, init: impl FnOnce() -> C + Send + 'static) -> Self {
        self.custom_cache_init = Box::new(init);
        self
    }
}

pub struct CachedStateComputation<S, V, T, C = ()> {
    shared_state: Arc<SharedState<S>>,
    observer_id: Mutex<Option<ObserverId>>,
    selector: Selector<S, V, T, C>,
    transform: Transform<V, T, C>,
    predicate: Option<Predicate<V, T>>,
    is_equal: IsEqual<V>,
    state: Mutex<ComputationState<V, T, C>>,
    current: RwLock<Option<T>>,
    listeners: Mutex<Vec<(ListenerId, Listener<V, T>)>>,
    next_listener_id: AtomicU64,
}

impl<S, V, T, C> CachedStateComputation<S, V, T, C>
where
    S: Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + std::fmt::Debug + 'static,
    T: Clone + Send + Sync + std::fmt::Debug + 'static,
    C: Send + 'static,
{
    /// Creates the computation and subscribes it to `shared_state`.
    ///
    /// The subscription holds only a weak reference; dropping the last `Arc`
    /// (or calling [`dispose`](Self::dispose)) detaches it.
    pub fn new(
        shared_state: Arc<SharedState<S>>,
        selector: impl Fn(&S, &ComputationState<V, T, C>) -> V + Send + Sync + 'static,
        transform: impl Fn(&V, Option<&V>, &mut TransformContext<'_, T, C>) -> T
            + Send
            + Sync
            + 'static,
        options: ComputationOptions<V, T, C>,
    ) -> Arc<Self> {
        let ComputationOptions {
            start_immediate,
            predicate,
            is_equal,
            custom_cache_init,
        } = options;

        let this = Arc::new(Self {
            shared_state: shared_state.clone(),
            observer_id: Mutex::new(None),
            selector: Box::new(selector),
            transform: Box::new(transform),
            predicate,
            is_equal,
            state: Mutex::new(ComputationState {
                source: None,
                target: None,
                updated_at: None,
                custom_cache: custom_cache_init(),
            }),
            current: RwLock::new(None),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
        });

        let weak: Weak<Self> = Arc::downgrade(&this);
        let observer_id = shared_state.observe(move |state| {
            if let Some(this) = weak.upgrade() {
                this.handle_state_change(state);
            }
        });
        *this.observer_id.lock() = Some(observer_id);

        if start_immediate {
            this.evaluate();
        }

        this
    }

    /// The last target accepted by the predicate.
    pub fn current_target(&self) -> Option<T> {
        self.current.read().clone()
    }

    /// The last selected source, accepted or not.
    pub fn current_source(&self) -> Option<V> {
        self.state.lock().source.clone()
    }

    /// Runs `f` against the instance state under the recompute lock.
    pub fn with_state<R>(&self, f: impl FnOnce(&ComputationState<V, T, C>) -> R) -> R {
        f(&self.state.lock())
    }

    pub fn on_change(
        &self,
        listener: impl Fn(&ChangeEvent<V, T>) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Re-runs the computation against the current shared state.
    pub fn evaluate(&self) {
        let snapshot = self.shared_state.read();
        self.handle_state_change(&snapshot);
    }

    /// Stops observing the shared state and drops all listeners.
    pub fn dispose(&self) {
        if let Some(id) = self.observer_id.lock().take() {
            self.shared_state.unobserve(id);
        }
        self.listeners.lock().clear();
    }

    pub fn is_disposed(&self) -> bool {
        self.observer_id.lock().is_none()
    }

    /// Handles one state notification; see the module docs for the steps.
    ///
    /// Listeners run after the recompute lock is released. The transform must
    /// not update the observed state synchronously.
    pub fn handle_state_change(&self, state: &S) {
        let event = {
            let mut inner = self.state.lock();
            let source = (self.selector)(state, &inner);

            if let Some(previous) = inner.source.as_ref() {
                if (self.is_equal)(&source, previous) {
                    log::debug!("Source is unchanged");
                    return;
                }
            }

            log::debug!("Source changed: {:?} -> {:?}", inner.source, source);

            let old_source = inner.source.replace(source.clone());
            let target = {
                let ComputationState {
                    target: current_target,
                    custom_cache,
                    ..
                } = &mut *inner;
                let mut context = TransformContext {
                    custom_cache,
                    current_target: current_target.as_ref(),
                };
                (self.transform)(&source, old_source.as_ref(), &mut context)
            };

            if let Some(predicate) = self.predicate.as_ref() {
                let accepted = predicate(TargetSource {
                    target: &target,
                    source: &source,
                });
                if !accepted {
                    log::debug!("Predicate excluded change: {:?} from {:?}", target, source);
                    return;
                }
            }

            let updated_at = Utc::now();
            let old_target = inner.target.replace(target.clone());
            inner.updated_at = Some(updated_at);
            *self.current.write() = Some(target.clone());

            ChangeEvent {
                target,
                source,
                old_target,
                old_source,
                updated_at,
            }
        };

        self.emit(&event);
    }

    fn emit(&self, event: &ChangeEvent<V, T>) {
        let listeners: Vec<Listener<V, T>> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(event);
        }
    }
}

impl<S, V, T, C> Drop for CachedStateComputation<S, V, T, C> {
    fn drop(&mut self) {
        if let Some(id) = self.observer_id.get_mut().take() {
            self.shared_state.unobserve(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug, Clone, Default)]
    struct TestState {
        a: u32,
        b: u32,
        noise: u32,
    }

    fn counting_sum(
        state: &Arc<SharedState<TestState>>,
        options: ComputationOptions<(u32, u32), u32, ()>,
    ) -> (Arc<CachedStateComputation<TestState, (u32, u32), u32>>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let computation = CachedStateComputation::new(
            state.clone(),
            |s: &TestState, _| (s.a, s.b),
            move |source: &(u32, u32), _old, _ctx| {
                counter.fetch_add(1, Ordering::SeqCst);
                source.0 + source.1
            },
            options,
        );
        (computation, calls)
    }

    fn record_events(
        computation: &CachedStateComputation<TestState, (u32, u32), u32>,
    ) -> Arc<Mutex<Vec<(u32, Option<u32>)>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        computation.on_change(move |ev| sink.lock().push((ev.target, ev.old_target)));
        events
    }

    #[test]
    fn test_unchanged_source_is_a_no_op() {
        let state = SharedState::new(TestState { a: 1, b: 2, noise: 0 });
        let (computation, calls) = counting_sum(&state, ComputationOptions::default());
        let events = record_events(&computation);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(computation.current_target(), Some(3));

        // Only a field outside the selection changes.
        state.update(|s| s.noise += 1);
        state.update(|s| s.noise += 1);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_change_emits_new_and_old_target() {
        let state = SharedState::new(TestState { a: 1, b: 2, noise: 0 });
        let (computation, _) = counting_sum(&state, ComputationOptions::default());
        let events = record_events(&computation);

        state.update(|s| s.a = 10);

        assert_eq!(*events.lock(), vec![(12, Some(3))]);
        assert_eq!(computation.current_source(), Some((10, 2)));
    }

    #[test]
    fn test_lazy_start() {
        let state = SharedState::new(TestState { a: 1, b: 2, noise: 0 });
        let (computation, calls) =
            counting_sum(&state, ComputationOptions::default().start_immediate(false));
        let events = record_events(&computation);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(computation.current_target(), None);

        // The first observed notification computes even without a change.
        state.update(|s| s.noise = 5);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*events.lock(), vec![(3, None)]);
    }

    #[test]
    fn test_rejected_target_keeps_current_but_records_source() {
        let state = SharedState::new(TestState { a: 1, b: 2, noise: 0 });
        let options =
            ComputationOptions::<(u32, u32), u32, ()>::default().predicate(|ts| *ts.target != 0);
        let (computation, calls) = counting_sum(&state, options);
        let events = record_events(&computation);

        state.update(|s| {
            s.a = 0;
            s.b = 0;
        });
        assert!(events.lock().is_empty());
        assert_eq!(computation.current_target(), Some(3));
        assert_eq!(computation.current_source(), Some((0, 0)));

        // Same rejected source again: memoized, transform not re-run.
        state.update(|s| s.noise = 9);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_custom_cache_is_seeded_once_and_owned_by_transform() {
        let state = SharedState::new(TestState::default());
        let inits = Arc::new(AtomicUsize::new(0));
        let init_counter = inits.clone();

        let computation = CachedStateComputation::new(
            state.clone(),
            |s: &TestState, _| s.a,
            |source: &u32, old: Option<&u32>, ctx: &mut TransformContext<'_, usize, Vec<u32>>| {
                ctx.custom_cache.push(*source);
                assert_ne!(Some(source), old);
                ctx.custom_cache.len()
            },
            ComputationOptions::default().custom_cache_init(move || {
                init_counter.fetch_add(1, Ordering::SeqCst);
                vec![100]
            }),
        );

        state.update(|s| s.a = 1);
        state.update(|s| s.a = 2);

        assert_eq!(inits.load(Ordering::SeqCst), 1);
        assert_eq!(computation.current_target(), Some(4));
        computation.with_state(|inner| assert_eq!(inner.custom_cache, vec![100, 0, 1, 2]));
    }

    #[test]
    fn test_custom_equality() {
        let state = SharedState::new(TestState { a: 1, b: 2, noise: 0 });
        let options = ComputationOptions::<(u32, u32), u32, ()>::default()
            .is_equal(|x: &(u32, u32), y: &(u32, u32)| x.0 == y.0);
        let (_computation, calls) = counting_sum(&state, options);

        state.update(|s| s.b = 50);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        state.update(|s| s.a = 50);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_off_dispose_and_drop_detach() {
        let state = SharedState::new(TestState::default());
        let (computation, calls) = counting_sum(&state, ComputationOptions::default());
        let events = Arc::new(AtomicUsize::new(0));

        let counter = events.clone();
        let id = computation.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(computation.off(id));
        state.update(|s| s.a = 1);
        assert_eq!(events.load(Ordering::SeqCst), 0);

        computation.dispose();
        assert!(computation.is_disposed());
        state.update(|s| s.a = 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let (dropped, _) = counting_sum(&state, ComputationOptions::default());
        assert_eq!(state.observer_count(), 1);
        drop(dropped);
        assert_eq!(state.observer_count(), 0);
    }

    #[test]
    fn test_tracks_update_made_by_earlier_observer() {
        let state = SharedState::new(0u32);

        let weak = Arc::downgrade(&state);
        state.observe(move |v| {
            if *v == 1 {
                if let Some(state) = weak.upgrade() {
                    state.update(|v| *v = 2);
                }
            }
        });

        let computation = CachedStateComputation::new(
            state.clone(),
            |v: &u32, _| *v,
            |source: &u32, _old, _ctx: &mut TransformContext<'_, u32, ()>| *source,
            ComputationOptions::default(),
        );

        state.update(|v| *v = 1);

        assert_eq!(state.read(), 2);
        assert_eq!(computation.current_source(), Some(2));
        assert_eq!(computation.current_target(), Some(2));
    }

    #[test]
    fn test_transform_panic_propagates_after_source_is_recorded() {
        let state = SharedState::new(TestState { a: 1, b: 2, noise: 0 });
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let computation = CachedStateComputation::new(
            state.clone(),
            |s: &TestState, _| (s.a, s.b),
            move |source: &(u32, u32), _old, _ctx: &mut TransformContext<'_, u32, ()>| {
                counter.fetch_add(1, Ordering::SeqCst);
                if source.0 == 99 {
                    panic!("transform failed");
                }
                source.0 + source.1
            },
            ComputationOptions::default(),
        );
        let events = record_events(&computation);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            state.update(|s| s.a = 99);
        }));
        assert!(result.is_err());

        assert_eq!(computation.current_source(), Some((99, 2)));
        assert_eq!(computation.current_target(), Some(3));
        assert!(events.lock().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Same source again: memoized, so the transform does not run (or panic).
        state.update(|s| s.noise = 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(computation.current_target(), Some(3));
    }
}
