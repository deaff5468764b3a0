//! Observable state container.
//!
//! Observers run after the write lock is released, so an observer may read or
//! update the state again. Each observer receives the value as it is when that
//! observer is called: if an earlier observer updated the state, later ones
//! see the newer value, never a stale one.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub type ObserverId = u64;

type Observer<S> = Arc<dyn Fn(&S) + Send + Sync>;

pub struct SharedState<S> {
    value: RwLock<S>,
    observers: Mutex<Vec<(ObserverId, Observer<S>)>>,
    next_observer_id: AtomicU64,
}

impl<S> SharedState<S> {
    /// Registers `observer` to run after every update.
    pub fn observe(&self, observer: impl Fn(&S) + Send + Sync + 'static) -> ObserverId {
        let id = self.next_observer_id.fetch_add(1, Ordering::Relaxed);
        self.observers.lock().push((id, Arc::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if it was not registered.
    pub fn unobserve(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.lock();
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }
}

impl<S: Clone> SharedState<S> {
    pub fn new(initial: S) -> Arc<Self> {
        Arc::new(Self {
            value: RwLock::new(initial),
            observers: Mutex::new(Vec::new()),
            next_observer_id: AtomicU64::new(1),
        })
    }

    /// Returns a clone of the current value.
    pub fn read(&self) -> S {
        self.value.read().clone()
    }

    /// Runs `f` against the current value under a read lock.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.value.read())
    }

    /// Mutates the value, then notifies every observer.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let result = f(&mut self.value.write());
        self.notify();
        result
    }

    fn notify(&self) {
        let observers: Vec<Observer<S>> = self
            .observers
            .lock()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();

        for observer in observers {
            // Read at dispatch time: a nested update may already have run.
            let current = self.read();
            observer(&current);
        }
    }
}
