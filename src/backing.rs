//! Shared backing store for the mutable/frozen containers.
//!
//! The store is an `Arc` snapshot behind a short-lived lock. Readers clone the
//! snapshot and release the lock before looking at it, so no lock is ever held
//! while the comparison engine or the type algebra recurses into nested values
//! (which may well be the container itself).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) struct Backing<S> {
    frozen: AtomicBool,
    state: RwLock<Arc<S>>,
}

impl<S: Clone> Backing<S> {
    pub(crate) fn new(state: S, frozen: bool) -> Self {
        Backing {
            frozen: AtomicBool::new(frozen),
            state: RwLock::new(Arc::new(state)),
        }
    }

    pub(crate) fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Returns true when this call performed the mutable -> frozen transition.
    pub(crate) fn mark_frozen(&self) -> bool {
        !self.frozen.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn snapshot(&self) -> Arc<S> {
        Arc::clone(&self.read())
    }

    pub(crate) fn replace(&self, state: S) {
        *self.write() = Arc::new(state);
    }

    /// Mutates in place unless a reader still holds a snapshot, in which case the
    /// state is cloned first.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut guard = self.write();
        f(Arc::make_mut(&mut guard))
    }

    fn read(&self) -> RwLockReadGuard<'_, Arc<S>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Arc<S>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
