//! Parameter Store - Shared Model Parameters
//!
//! Parameters live behind an `Arc<RwLock<_>>`. Samplers take coherent copies
//! under the read lock; the training step updates them under the write lock.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::sync::Arc;

use parking_lot::RwLock;
use radpinn_data::SnapshotFn;

// =============================================================================
// ParamStore
// =============================================================================

/// Shared, lock-protected parameters.
pub struct ParamStore<P> {
    inner: Arc<RwLock<P>>,
}

impl<P> Clone for ParamStore<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: Clone> ParamStore<P> {
    /// Wraps initial parameters.
    pub fn new(params: P) -> Self {
        Self {
            inner: Arc::new(RwLock::new(params)),
        }
    }

    /// A coherent copy of the current parameters.
    pub fn snapshot(&self) -> P {
        self.inner.read().clone()
    }

    /// Runs `f` against the current parameters without copying them.
    pub fn with<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(&self.inner.read())
    }

    /// Mutates the parameters under the write lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl<P: Clone + Send + Sync + 'static> ParamStore<P> {
    /// A snapshot function for a sampler's model view.
    pub fn snapshot_fn(&self) -> SnapshotFn<P> {
        let store = self.clone();
        Arc::new(move || store.snapshot())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_a_copy() {
        let store = ParamStore::new(vec![1.0, 2.0]);
        let snap = store.snapshot();
        store.update(|p| p[0] = 5.0);
        assert_eq!(snap, vec![1.0, 2.0]);
        assert_eq!(store.snapshot(), vec![5.0, 2.0]);
    }

    #[test]
    fn test_snapshot_fn_sees_updates() {
        let store = ParamStore::new(0.5_f64);
        let snapshot = store.snapshot_fn();
        assert_eq!(snapshot(), 0.5);
        store.update(|p| *p = 0.75);
        assert_eq!(snapshot(), 0.75);
        assert_eq!(store.with(|p| *p * 2.0), 1.5);
    }
}
