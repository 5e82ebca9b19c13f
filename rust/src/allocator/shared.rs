//! Lock-guarded allocator handle for multi-threaded drivers.
//!
//! Every operation holds one `parking_lot::Mutex` for its full duration, so the
//! provisional grant, safety scan and rollback of a request are atomic to every
//! other caller.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::{RequestOutcome, Snapshot};

use super::state::{Allocator, AllocatorError};

/// Cloneable handle to a single allocator shared between threads.
#[derive(Clone, Debug)]
pub struct SharedAllocator {
    inner: Arc<Mutex<Allocator>>,
}

impl SharedAllocator {
    pub fn new(allocator: Allocator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(allocator)),
        }
    }

    pub fn try_safe_request(
        &self,
        process: usize,
        resource: usize,
    ) -> Result<RequestOutcome, AllocatorError> {
        self.inner.lock().try_safe_request(process, resource)
    }

    pub fn check_completion(&self, process: usize) -> Result<bool, AllocatorError> {
        self.inner.lock().check_completion(process)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot()
    }

    pub fn is_complete(&self) -> bool {
        self.inner.lock().is_complete()
    }

    pub fn safe_sequence(&self) -> Option<Vec<usize>> {
        self.inner.lock().safe_sequence()
    }

    /// Run several operations as one critical section.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut Allocator) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}
