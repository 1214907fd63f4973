//! Request generations
//!
//! Each new request bumps the generation; a response may only be applied
//! while its token is still current. Unmount cancels by bumping once more.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{ApiError, ApiResult};

#[derive(Clone, Debug, Default)]
pub struct LoadGuard {
    generation: Arc<AtomicU64>,
}

#[derive(Clone, Debug)]
pub struct LoadToken {
    generation: u64,
    guard: LoadGuard,
}

impl LoadGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding any in flight
    pub fn begin(&self) -> LoadToken {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        LoadToken { generation, guard: self.clone() }
    }

    /// Supersede whatever is in flight without starting anything new
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn current(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl LoadToken {
    pub fn is_current(&self) -> bool {
        self.guard.current() == self.generation
    }

    /// Pass the result through, or `Aborted` if a newer request started
    pub fn settle<T>(&self, result: ApiResult<T>) -> ApiResult<T> {
        if self.is_current() {
            result
        } else {
            Err(ApiError::Aborted)
        }
    }
}
