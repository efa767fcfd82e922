//! Process-wide registry of cancelable running jobs.
//!
//! Every command the engine starts, one-shot or recurring, registers a
//! [`CancellationToken`] under an opaque id before doing any work. Canceling
//! the job through the control surface stops the next iteration from
//! starting; it does not interrupt an iteration already in flight.

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

use super::error::{ChaosError, ChaosResult};

/// Registry of in-flight jobs, keyed by id. Entries are removed once the job
/// finishes (normally or by cancellation) or is explicitly canceled; ids are
/// never reused, so an unbounded-growth tradeoff exists for long-lived
/// daemons that accumulate many short jobs.
#[derive(Clone, Default)]
pub struct JobRegistry {
    jobs: DashMap<String, CancellationToken>,
}

impl JobRegistry {
    pub fn new() -> Self {
        JobRegistry {
            jobs: DashMap::new(),
        }
    }

    /// Register `token` under a freshly minted id of the form `<kind>-<seq>`
    /// and return that id.
    pub fn register(&self, kind: &str, token: CancellationToken) -> String {
        let id = format!("{kind}-{}", next_seq());
        self.jobs.insert(id.clone(), token);
        id
    }

    /// Drop the bookkeeping entry for `id` once its job has finished.
    pub fn complete(&self, id: &str) {
        self.jobs.remove(id);
    }

    /// Cancel the job registered under `id`, removing it from the registry.
    /// Returns [`ChaosError::NotFound`] if no such job exists.
    pub fn cancel(&self, id: &str) -> ChaosResult<()> {
        match self.jobs.remove(id) {
            Some((_, token)) => {
                token.cancel();
                Ok(())
            }
            None => Err(ChaosError::NotFound),
        }
    }
}

fn next_seq() -> u64 {
    use std::sync::atomic::{AtomicU64, Ordering};
    static SEQ: AtomicU64 = AtomicU64::new(0);
    SEQ.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_then_cancel_succeeds() {
        let registry = JobRegistry::new();
        let token = CancellationToken::new();
        let id = registry.register("kill", token.clone());
        assert!(id.starts_with("kill-"));
        assert!(!token.is_cancelled());
        registry.cancel(&id).unwrap();
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancel_unknown_id_is_not_found() {
        let registry = JobRegistry::new();
        assert!(matches!(registry.cancel("nope"), Err(ChaosError::NotFound)));
    }

    #[test]
    fn cancel_is_one_shot() {
        let registry = JobRegistry::new();
        let id = registry.register("pause", CancellationToken::new());
        registry.cancel(&id).unwrap();
        assert!(matches!(registry.cancel(&id), Err(ChaosError::NotFound)));
    }

    #[test]
    fn complete_removes_without_canceling() {
        let registry = JobRegistry::new();
        let token = CancellationToken::new();
        let id = registry.register("stop", token.clone());
        registry.complete(&id);
        assert!(!token.is_cancelled());
        assert!(matches!(registry.cancel(&id), Err(ChaosError::NotFound)));
    }

    #[test]
    fn ids_are_unique_across_kinds() {
        let registry = JobRegistry::new();
        let a = registry.register("kill", CancellationToken::new());
        let b = registry.register("kill", CancellationToken::new());
        assert_ne!(a, b);
    }
}
