//! Run-scoped span helpers.
//!
//! # Design
//! - One span per invocation carries the run identifier and build SHA so every log line
//!   emitted while the batch executes can be correlated by the orchestrator.

use tracing::span::EnteredSpan;

use crate::init::build_sha;

/// Guard that keeps the run-level span entered until dropped.
#[must_use = "the run span is exited when the guard is dropped"]
pub struct RunContextGuard {
    _span: EnteredSpan,
}

impl RunContextGuard {
    /// Enter a `run` span tagged with `run_id` and the recorded build SHA.
    pub fn new(run_id: &str) -> Self {
        let span = tracing::info_span!("run", run_id = %run_id, build_sha = %build_sha());
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_context_guard_enters_and_exits() {
        let guard = RunContextGuard::new("run-42");
        tracing::info!("inside run span");
        drop(guard);
    }
}
