//! Batch runner: sequential, failure-isolated execution of an ordered record list.

use std::fmt::Display;

use tracing::{Span, field, info};

use crate::executor::{Execute, FsExecutor};
use crate::model::{BatchSummary, OperationRecord};

/// Runs every record through an injected executor and aggregates the outcomes.
///
/// Records execute strictly in input order; a failed record never stops, skips or
/// reorders the records after it, and nothing already applied is rolled back.
#[derive(Debug)]
pub struct BatchRunner<E = FsExecutor> {
    executor: E,
    span: Span,
}

impl<E: Execute> BatchRunner<E> {
    /// Construct a runner around `executor`.
    #[must_use]
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            span: tracing::info_span!("batch", run_id = field::Empty),
        }
    }

    /// Tag the batch span with the caller-supplied run identifier.
    #[must_use]
    pub fn with_run_id(self, run_id: impl Display) -> Self {
        self.span.record("run_id", field::display(run_id));
        self
    }

    /// Executor used for each record.
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    /// Execute `records` in order and summarise the outcomes.
    pub fn run(&self, records: &[OperationRecord]) -> BatchSummary {
        let _entered = self.span.enter();
        info!(records = records.len(), "batch started");

        let summary: BatchSummary = records
            .iter()
            .map(|record| self.executor.execute(record))
            .collect();

        info!(
            total = summary.total_operations(),
            successful = summary.successful_operations(),
            failed = summary.failed_operations(),
            "batch finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OperationKind, OperationResult};
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Fails every record whose destination ends in `fail`, recording call order.
    #[derive(Default)]
    struct ScriptedExecutor {
        calls: RefCell<Vec<PathBuf>>,
    }

    impl Execute for ScriptedExecutor {
        fn execute(&self, record: &OperationRecord) -> OperationResult {
            let destination = record.destination.clone().unwrap_or_default();
            self.calls.borrow_mut().push(destination.clone());
            if destination.ends_with("fail") {
                OperationResult::failed(record, "scripted failure")
            } else {
                OperationResult::succeeded(record)
            }
        }
    }

    #[test]
    fn empty_batch_yields_zeroed_summary() {
        let summary = BatchRunner::new(ScriptedExecutor::default()).run(&[]);
        assert_eq!(summary, BatchSummary::default());
        assert!(summary.results().is_empty());
    }

    #[test]
    fn failures_do_not_stop_or_reorder_later_records() {
        let records: Vec<OperationRecord> = ["one", "fail", "two", "fail", "three"]
            .iter()
            .map(|name| OperationRecord::create_dir(format!("/virtual/{name}")))
            .collect();
        let runner = BatchRunner::new(ScriptedExecutor::default()).with_run_id("run-1");

        let summary = runner.run(&records);

        assert_eq!(summary.total_operations(), records.len());
        assert_eq!(summary.successful_operations(), 3);
        assert_eq!(summary.failed_operations(), 2);
        assert_eq!(
            summary.successful_operations() + summary.failed_operations(),
            summary.total_operations()
        );
        let flags: Vec<bool> = summary.results().iter().map(|r| r.success).collect();
        assert_eq!(flags, vec![true, false, true, false, true]);

        let expected: Vec<PathBuf> = records
            .iter()
            .filter_map(|record| record.destination.clone())
            .collect();
        assert_eq!(*runner.executor().calls.borrow(), expected);
        let echoed: Vec<PathBuf> = summary
            .results()
            .iter()
            .filter_map(|result| result.destination.clone())
            .collect();
        assert_eq!(echoed, expected);
    }

    #[test]
    fn unknown_kinds_are_counted_as_failures() {
        let records = vec![
            OperationRecord::new(OperationKind::parse("frobnicate"), "/virtual/x"),
            OperationRecord::create_dir("/virtual/y"),
        ];
        let summary = BatchRunner::new(crate::FsExecutor::default()).run(&records[..1]);
        assert_eq!(summary.failed_operations(), 1);
        assert_eq!(
            summary.results()[0].error.as_deref(),
            Some("unknown operation: frobnicate")
        );

        let scripted = BatchRunner::new(ScriptedExecutor::default()).run(&records);
        assert_eq!(scripted.total_operations(), 2);
    }
}
