#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::redundant_pub_crate
)]

//! Declarative filesystem operations with per-record outcome reporting.
//!
//! Layout: `model` (records, results, summaries), `executor` (one record, one mutation),
//! `runner` (ordered, failure-isolated batches), `policy` (overwrite/allowlist switches),
//! `error` (per-operation failures rendered into result messages).

pub mod error;
pub mod executor;
pub mod model;
pub mod policy;
pub mod runner;
mod transfer;

pub use error::{OperationError, OperationOutcome};
pub use executor::{Execute, FsExecutor};
pub use model::{BatchSummary, OperationKind, OperationRecord, OperationResult};
pub use policy::OperationPolicy;
pub use runner::BatchRunner;
