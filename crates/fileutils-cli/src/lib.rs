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
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Worker entrypoint: loads the configured operations, runs them, prints a JSON summary.
//!
//! Layout:
//! - `cli.rs`: argument parsing, configuration selection and batch execution
//! - `error.rs`: CLI error type and exit codes
//! - `output.rs`: result payload rendering
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod error;
pub(crate) mod output;

pub use cli::run;
