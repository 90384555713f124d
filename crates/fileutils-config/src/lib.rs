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

//! YAML-backed configuration for the fileutils worker.
//!
//! Layout: `model.rs` (typed document), `loader.rs` (file resolution, parsing and record
//! zipping), `validate.rs` (field and list-length checks), `defaults.rs` (locations).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
mod validate;

pub use defaults::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
pub use error::{ConfigError, ConfigResult};
pub use loader::resolve_config_path;
pub use model::{ListField, LoggingSection, PluginConfig};
