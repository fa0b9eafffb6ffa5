//! Shared types, error model, and configuration for rtfweave.
//!
//! This crate is the foundation depended on by all other rtfweave crates.
//! It provides:
//! - [`RtfweaveError`], the unified error type
//! - Domain types ([`Fragment`], [`Section`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{Result, RtfweaveError};
pub use types::{Fragment, Section};
