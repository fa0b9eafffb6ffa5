//! Forward build and reverse extraction pipelines for rtfweave.
//!
//! This crate ties together fragment collection, conversion, template
//! splicing, and the optional PDF step into end-to-end runs.

pub mod collector;
pub mod extract;
pub mod pdf;
pub mod pipeline;
pub mod template;

pub use collector::collect_fragments;
pub use extract::{ExtractOutcome, extract};
pub use pipeline::{BuildOutcome, ProgressReporter, SilentProgress, build};
