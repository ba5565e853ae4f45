//! Terminal frontend for basketball game analysis.
//!
//! This crate provides:
//! - Argument parsing for the `hoopstats` binary
//! - The analysis session (upload, status polling, result transformation)
//! - Plain-text report rendering

pub mod args;
pub mod report;
pub mod session;

pub use args::{parse_args, CliArgs, Command};
pub use report::render_report;
pub use session::{AnalysisSession, ProgressCallback, SessionOutcome, SessionOutput};
