//! User interface module - operator-facing output.
//!
//! Everything here writes to the terminal; logging for diagnostics goes
//! through `tracing` instead.

pub mod formatter;

pub use formatter::{
    display_bump_report, display_bump_set, display_error, display_status, display_success,
    display_warning, format_branch_report, format_summary,
};
