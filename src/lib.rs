pub mod bump_set;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod orchestrator;
pub mod outcome;
pub mod planner;
pub mod ui;

pub use error::{RelslashError, Result};
