use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for relslash operations
#[derive(Error, Debug)]
pub enum RelslashError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("could not open {which} repository at {}: {source}", path.display())]
    RepositoryOpen {
        which: &'static str,
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Release catalog error: {0}")]
    Catalog(String),

    #[error("could not checkout tile repository at {branch:?}: {reason}")]
    Checkout { branch: String, reason: String },

    #[error("Lock file error: {0}")]
    Lock(String),

    #[error("could not find release lock with name: {0}")]
    ReleaseLockNotFound(String),

    #[error("could not write the entire Kilnfile.lock; wrote {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    #[error("Bump unsupported: {0}")]
    PlanUnsupported(String),

    #[error("could not create commit for tile repo on branch {branch:?}: {reason}")]
    Commit { branch: String, reason: String },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in relslash
pub type Result<T> = std::result::Result<T, RelslashError>;

impl RelslashError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        RelslashError::Config(msg.into())
    }

    /// Create a catalog error with context
    pub fn catalog(msg: impl Into<String>) -> Self {
        RelslashError::Catalog(msg.into())
    }

    /// Create a lock file error with context
    pub fn lock(msg: impl Into<String>) -> Self {
        RelslashError::Lock(msg.into())
    }

    /// Create an unsupported-plan error with context
    pub fn unsupported(msg: impl Into<String>) -> Self {
        RelslashError::PlanUnsupported(msg.into())
    }

    pub fn checkout(branch: impl Into<String>, reason: impl ToString) -> Self {
        RelslashError::Checkout {
            branch: branch.into(),
            reason: reason.to_string(),
        }
    }

    pub fn commit(branch: impl Into<String>, reason: impl ToString) -> Self {
        RelslashError::Commit {
            branch: branch.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error stops the whole run.
    ///
    /// Configuration, repository-open and catalog failures happen before any
    /// branch is touched. Everything else is scoped to a single branch.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RelslashError::Config(_)
                | RelslashError::RepositoryOpen { .. }
                | RelslashError::Catalog(_)
        )
    }
}
