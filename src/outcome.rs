use std::fmt;

use crate::error::RelslashError;

/// What happened to one branch during a bump run.
///
/// Only [BranchOutcome::Bumped] leaves a commit behind. Skips and failures
/// are non-fatal; the run moves on to the next branch.
#[derive(Debug)]
pub enum BranchOutcome {
    /// The lock entry was rewritten and committed
    Bumped {
        from: String,
        to: String,
        commit: String,
    },
    /// Dry run: the lock entry would have been rewritten
    WouldBump { from: String, to: String },
    /// The lock entry already pins the target version
    UpToDate { version: String },
    /// The rewritten lock left the working tree clean
    NothingToCommit { version: String },
    /// The planner cannot choose a version for this catalog
    Unsupported { reason: String },
    /// Checkout, lock, write, status or commit failed
    Failed(RelslashError),
}

impl BranchOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, BranchOutcome::Failed(_))
    }

    pub fn commit(&self) -> Option<&str> {
        match self {
            BranchOutcome::Bumped { commit, .. } => Some(commit.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for BranchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchOutcome::Bumped { from, to, commit } => {
                let short = if commit.len() > 7 {
                    &commit[..7]
                } else {
                    commit.as_str()
                };
                write!(f, "bumped {:?} to {:?} ({})", from, to, short)
            }
            BranchOutcome::WouldBump { from, to } => {
                write!(f, "would bump {:?} to {:?}", from, to)
            }
            BranchOutcome::UpToDate { version } => {
                write!(f, "already has the latest version ({:?})", version)
            }
            BranchOutcome::NothingToCommit { version } => {
                write!(f, "worktree is clean after writing {:?}; no change to commit", version)
            }
            BranchOutcome::Unsupported { reason } => write!(f, "skipped: {}", reason),
            BranchOutcome::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Outcome of one branch, in processing order
#[derive(Debug)]
pub struct BranchReport {
    pub branch: String,
    pub outcome: BranchOutcome,
}

/// Result of a whole bump run
#[derive(Debug, Default)]
pub struct BumpReport {
    pub branches: Vec<BranchReport>,
}

impl BumpReport {
    pub fn push(&mut self, branch: impl Into<String>, outcome: BranchOutcome) {
        self.branches.push(BranchReport {
            branch: branch.into(),
            outcome,
        });
    }

    pub fn commits(&self) -> Vec<&str> {
        self.branches
            .iter()
            .filter_map(|report| report.outcome.commit())
            .collect()
    }

    pub fn failures(&self) -> Vec<&BranchReport> {
        self.branches
            .iter()
            .filter(|report| report.outcome.is_failure())
            .collect()
    }

    pub fn outcome_for(&self, branch: &str) -> Option<&BranchOutcome> {
        self.branches
            .iter()
            .find(|report| report.branch == branch)
            .map(|report| &report.outcome)
    }
}
