use std::cmp::Ordering;

use serde::Serialize;

/// The trunk branch of a tile repository.
pub const MASTER_BRANCH: &str = "master";

/// Prefix of release-line branches.
pub const RELEASE_LINE_PREFIX: &str = "rel/";

/// A tile repository branch eligible for bumping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileBranch {
    /// Short branch name (e.g. "master", "rel/2.6")
    pub name: String,
    /// Object id the branch pointed at when it was enumerated
    pub target: Option<String>,
}

impl TileBranch {
    pub fn new(name: impl Into<String>, target: Option<String>) -> Self {
        TileBranch {
            name: name.into(),
            target,
        }
    }

    pub fn is_master(&self) -> bool {
        self.name == MASTER_BRANCH
    }

    pub fn is_release_line(&self) -> bool {
        self.name.starts_with(RELEASE_LINE_PREFIX)
    }

    /// Whether this branch takes part in bumps at all
    pub fn is_supported(&self) -> bool {
        self.is_master() || self.is_release_line()
    }
}

/// Orders branches by increasing general availability: `master` first, then
/// ascending short name, then target id.
impl Ord for TileBranch {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .is_master()
            .cmp(&self.is_master())
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.target.cmp(&other.target))
    }
}

impl PartialOrd for TileBranch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Keeps `master` and `rel/` branches and sorts them.
pub fn supported_tile_branches(branches: impl IntoIterator<Item = TileBranch>) -> Vec<TileBranch> {
    let mut supported: Vec<TileBranch> = branches
        .into_iter()
        .filter(TileBranch::is_supported)
        .collect();
    supported.sort();
    supported
}
