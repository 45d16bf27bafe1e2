//! Git operations abstraction layer
//!
//! The bump engine only needs a few things from the tile repository: the
//! branch list, a forced checkout into the shared working tree, a lock file
//! write, whether that tree is clean, and a commit of everything that changed. The [Repository]
//! trait captures exactly that.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! Checkout and commit take `&mut self`: the working tree is the one mutable
//! resource of a run and the orchestrator is its only writer.
//!
//! ```rust
//! # use relslash::git::Repository;
//! # fn example<R: Repository>(repo: &mut R) -> relslash::Result<()> {
//! for branch in repo.list_branches()? {
//!     repo.checkout_branch(&branch)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::path::Path;

use crate::config::CommitAuthor;
use crate::domain::{KilnfileLock, TileBranch};
use crate::error::Result;

/// Operations the bump engine consumes from a tile repository
pub trait Repository {
    /// Root of the working tree that checkouts populate
    fn workdir(&self) -> &Path;

    /// All local branches, unfiltered and in no particular order
    fn list_branches(&self) -> Result<Vec<TileBranch>>;

    /// Checks out `branch` into the working tree, discarding local
    /// modifications left by a previous branch.
    ///
    /// # Returns
    /// * `Ok(())` - The working tree now reflects the branch head
    /// * `Err` - [crate::error::RelslashError::Checkout] naming the branch
    fn checkout_branch(&mut self, branch: &TileBranch) -> Result<()>;

    /// Overwrites `Kilnfile.lock` in the working tree with `lock`
    fn write_lock(&mut self, lock: &KilnfileLock) -> Result<()> {
        lock.write_to(self.workdir())
    }

    /// Whether the working tree has no changes relative to HEAD
    fn is_clean(&self) -> Result<bool>;

    /// Commits every modified tracked file on the current branch.
    ///
    /// # Returns
    /// * `Ok(String)` - Hex id of the new commit
    /// * `Err` - [crate::error::RelslashError::Commit]
    fn commit_all(&mut self, message: &str, author: &CommitAuthor) -> Result<String>;
}
