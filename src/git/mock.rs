use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CommitAuthor;
use crate::domain::lock::KILNFILE_LOCK;
use crate::domain::{KilnfileLock, TileBranch};
use crate::error::{RelslashError, Result};
use crate::git::Repository;

/// A commit recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommit {
    pub id: String,
    pub branch: String,
    pub message: String,
    pub author: CommitAuthor,
    pub lock: Option<String>,
}

/// Mock tile repository backed by a plain directory.
///
/// Each branch holds the committed content of its `Kilnfile.lock`; checkout
/// writes that content into the working directory and status compares the
/// two.
pub struct MockRepository {
    workdir: PathBuf,
    branches: Vec<TileBranch>,
    locks: HashMap<String, Option<String>>,
    current: Option<String>,
    failing_checkouts: HashSet<String>,
    failing_commits: HashSet<String>,
    failing_writes: HashSet<String>,
    failing_status: HashSet<String>,
    commits: Vec<RecordedCommit>,
}

impl MockRepository {
    /// Create a mock repository whose working tree is `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        MockRepository {
            workdir: workdir.into(),
            branches: Vec::new(),
            locks: HashMap::new(),
            current: None,
            failing_checkouts: HashSet::new(),
            failing_commits: HashSet::new(),
            failing_writes: HashSet::new(),
            failing_status: HashSet::new(),
            commits: Vec::new(),
        }
    }

    /// Add a branch; `lock` is its committed `Kilnfile.lock`, if any
    pub fn add_branch(&mut self, name: impl Into<String>, lock: Option<&str>) {
        let name = name.into();
        self.branches.push(TileBranch::new(name.clone(), None));
        self.locks.insert(name, lock.map(str::to_string));
    }

    /// Make checkouts of `name` fail
    pub fn fail_checkout(&mut self, name: impl Into<String>) {
        self.failing_checkouts.insert(name.into());
    }

    /// Make commits on `name` fail
    pub fn fail_commit(&mut self, name: impl Into<String>) {
        self.failing_commits.insert(name.into());
    }

    /// Make lock writes on `name` come up short
    pub fn fail_lock_write(&mut self, name: impl Into<String>) {
        self.failing_writes.insert(name.into());
    }

    /// Make status reads on `name` fail
    pub fn fail_status(&mut self, name: impl Into<String>) {
        self.failing_status.insert(name.into());
    }

    pub fn commits(&self) -> &[RecordedCommit] {
        &self.commits
    }

    pub fn current_branch(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Committed lock content of a branch
    pub fn branch_lock(&self, name: &str) -> Option<&str> {
        self.locks.get(name).and_then(|lock| lock.as_deref())
    }

    fn lock_path(&self) -> PathBuf {
        self.workdir.join(KILNFILE_LOCK)
    }

    fn working_lock(&self) -> Result<Option<String>> {
        let path = self.lock_path();
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn list_branches(&self) -> Result<Vec<TileBranch>> {
        Ok(self.branches.clone())
    }

    fn checkout_branch(&mut self, branch: &TileBranch) -> Result<()> {
        if self.failing_checkouts.contains(&branch.name) {
            return Err(RelslashError::checkout(&branch.name, "simulated failure"));
        }
        let lock = self
            .locks
            .get(&branch.name)
            .ok_or_else(|| RelslashError::checkout(&branch.name, "reference not found"))?
            .clone();

        let path = self.lock_path();
        match lock {
            Some(content) => fs::write(&path, content)?,
            None if path.exists() => fs::remove_file(&path)?,
            None => {}
        }

        self.current = Some(branch.name.clone());
        Ok(())
    }

    fn write_lock(&mut self, lock: &KilnfileLock) -> Result<()> {
        let failing = self
            .current
            .as_ref()
            .is_some_and(|name| self.failing_writes.contains(name));
        if failing {
            let mut sink: &mut [u8] = &mut [];
            lock.write_all_to(&mut sink)?;
            return Ok(());
        }
        lock.write_to(&self.workdir)
    }

    fn is_clean(&self) -> Result<bool> {
        if let Some(name) = &self.current {
            if self.failing_status.contains(name) {
                return Err(RelslashError::Git(git2::Error::from_str(
                    "simulated status failure",
                )));
            }
        }
        let committed = self
            .current
            .as_ref()
            .and_then(|name| self.locks.get(name))
            .cloned()
            .flatten();
        Ok(self.working_lock()? == committed)
    }

    fn commit_all(&mut self, message: &str, author: &CommitAuthor) -> Result<String> {
        let branch = self
            .current
            .clone()
            .ok_or_else(|| RelslashError::commit("HEAD", "no branch checked out"))?;
        if self.failing_commits.contains(&branch) {
            return Err(RelslashError::commit(branch, "simulated failure"));
        }

        let lock = self.working_lock()?;
        let id = format!("{:040x}", self.commits.len() + 1);

        self.locks.insert(branch.clone(), lock.clone());
        self.commits.push(RecordedCommit {
            id: id.clone(),
            branch,
            message: message.to_string(),
            author: author.clone(),
            lock,
        });

        Ok(id)
    }
}
