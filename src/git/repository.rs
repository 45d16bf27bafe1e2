use std::path::{Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{BranchType, Repository as Git2Repo, Signature, StatusOptions};

use crate::config::CommitAuthor;
use crate::domain::TileBranch;
use crate::error::{RelslashError, Result};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    workdir: PathBuf,
    current_branch: Option<String>,
}

impl Git2Repository {
    /// Open the non-bare repository at exactly `path`.
    ///
    /// `which` names the repository in errors ("tile", "release").
    pub fn open<P: AsRef<Path>>(path: P, which: &'static str) -> Result<Self> {
        let path = path.as_ref();
        let open_error = |source: git2::Error| RelslashError::RepositoryOpen {
            which,
            path: path.to_path_buf(),
            source,
        };

        let repo = Git2Repo::open(path).map_err(open_error)?;
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| open_error(git2::Error::from_str("repository has no working tree")))?;

        let current_branch = repo
            .head()
            .ok()
            .filter(|head| head.is_branch())
            .and_then(|head| head.shorthand().map(str::to_string));

        Ok(Git2Repository {
            repo,
            workdir,
            current_branch,
        })
    }

    /// Name of the reference HEAD points at, for progress output.
    pub fn head_name(&self) -> Result<String> {
        let head = self.repo.head()?;
        Ok(head.name().unwrap_or("HEAD").to_string())
    }

    fn force_checkout(&self, refname: &str) -> std::result::Result<(), git2::Error> {
        let object = self.repo.revparse_single(refname)?;
        let mut builder = CheckoutBuilder::new();
        builder.force();
        self.repo.checkout_tree(&object, Some(&mut builder))?;
        self.repo.set_head(refname)?;
        Ok(())
    }

    fn commit_tracked(
        &self,
        message: &str,
        author: &CommitAuthor,
    ) -> std::result::Result<String, git2::Error> {
        let mut index = self.repo.index()?;
        index.update_all(["*"], None)?;
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let signature = Signature::now(&author.name, &author.email)?;
        let parent = self.repo.head()?.peel_to_commit()?;

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;
        Ok(oid.to_string())
    }
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn list_branches(&self) -> Result<Vec<TileBranch>> {
        let mut branches = Vec::new();

        for entry in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;
            let Some(name) = branch.name()? else {
                continue;
            };
            let target = branch.get().target().map(|oid| oid.to_string());
            branches.push(TileBranch::new(name, target));
        }

        Ok(branches)
    }

    fn checkout_branch(&mut self, branch: &TileBranch) -> Result<()> {
        let refname = format!("refs/heads/{}", branch.name);
        self.force_checkout(&refname)
            .map_err(|e| RelslashError::checkout(&branch.name, e))?;
        self.current_branch = Some(branch.name.clone());
        Ok(())
    }

    fn is_clean(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(true).include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses.is_empty())
    }

    fn commit_all(&mut self, message: &str, author: &CommitAuthor) -> Result<String> {
        let branch = self
            .current_branch
            .clone()
            .unwrap_or_else(|| "HEAD".to_string());
        self.commit_tracked(message, author)
            .map_err(|e| RelslashError::commit(branch, e))
    }
}
