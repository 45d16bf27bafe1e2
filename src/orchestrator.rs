//! Per-branch bump loop
//!
//! Each branch goes through checkout, lock read, planning and, when the plan
//! changes the pinned version, lock write and commit. Any failure is recorded
//! against that branch and the loop continues with the next one. Branches are
//! processed strictly one after another because they share one working tree.

use crate::config::{CommitAuthor, Settings};
use crate::domain::{release_lock_with_name, KilnfileLock, ReleaseCatalog, TileBranch};
use crate::error::{RelslashError, Result};
use crate::git::Repository;
use crate::outcome::{BranchOutcome, BumpReport};
use crate::planner;

/// Drives bumps of one release across tile branches
pub struct BumpOrchestrator<'a, R: Repository> {
    repo: &'a mut R,
    catalog: &'a ReleaseCatalog,
    author: &'a CommitAuthor,
    settings: &'a Settings,
    dry_run: bool,
}

impl<'a, R: Repository> BumpOrchestrator<'a, R> {
    pub fn new(
        repo: &'a mut R,
        catalog: &'a ReleaseCatalog,
        author: &'a CommitAuthor,
        settings: &'a Settings,
    ) -> Self {
        BumpOrchestrator {
            repo,
            catalog,
            author,
            settings,
            dry_run: false,
        }
    }

    /// Plan every branch but leave lock files and history untouched
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Processes `branches` in order and reports each outcome.
    pub fn run(&mut self, branches: &[TileBranch]) -> BumpReport {
        let mut report = BumpReport::default();

        for branch in branches {
            tracing::info!(branch = %branch.name, "checking out tile repository");

            let outcome = match self.bump_branch(branch) {
                Ok(outcome) => outcome,
                Err(err) => BranchOutcome::Failed(err),
            };

            match &outcome {
                BranchOutcome::Failed(err) => {
                    tracing::warn!(branch = %branch.name, error = %err, "branch failed")
                }
                other => tracing::info!(branch = %branch.name, outcome = %other, "branch done"),
            }

            report.push(branch.name.clone(), outcome);
        }

        report
    }

    fn bump_branch(&mut self, branch: &TileBranch) -> Result<BranchOutcome> {
        self.repo.checkout_branch(branch)?;

        let mut lock = KilnfileLock::read_from(self.repo.workdir())?;

        let release_name = self.catalog.release_name.as_str();
        let (current, index) = release_lock_with_name(release_name, &lock.releases)?;
        let mut release = current.clone();

        tracing::debug!(
            branch = %branch.name,
            release = %release.name,
            version = %release.version,
            "current Kilnfile.lock entry"
        );

        let decision = match planner::plan(self.catalog, &release) {
            Ok(decision) => decision,
            Err(RelslashError::PlanUnsupported(reason)) => {
                return Ok(BranchOutcome::Unsupported { reason })
            }
            Err(err) => return Err(err),
        };

        if !decision.changed {
            return Ok(BranchOutcome::UpToDate {
                version: release.version,
            });
        }

        let from = release.version.clone();
        let to = decision.target_version;

        if self.dry_run {
            return Ok(BranchOutcome::WouldBump { from, to });
        }

        release.bump_to(release_name, &to, &self.settings.remote_source);
        lock.releases[index] = release;
        self.repo.write_lock(&lock)?;

        if self.repo.is_clean()? {
            return Ok(BranchOutcome::NothingToCommit { version: to });
        }

        let message = self.settings.commit_message_for(release_name, &to);
        let commit = self.repo.commit_all(&message, self.author)?;

        Ok(BranchOutcome::Bumped { from, to, commit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use semver::Version;
    use tempfile::TempDir;

    fn lock_with(version: &str) -> String {
        format!(
            "releases:\n- name: uaa\n  sha1: abc\n  version: \"{}\"\n  remote_source: old\n  remote_path: old/uaa.tgz\n",
            version
        )
    }

    fn author() -> CommitAuthor {
        CommitAuthor {
            name: "Bot".to_string(),
            email: "bot@example.com".to_string(),
        }
    }

    fn catalog(is_semver: bool) -> ReleaseCatalog {
        ReleaseCatalog::new(
            "uaa",
            vec![Version::new(74, 0, 0), Version::new(75, 0, 0)],
            is_semver,
        )
        .unwrap()
    }

    #[test]
    fn test_bumps_outdated_branch() {
        let dir = TempDir::new().unwrap();
        let mut repo = MockRepository::new(dir.path());
        repo.add_branch("master", Some(&lock_with("74")));
        let branches = repo.list_branches().unwrap();

        let catalog = catalog(false);
        let author = author();
        let settings = Settings::default();
        let report = BumpOrchestrator::new(&mut repo, &catalog, &author, &settings).run(&branches);

        assert!(matches!(
            report.outcome_for("master"),
            Some(BranchOutcome::Bumped { to, .. }) if to == "75"
        ));
        assert_eq!(repo.commits().len(), 1);
        assert_eq!(repo.commits()[0].message, "bump uaa to version 75");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut repo = MockRepository::new(dir.path());
        repo.add_branch("master", Some(&lock_with("74")));
        let branches = repo.list_branches().unwrap();

        let catalog = catalog(false);
        let author = author();
        let settings = Settings::default();
        let report = BumpOrchestrator::new(&mut repo, &catalog, &author, &settings)
            .dry_run(true)
            .run(&branches);

        assert!(matches!(
            report.outcome_for("master"),
            Some(BranchOutcome::WouldBump { from, to }) if from == "74" && to == "75"
        ));
        assert!(repo.commits().is_empty());
        assert!(repo.is_clean().unwrap());
    }
}
