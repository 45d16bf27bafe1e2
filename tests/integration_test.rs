// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::Command;

use git2::{Repository as Git2Repo, RepositoryInitOptions, Signature};
use relslash::bump_set::BumpSetData;
use relslash::config::{CommitAuthor, Settings};
use relslash::domain::{release_lock_with_name, KilnfileLock};
use relslash::git::{Git2Repository, Repository};
use relslash::orchestrator::BumpOrchestrator;
use relslash::outcome::BranchOutcome;
use tempfile::TempDir;

fn lock_with(version: &str) -> String {
    format!(
        r#"releases:
- name: bpm
  sha1: 4f2c9a
  version: "1.1.0"
  remote_source: final-pcf-bosh-releases
  remote_path: bpm/bpm-1.1.0.tgz
- name: uaa
  sha1: 3a2b1c
  version: "{}"
  remote_source: final-pcf-bosh-releases
  remote_path: uaa/uaa-{}.tgz
"#,
        version, version
    )
}

/// Commits a tree holding only `Kilnfile.lock` as a root commit of `branch`.
fn commit_lock(repo: &Git2Repo, branch: &str, content: &str) {
    let blob = repo.blob(content.as_bytes()).unwrap();
    let mut builder = repo.treebuilder(None).unwrap();
    builder.insert("Kilnfile.lock", blob, 0o100644).unwrap();
    let tree = repo.find_tree(builder.write().unwrap()).unwrap();
    let signature = Signature::now("Fixture", "fixture@example.com").unwrap();
    repo.commit(
        Some(&format!("refs/heads/{}", branch)),
        &signature,
        &signature,
        "add Kilnfile.lock",
        &tree,
        &[],
    )
    .unwrap();
}

fn tile_repo(branches: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    let mut options = RepositoryInitOptions::new();
    options.initial_head("master");
    let repo = Git2Repo::init_opts(dir.path(), &options).unwrap();
    for (branch, version) in branches {
        commit_lock(&repo, branch, &lock_with(version));
    }
    dir
}

fn release_repo(versions: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    Git2Repo::init(dir.path()).unwrap();
    fs::create_dir_all(dir.path().join("config")).unwrap();
    fs::write(dir.path().join("config/final.yml"), "final_name: uaa\n").unwrap();
    fs::create_dir_all(dir.path().join("releases")).unwrap();
    for version in versions {
        fs::write(
            dir.path().join(format!("releases/uaa-{}.yml", version)),
            format!("name: uaa\nversion: \"{}\"\n", version),
        )
        .unwrap();
    }
    dir
}

fn committed_lock(path: &Path, branch: &str) -> KilnfileLock {
    let repo = Git2Repo::open(path).unwrap();
    let commit = repo
        .revparse_single(&format!("refs/heads/{}", branch))
        .unwrap()
        .peel_to_commit()
        .unwrap();
    let entry = commit.tree().unwrap().get_name("Kilnfile.lock").unwrap().id();
    let blob = repo.find_blob(entry).unwrap();
    KilnfileLock::parse(std::str::from_utf8(blob.content()).unwrap()).unwrap()
}

fn head_message(path: &Path, branch: &str) -> String {
    let repo = Git2Repo::open(path).unwrap();
    let commit = repo
        .revparse_single(&format!("refs/heads/{}", branch))
        .unwrap()
        .peel_to_commit()
        .unwrap();
    commit.message().unwrap().to_string()
}

fn author() -> CommitAuthor {
    CommitAuthor {
        name: "Release Bot".to_string(),
        email: "release-bot@example.com".to_string(),
    }
}

#[test]
fn test_bump_against_real_repositories() {
    let tile = tile_repo(&[
        ("master", "74"),
        ("rel/2.5", "73"),
        ("rel/2.6", "75"),
        ("develop", "1"),
    ]);
    let release = release_repo(&["73", "74", "75"]);

    let mut repo = Git2Repository::open(tile.path(), "tile").unwrap();
    let data = BumpSetData::load(&repo, release.path()).unwrap();

    let names: Vec<&str> = data.tile_branches.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["master", "rel/2.5", "rel/2.6"]);

    let author = author();
    let settings = Settings::default();
    let report = BumpOrchestrator::new(&mut repo, &data.catalog, &author, &settings)
        .run(&data.tile_branches);

    assert!(report.failures().is_empty(), "{:?}", report.failures());
    assert!(matches!(
        report.outcome_for("master"),
        Some(BranchOutcome::Bumped { .. })
    ));
    assert!(matches!(
        report.outcome_for("rel/2.5"),
        Some(BranchOutcome::Bumped { .. })
    ));
    assert!(matches!(
        report.outcome_for("rel/2.6"),
        Some(BranchOutcome::UpToDate { .. })
    ));

    for branch in ["master", "rel/2.5"] {
        let lock = committed_lock(tile.path(), branch);
        let (uaa, index) = release_lock_with_name("uaa", &lock.releases).unwrap();
        assert_eq!(index, 1);
        assert_eq!(uaa.version, "75");
        assert_eq!(uaa.sha1, "");
        assert_eq!(uaa.remote_path, "uaa/uaa-75.tgz");
        assert_eq!(lock.releases[0].sha1, "4f2c9a");
        assert_eq!(head_message(tile.path(), branch), "bump uaa to version 75");
    }

    assert_eq!(head_message(tile.path(), "rel/2.6"), "add Kilnfile.lock");
    assert_eq!(head_message(tile.path(), "develop"), "add Kilnfile.lock");
    assert!(repo.is_clean().unwrap());

    let again = BumpOrchestrator::new(&mut repo, &data.catalog, &author, &settings)
        .run(&data.tile_branches);
    assert!(again.commits().is_empty());
}

#[test]
fn test_version_mapping_against_real_repositories() {
    let tile = tile_repo(&[("master", "75"), ("rel/2.5", "74"), ("rel/2.6", "75")]);
    let release = release_repo(&["74", "75"]);

    let mut repo = Git2Repository::open(tile.path(), "tile").unwrap();
    let data = BumpSetData::load(&repo, release.path()).unwrap();
    let mapping = data.map_tile_branches_to_versions(&mut repo).unwrap();

    let on_75: Vec<&str> = mapping["75.0.0"].iter().map(|b| b.name.as_str()).collect();
    assert_eq!(on_75, vec!["master", "rel/2.6"]);
    assert_eq!(mapping["74.0.0"][0].name, "rel/2.5");
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_relslash"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("bump"));
    assert!(stdout.contains("data"));
}

#[test]
fn test_cli_missing_environment_exits_non_zero() {
    let output = Command::new(env!("CARGO_BIN_EXE_relslash"))
        .arg("bump")
        .env_remove("BUMP_RELEASE_PRODUCT_TILE_REPO")
        .env_remove("BUMP_RELEASE_RELEASE_REPO")
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("BUMP_RELEASE_PRODUCT_TILE_REPO variable not set"));
    assert!(stderr.contains("stopped before any tile branch was checked out"));
}

#[test]
fn test_cli_config_belongs_to_bump() {
    let output = Command::new(env!("CARGO_BIN_EXE_relslash"))
        .args(["data", "--config", "/tmp/relslash.toml"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("--config"));
}

#[test]
fn test_cli_data_branch_failure_is_not_reported_as_preflight() {
    let tile = TempDir::new().unwrap();
    let mut options = RepositoryInitOptions::new();
    options.initial_head("master");
    let repo = Git2Repo::init_opts(tile.path(), &options).unwrap();
    commit_lock(&repo, "master", "releases: []\n");
    let release = release_repo(&["75"]);

    let output = Command::new(env!("CARGO_BIN_EXE_relslash"))
        .arg("data")
        .env("BUMP_RELEASE_PRODUCT_TILE_REPO", tile.path())
        .env("BUMP_RELEASE_RELEASE_REPO", release.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("could not find release lock with name: uaa"));
    assert!(!stderr.contains("stopped before any tile branch was checked out"));
}

#[test]
fn test_cli_bump_end_to_end() {
    let tile = tile_repo(&[("master", "74"), ("rel/2.5", "75")]);
    let release = release_repo(&["74", "75"]);
    let settings = TempDir::new().unwrap();
    let settings_path = settings.path().join("relslash.toml");
    fs::write(&settings_path, "remote_source = \"final-pcf-bosh-releases\"\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_relslash"))
        .args(["bump", "--config", settings_path.to_str().unwrap()])
        .current_dir(settings.path())
        .env("BUMP_RELEASE_PRODUCT_TILE_REPO", tile.path())
        .env("BUMP_RELEASE_RELEASE_REPO", release.path())
        .env("BUMP_RELEASE_COMMIT_AUTHOR_NAME", "Release Bot")
        .env("BUMP_RELEASE_COMMIT_AUTHOR_EMAIL", "release-bot@example.com")
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(head_message(tile.path(), "master"), "bump uaa to version 75");
    assert_eq!(head_message(tile.path(), "rel/2.5"), "add Kilnfile.lock");
}

#[test]
fn test_cli_bump_missing_release_repo_is_fatal() {
    let tile = tile_repo(&[("master", "74")]);
    let missing = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_relslash"))
        .arg("bump")
        .env("BUMP_RELEASE_PRODUCT_TILE_REPO", tile.path())
        .env("BUMP_RELEASE_RELEASE_REPO", missing.path().join("nope"))
        .env("BUMP_RELEASE_COMMIT_AUTHOR_NAME", "Release Bot")
        .env("BUMP_RELEASE_COMMIT_AUTHOR_EMAIL", "release-bot@example.com")
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("could not open release repository"));
    assert_eq!(head_message(tile.path(), "master"), "add Kilnfile.lock");
}
