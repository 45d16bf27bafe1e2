//! Release catalog - the versions a release repository makes available.
//!
//! A release repository carries its canonical name in `config/final.yml` and
//! one definition file per final release under `releases/`. The catalog is
//! built once per run from the checked-out state of that repository and is
//! immutable afterwards.

use std::fs;
use std::path::Path;

use semver::Version;
use serde::{Deserialize, Serialize};

use super::version::{looks_like_semver, parse_release_version, version_segment};
use crate::error::{RelslashError, Result};

/// Release metadata file, relative to the release repository root.
pub const RELEASE_METADATA_FILE: &str = "config/final.yml";

/// Release definition directory, relative to the release repository root.
pub const RELEASE_DEFINITIONS_DIR: &str = "releases";

#[derive(Debug, Deserialize)]
struct ReleaseMetadata {
    #[serde(default)]
    final_name: String,
}

/// Ordered collection of the versions available for one release.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseCatalog {
    pub release_name: String,
    pub versions: Vec<Version>,
    /// Set when any definition file's version segment contained one or two
    /// dots. Catalog wide and sticky.
    pub is_semver: bool,
}

impl ReleaseCatalog {
    /// Build a catalog from already parsed parts.
    ///
    /// Versions are sorted ascending. An empty release name is rejected.
    pub fn new(
        release_name: impl Into<String>,
        mut versions: Vec<Version>,
        is_semver: bool,
    ) -> Result<Self> {
        let release_name = release_name.into();
        if release_name.trim().is_empty() {
            return Err(RelslashError::catalog("bosh release name was not found"));
        }

        versions.sort();

        Ok(ReleaseCatalog {
            release_name,
            versions,
            is_semver,
        })
    }

    /// Load the catalog from a release repository working tree.
    pub fn load(release_repo_dir: &Path) -> Result<Self> {
        let release_name = read_release_name(release_repo_dir)?;

        let definitions_dir = release_repo_dir.join(RELEASE_DEFINITIONS_DIR);
        let entries = fs::read_dir(&definitions_dir).map_err(|e| {
            RelslashError::catalog(format!(
                "could not list release definitions in {}: {}",
                definitions_dir.display(),
                e
            ))
        })?;

        let mut file_names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                RelslashError::catalog(format!(
                    "could not list release definitions in {}: {}",
                    definitions_dir.display(),
                    e
                ))
            })?;
            if let Some(name) = entry.file_name().to_str() {
                file_names.push(name.to_string());
            }
        }

        let (versions, is_semver) = parse_release_versions(&file_names);

        tracing::debug!(
            release = %release_name,
            files = file_names.len(),
            versions = versions.len(),
            is_semver,
            "loaded release catalog"
        );

        ReleaseCatalog::new(release_name, versions, is_semver)
    }

    /// Highest version in the catalog, if any.
    pub fn highest(&self) -> Option<&Version> {
        self.versions.last()
    }
}

/// Reads the canonical release name from `config/final.yml`.
///
/// A missing or empty `final_name` is an error rather than an empty name.
pub fn read_release_name(release_repo_dir: &Path) -> Result<String> {
    let path = release_repo_dir.join(RELEASE_METADATA_FILE);
    let content = fs::read_to_string(&path).map_err(|e| {
        RelslashError::catalog(format!(
            "could not read bosh release's \"{}\" file: {}",
            RELEASE_METADATA_FILE, e
        ))
    })?;

    let metadata: ReleaseMetadata = serde_yaml_ng::from_str(&content).map_err(|e| {
        RelslashError::catalog(format!(
            "could not parse yaml in bosh release's \"{}\" file: {}",
            RELEASE_METADATA_FILE, e
        ))
    })?;

    if metadata.final_name.trim().is_empty() {
        return Err(RelslashError::catalog("bosh release name was not found"));
    }

    Ok(metadata.final_name)
}

/// Extracts release versions from a release definition directory listing.
///
/// Only names ending in the definition extension are considered. The
/// returned flag is true when any considered segment had one or two dots,
/// whether or not that segment parsed. Segments that fail to parse are
/// skipped. The returned versions are in listing order.
pub fn parse_release_versions<S: AsRef<str>>(file_names: &[S]) -> (Vec<Version>, bool) {
    let mut versions = Vec::new();
    let mut is_semver = false;

    for name in file_names {
        let Some(segment) = version_segment(name.as_ref()) else {
            continue;
        };

        if looks_like_semver(segment) {
            is_semver = true;
        }

        match parse_release_version(segment) {
            Some(version) => versions.push(version),
            None => tracing::trace!(file = name.as_ref(), "skipping unparsable release file"),
        }
    }

    (versions, is_semver)
}
