//! Data behind the read-only status view
//!
//! [BumpSetData] gathers what a bump run decides from: the release catalog
//! and the ordered tile branches. [VersionMapping] adds which release
//! version each branch currently pins.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::domain::{
    parse_release_version, release_lock_with_name, supported_tile_branches, KilnfileLock,
    ReleaseCatalog, TileBranch,
};
use crate::error::Result;
use crate::git::Repository;

/// Locked version string -> branches pinning it
pub type VersionMapping = BTreeMap<String, Vec<TileBranch>>;

/// Catalog and branch list for one release
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BumpSetData {
    #[serde(flatten)]
    pub catalog: ReleaseCatalog,
    pub tile_branches: Vec<TileBranch>,
}

/// Full document served to the status view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BumpSetReport {
    #[serde(flatten)]
    pub data: BumpSetData,
    pub version_mapping: VersionMapping,
}

impl BumpSetData {
    /// Enumerates supported tile branches and loads the release catalog.
    pub fn load<R: Repository>(tile_repo: &R, release_repo_dir: &Path) -> Result<Self> {
        let tile_branches = supported_tile_branches(tile_repo.list_branches()?);
        let catalog = ReleaseCatalog::load(release_repo_dir)?;

        tracing::debug!(
            release = %catalog.release_name,
            branches = tile_branches.len(),
            "loaded bump set"
        );

        Ok(BumpSetData {
            catalog,
            tile_branches,
        })
    }

    /// Checks out every tile branch and groups branches by the version they
    /// lock for this release.
    ///
    /// Locked versions are normalized through the release version parser so
    /// "5" and "5.0.0" group together; unparsable versions are kept verbatim.
    /// The first failing branch aborts the mapping.
    pub fn map_tile_branches_to_versions<R: Repository>(
        &self,
        tile_repo: &mut R,
    ) -> Result<VersionMapping> {
        let mut mapping = VersionMapping::new();

        for branch in &self.tile_branches {
            tracing::debug!(branch = %branch.name, "checking out tile repository");
            tile_repo.checkout_branch(branch)?;

            let lock = KilnfileLock::read_from(tile_repo.workdir())?;
            let (release, _) = release_lock_with_name(&self.catalog.release_name, &lock.releases)?;

            let key = parse_release_version(&release.version)
                .map(|v| v.to_string())
                .unwrap_or_else(|| release.version.clone());

            mapping.entry(key).or_default().push(branch.clone());
        }

        Ok(mapping)
    }

    pub fn into_report(self, version_mapping: VersionMapping) -> BumpSetReport {
        BumpSetReport {
            data: self,
            version_mapping,
        }
    }
}

impl BumpSetReport {
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
