use crate::domain::{ReleaseCatalog, ReleaseLock};
use crate::error::{RelslashError, Result};

/// Target version decided for one branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpDecision {
    pub target_version: String,
    pub changed: bool,
}

/// Decides the version a lock entry should be bumped to.
///
/// Releases versioned by a monotonic release number are bumped to the major
/// component of the highest catalog version. Dotted semantic versions need
/// branch-aware selection that is not implemented; those catalogs produce
/// [`RelslashError::PlanUnsupported`] so the caller skips the branch instead
/// of writing a wrong version.
pub fn plan(catalog: &ReleaseCatalog, current: &ReleaseLock) -> Result<BumpDecision> {
    if catalog.is_semver {
        // TODO: master should take the highest major; rel/ branches the highest patch of their minor.
        return Err(RelslashError::unsupported(
            "case when bosh release is a semver is not handled",
        ));
    }

    let highest = catalog.highest().ok_or_else(|| {
        RelslashError::unsupported(format!(
            "no versions found for bosh release {:?}",
            catalog.release_name
        ))
    })?;

    let target_version = highest.major.to_string();
    let changed = target_version != current.version;

    Ok(BumpDecision {
        target_version,
        changed,
    })
}
