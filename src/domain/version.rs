use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};

/// Extension carried by every release definition file.
pub const RELEASE_DEFINITION_EXTENSION: &str = ".yml";

const RELEASE_VERSION_PATTERN: &str =
    r"^[vV]?(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:\+([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?$";

/// Parses a release version leniently.
///
/// Release versions are frequently bare integers ("5") or two-component
/// ("1.2"), so missing minor and patch components default to zero. A leading
/// `v` and trailing `+build` metadata are accepted.
///
/// # Example
/// ```
/// use relslash::domain::version::parse_release_version;
///
/// assert_eq!(parse_release_version("5").unwrap().to_string(), "5.0.0");
/// assert_eq!(parse_release_version("v1.2").unwrap().to_string(), "1.2.0");
/// assert!(parse_release_version("latest").is_none());
/// ```
pub fn parse_release_version(segment: &str) -> Option<Version> {
    let re = Regex::new(RELEASE_VERSION_PATTERN).ok()?;
    let caps = re.captures(segment)?;

    let component = |i: usize| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    let build = match caps.get(4) {
        Some(m) => BuildMetadata::new(m.as_str()).ok()?,
        None => BuildMetadata::EMPTY,
    };

    Some(Version {
        major: component(1)?,
        minor: component(2)?,
        patch: component(3)?,
        pre: Prerelease::EMPTY,
        build,
    })
}

/// Returns the version segment of a release definition file name.
///
/// `cf-networking-2.3.1.yml` yields `2.3.1`. Files without the release
/// definition extension yield `None`.
pub fn version_segment(file_name: &str) -> Option<&str> {
    let stem = file_name.strip_suffix(RELEASE_DEFINITION_EXTENSION)?;
    stem.rsplit('-').next()
}

/// A segment with one or two dots looks like a dotted semantic version.
pub fn looks_like_semver(segment: &str) -> bool {
    matches!(segment.matches('.').count(), 1 | 2)
}
