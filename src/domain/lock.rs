//! Kilnfile.lock codec.
//!
//! The lock document pins each bosh release a tile depends on. Reading and
//! writing preserves entry order, every field of untouched entries and any
//! top-level keys besides `releases`.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RelslashError, Result};

/// Lock document file name, relative to the tile repository root.
pub const KILNFILE_LOCK: &str = "Kilnfile.lock";

/// Parsed lock document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KilnfileLock {
    #[serde(default)]
    pub releases: Vec<ReleaseLock>,

    #[serde(flatten)]
    pub other: serde_yaml_ng::Mapping,
}

/// One pinned release
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseLock {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sha1: String,
    pub version: String,
    #[serde(default)]
    pub remote_source: String,
    #[serde(default)]
    pub remote_path: String,
}

impl ReleaseLock {
    /// Point this entry at a new version of `release_name`.
    ///
    /// The checksum is cleared since it described the previous tarball.
    pub fn bump_to(&mut self, release_name: &str, version: &str, remote_source: &str) {
        self.version = version.to_string();
        self.sha1.clear();
        self.remote_source = remote_source.to_string();
        self.remote_path = remote_path(release_name, version);
    }
}

/// Remote tarball path for a release version.
pub fn remote_path(release_name: &str, version: &str) -> String {
    format!("{0}/{0}-{1}.tgz", release_name, version)
}

/// Finds the first entry named `name` and its index.
pub fn release_lock_with_name<'a>(
    name: &str,
    releases: &'a [ReleaseLock],
) -> Result<(&'a ReleaseLock, usize)> {
    releases
        .iter()
        .enumerate()
        .find(|(_, release)| release.name == name)
        .map(|(index, release)| (release, index))
        .ok_or_else(|| RelslashError::ReleaseLockNotFound(name.to_string()))
}

impl KilnfileLock {
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml_ng::from_str(content).map_err(|e| {
            RelslashError::lock(format!(
                "could not parse yaml in \"{}\" file: {}",
                KILNFILE_LOCK, e
            ))
        })
    }

    pub fn render(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Reads `Kilnfile.lock` from a working tree.
    pub fn read_from(dir: &Path) -> Result<Self> {
        let path = dir.join(KILNFILE_LOCK);
        let content = fs::read_to_string(&path).map_err(|e| {
            RelslashError::lock(format!("could not read \"{}\" file: {}", KILNFILE_LOCK, e))
        })?;
        Self::parse(&content)
    }

    /// Overwrites the existing `Kilnfile.lock` in a working tree.
    ///
    /// The file must already exist; it is truncated, not created.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let path = dir.join(KILNFILE_LOCK);
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| {
                RelslashError::lock(format!("could not open \"{}\": {}", KILNFILE_LOCK, e))
            })?;

        self.write_all_to(&mut file)?;
        file.flush()?;
        Ok(())
    }

    /// Writes the rendered document with a single write call.
    ///
    /// A writer that accepts fewer bytes than rendered yields
    /// [`RelslashError::ShortWrite`].
    pub fn write_all_to<W: Write>(&self, writer: &mut W) -> Result<usize> {
        let buf = self.render()?;
        let written = writer.write(buf.as_bytes())?;
        if written != buf.len() {
            return Err(RelslashError::ShortWrite {
                written,
                expected: buf.len(),
            });
        }
        Ok(written)
    }
}
