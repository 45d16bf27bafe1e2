//! Domain logic - pure rules about releases, branches and lock files

pub mod branch;
pub mod catalog;
pub mod lock;
pub mod version;

pub use branch::{supported_tile_branches, TileBranch};
pub use catalog::ReleaseCatalog;
pub use lock::{release_lock_with_name, KilnfileLock, ReleaseLock};
pub use version::parse_release_version;
