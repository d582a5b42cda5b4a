//! Packaging helpers: dependency lists and project metadata for build tooling.

pub mod metadata;
pub mod requirements;

pub use metadata::{PackageMetadata, find_packages};
pub use requirements::{HYPHEN_E_DOT, get_requirements, parse_requirements};
