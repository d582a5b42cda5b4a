use super::requirements::get_requirements;
use serde::Serialize;
use std::{fs, io, path::Path};

/// Project metadata handed to build and install tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub author: String,
    pub author_email: Option<String>,
    pub packages: Vec<String>,
    pub install_requires: Vec<String>,
}

impl PackageMetadata {
    /// Build metadata for the project rooted at `root`.
    ///
    /// Name, version and author come from this crate's manifest; packages are
    /// discovered under `root/src` and requirements read from
    /// `root/requirements.txt`.
    pub fn from_manifest(root: &Path) -> io::Result<Self> {
        let (author, author_email) = parse_author(env!("CARGO_PKG_AUTHORS"));
        Ok(Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            author,
            author_email,
            packages: find_packages(&root.join("src"))?,
            install_requires: get_requirements(root.join("requirements.txt"))?,
        })
    }
}

/// Split the first `Name <email>` entry of a colon-separated author list.
fn parse_author(authors: &str) -> (String, Option<String>) {
    let first = authors.split(':').next().unwrap_or_default().trim();
    match first.split_once('<') {
        Some((name, rest)) => (
            name.trim().to_string(),
            Some(rest.trim_end_matches('>').trim().to_string()),
        ),
        None => (first.to_string(), None),
    }
}

/// Module paths of every directory under `dir` holding a `mod.rs`, sorted.
///
/// Only descends into directories that are themselves modules.
pub fn find_packages(dir: &Path) -> io::Result<Vec<String>> {
    let mut found = Vec::new();
    collect_packages(dir, None, &mut found)?;
    found.sort();
    Ok(found)
}

fn collect_packages(dir: &Path, prefix: Option<&str>, found: &mut Vec<String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() || !path.join("mod.rs").is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        let qualified = match prefix {
            Some(p) => format!("{p}::{name}"),
            None => name.to_string(),
        };
        collect_packages(&path, Some(&qualified), found)?;
        found.push(qualified);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_with_email() {
        let (name, email) = parse_author("samuel <samuel@example.com>:other <o@example.com>");
        assert_eq!(name, "samuel");
        assert_eq!(email.as_deref(), Some("samuel@example.com"));
    }

    #[test]
    fn author_without_email() {
        assert_eq!(parse_author("solo"), ("solo".to_string(), None));
    }
}
