//! Candidate version generation.
//!
//! The first dot of a path is taken to belong to the host name
//! (`github.com`), so it never starts a version. Every later dot does:
//! `github.com/u/repo.v1.0` yields `v1.0` and `0`.

/// Version used when the path carries none.
pub const DEFAULT_VERSION: &str = "master";

/// A putative version and the repository path left once it is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCandidate {
    pub version: String,
    pub base_path: String,
}

impl VersionCandidate {
    fn new(path: &str, version: &str) -> Self {
        Self {
            version: version.to_string(),
            base_path: strip_version(path, version).to_string(),
        }
    }
}

/// Every plausible version suffix of `path`, longest first. Never empty.
pub fn possible_versions(path: &str) -> Vec<VersionCandidate> {
    let dots = path.matches('.').count();

    let mut versions: Vec<&str> = (3..=dots + 1)
        .filter_map(|n| path.splitn(n, '.').last())
        .collect();

    // Longer suffixes are more specific and must be tried first.
    versions.sort_by(|a, b| b.len().cmp(&a.len()));

    if versions.is_empty() {
        versions.push(DEFAULT_VERSION);
    }

    versions
        .into_iter()
        .map(|version| VersionCandidate::new(path, version))
        .collect()
}

/// Everything before the first occurrence of `.<version>`.
fn strip_version<'a>(path: &'a str, version: &str) -> &'a str {
    let suffix = format!(".{version}");
    path.split_once(suffix.as_str())
        .map(|(base, _)| base)
        .unwrap_or(path)
}
