//! Version resolution.
//!
//! Candidates are tried longest first. The first one whose base path
//! advertises `refs/heads/<v>` or `refs/tags/<v>` (in that order) wins and
//! no further upstream calls are made.

use std::sync::Arc;

use thiserror::Error;

use crate::observability::metrics;
use crate::protocol::Advertisement;
use crate::resolve::candidates::{possible_versions, VersionCandidate};
use crate::resolve::fetcher::RefsFetcher;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("could not find a version for `{path}`")]
    VersionNotResolved { path: String },
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// The candidate that matched, e.g. `v1.0`.
    pub version: String,
    /// Full ref name, e.g. `refs/tags/v1.0`.
    pub reference: String,
    /// Repository path with the version removed.
    pub base_path: String,
    /// Advertisement fetched for `base_path`, unmodified.
    pub advertisement: Vec<u8>,
}

/// Resolves vantage paths against upstream refs.
#[derive(Clone)]
pub struct VersionResolver {
    fetcher: Arc<dyn RefsFetcher>,
}

impl VersionResolver {
    pub fn new(fetcher: Arc<dyn RefsFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn resolve(&self, path: &str) -> Result<ResolvedVersion, ResolveError> {
        for candidate in possible_versions(path) {
            let advertisement = match self.fetcher.fetch_refs(&candidate.base_path).await {
                Ok(body) => {
                    metrics::record_upstream_fetch("ok");
                    body
                }
                Err(e) => {
                    metrics::record_upstream_fetch("unavailable");
                    tracing::debug!(
                        version = %candidate.version,
                        base_path = %candidate.base_path,
                        error = %e,
                        "Candidate skipped"
                    );
                    continue;
                }
            };

            if let Some(reference) = matching_ref(&candidate, &advertisement) {
                tracing::info!(
                    path = %path,
                    reference = %reference,
                    base_path = %candidate.base_path,
                    "Resolved version"
                );
                return Ok(ResolvedVersion {
                    version: candidate.version,
                    reference,
                    base_path: candidate.base_path,
                    advertisement,
                });
            }
        }

        tracing::warn!(path = %path, "No candidate version matched an upstream ref");
        Err(ResolveError::VersionNotResolved {
            path: path.to_string(),
        })
    }
}

/// Branch first, then tag.
fn matching_ref(candidate: &VersionCandidate, advertisement: &[u8]) -> Option<String> {
    let parsed = match Advertisement::parse(advertisement) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(
                base_path = %candidate.base_path,
                error = %e,
                "Ignoring unreadable advertisement"
            );
            return None;
        }
    };

    [
        format!("refs/heads/{}", candidate.version),
        format!("refs/tags/{}", candidate.version),
    ]
    .into_iter()
    .find(|reference| parsed.contains_ref(reference))
}
