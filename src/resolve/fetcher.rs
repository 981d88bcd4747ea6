//! Upstream refs retrieval.
//!
//! # Responsibilities
//! - Build the smart-HTTP discovery URL for a base repository path
//! - Perform one GET per call, no retries, no caching
//! - Treat anything but 200/304 as "repository not found"

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;

/// The only service the gateway proxies.
pub const UPLOAD_PACK_SERVICE: &str = "git-upload-pack";

/// Errors from a single upstream fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid upstream url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("repository not found (upstream status {0})")]
    Status(u16),
}

/// Source of raw refs advertisements.
#[async_trait]
pub trait RefsFetcher: Send + Sync {
    /// Fetch the `git-upload-pack` advertisement of `base_path`.
    async fn fetch_refs(&self, base_path: &str) -> Result<Vec<u8>, FetchError>;
}

/// `<scheme>://<base>.git/info/refs?service=git-upload-pack`
pub fn refs_url(scheme: &str, base_path: &str) -> Result<Url, FetchError> {
    parse_url(format!(
        "{scheme}://{base_path}.git/info/refs?service={UPLOAD_PACK_SERVICE}"
    ))
}

/// `<scheme>://<base>.git/git-upload-pack`
pub fn upload_pack_url(scheme: &str, base_path: &str) -> Result<Url, FetchError> {
    parse_url(format!("{scheme}://{base_path}.git/{UPLOAD_PACK_SERVICE}"))
}

fn parse_url(url: String) -> Result<Url, FetchError> {
    Url::parse(&url).map_err(|source| FetchError::InvalidUrl { url, source })
}

/// Fetches advertisements over HTTP(S) with a shared connection pool.
#[derive(Debug, Clone)]
pub struct HttpRefsFetcher {
    client: reqwest::Client,
    scheme: String,
}

impl HttpRefsFetcher {
    pub fn new(config: &UpstreamConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            scheme: config.scheme.clone(),
        })
    }
}

#[async_trait]
impl RefsFetcher for HttpRefsFetcher {
    async fn fetch_refs(&self, base_path: &str) -> Result<Vec<u8>, FetchError> {
        let url = refs_url(&self.scheme, base_path)?;
        tracing::debug!(url = %url, "Fetching upstream refs");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::NOT_MODIFIED {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refs_url() {
        let url = refs_url("https", "github.com/rsenk330/gogetver").unwrap();
        assert_eq!(
            url.as_str(),
            "https://github.com/rsenk330/gogetver.git/info/refs?service=git-upload-pack"
        );
    }

    #[test]
    fn test_upload_pack_url() {
        let url = upload_pack_url("https", "github.com/rsenk330/gogetver").unwrap();
        assert_eq!(
            url.as_str(),
            "https://github.com/rsenk330/gogetver.git/git-upload-pack"
        );
    }

    #[test]
    fn test_invalid_base_path() {
        let err = refs_url("https", "exa mple.com/u/repo").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
