//! Refs advertisement decoding and rewriting.
//!
//! A `git-upload-pack` advertisement looks like
//!
//! ```text
//! 001e# service=git-upload-pack\n
//! 0000
//! 00xx<hash> HEAD\0<capabilities>\n
//! 003f<hash> refs/heads/master\n
//! 003c<hash> refs/tags/v1.0\n
//! 0000
//! ```
//!
//! Only lines of the shape `<40 hex> <ref name>` are turned into
//! [`RefRecord`]s; everything else is carried along untouched.

use thiserror::Error;

use crate::protocol::pktline::{self, FramingError, PacketKind};

/// Ref the gateway repoints at the resolved commit.
pub const DEFAULT_BRANCH: &str = "refs/heads/master";

/// Length of a hex-encoded SHA-1 object id.
pub const HASH_LEN: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvertisementError {
    #[error("malformed advertisement: {0}")]
    Framing(#[from] FramingError),

    #[error("advertisement has no line for `{0}`")]
    RefNotFound(String),

    #[error("advertisement has no `refs/heads/master` line to rewrite")]
    DefaultBranchNotFound,
}

/// One `<hash> <name>` line of an advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefRecord<'a> {
    pub hash: &'a str,
    pub name: &'a str,
    /// Offset of the hash within the advertisement.
    pub hash_offset: usize,
}

impl<'a> RefRecord<'a> {
    /// Decode a packet payload, returning `None` for non-ref lines.
    fn parse(data: &'a [u8], data_offset: usize) -> Option<Self> {
        let line = data.strip_suffix(b"\n").unwrap_or(data);
        // The first ref line carries capabilities after a NUL.
        let line = match line.iter().position(|&b| b == 0) {
            Some(nul) => &line[..nul],
            None => line,
        };

        if line.len() <= HASH_LEN + 1 || line[HASH_LEN] != b' ' {
            return None;
        }

        let hash = &line[..HASH_LEN];
        if !hash.iter().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return None;
        }

        Some(Self {
            hash: std::str::from_utf8(hash).ok()?,
            name: std::str::from_utf8(&line[HASH_LEN + 1..]).ok()?,
            hash_offset: data_offset,
        })
    }
}

/// Decoded view over a raw advertisement.
#[derive(Debug)]
pub struct Advertisement<'a> {
    raw: &'a [u8],
    refs: Vec<RefRecord<'a>>,
}

impl<'a> Advertisement<'a> {
    pub fn parse(raw: &'a [u8]) -> Result<Self, AdvertisementError> {
        let mut refs = Vec::new();
        for packet in pktline::packets(raw) {
            let packet = packet?;
            if packet.kind != PacketKind::Data {
                continue;
            }
            if let Some(record) = RefRecord::parse(packet.data, packet.data_offset()) {
                refs.push(record);
            }
        }
        Ok(Self { raw, refs })
    }

    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    pub fn refs(&self) -> &[RefRecord<'a>] {
        &self.refs
    }

    /// First record named exactly `name`.
    pub fn find(&self, name: &str) -> Option<&RefRecord<'a>> {
        self.refs.iter().find(|record| record.name == name)
    }

    pub fn contains_ref(&self, name: &str) -> bool {
        self.find(name).is_some()
    }
}

/// Point `refs/heads/master` at the commit `matched_ref` advertises.
///
/// Only the 40 hash bytes of the master line change; the length prefix
/// and every other byte of the advertisement are copied verbatim.
pub fn rewrite_default_branch(
    raw: &[u8],
    matched_ref: &str,
) -> Result<Vec<u8>, AdvertisementError> {
    let advertisement = Advertisement::parse(raw)?;

    let target = advertisement
        .find(matched_ref)
        .ok_or_else(|| AdvertisementError::RefNotFound(matched_ref.to_string()))?;

    let mut rewritten = raw.to_vec();
    let mut replaced = 0;
    for record in advertisement.refs().iter().filter(|r| r.name == DEFAULT_BRANCH) {
        let start = record.hash_offset;
        rewritten[start..start + HASH_LEN].copy_from_slice(target.hash.as_bytes());
        replaced += 1;
    }

    if replaced == 0 {
        return Err(AdvertisementError::DefaultBranchNotFound);
    }

    tracing::debug!(
        matched_ref = %matched_ref,
        hash = %target.hash,
        "Rewrote default branch"
    );

    Ok(rewritten)
}
