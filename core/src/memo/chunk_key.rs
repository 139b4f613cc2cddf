//! Data-entry key tagging for certificate metadata chunks

use std::fmt::Display;

/// Prefix shared by every metadata data-entry key. Kept byte-for-byte
/// compatible with previously-issued badges.
pub const CHUNK_KEY_PREFIX: &str = "cert_meta_";

/// Parsed form of a metadata data-entry key.
///
/// Two wire shapes exist: `cert_meta_<shortId>` for a payload that fits
/// one entry, and `cert_meta_<shortId>_<index>` for ordered slices of a
/// larger payload. The index lives in the key so chunks can be
/// reassembled regardless of the order effects come back in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChunkKey {
    pub short_event_id: String,
    pub index: Option<u32>,
}

impl ChunkKey {
    pub fn single(short_event_id: &str) -> Self {
        Self {
            short_event_id: short_event_id.to_owned(),
            index: None,
        }
    }

    pub fn indexed(short_event_id: &str, index: u32) -> Self {
        Self {
            short_event_id: short_event_id.to_owned(),
            index: Some(index),
        }
    }

    /// Parse a data-entry name. Returns `None` for names outside the
    /// `cert_meta_` namespace.
    ///
    /// A trailing `_<n>` is read as a chunk index only when `n` parses
    /// as `u32` and a non-empty base remains. Short ids emitted by this
    /// crate are 8-character prefixes and cannot contain `_`, but names
    /// written by other tooling are parsed defensively rather than
    /// assumed well-formed.
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(CHUNK_KEY_PREFIX)?;
        if rest.is_empty() {
            return None;
        }
        if let Some((base, suffix)) = rest.rsplit_once('_') {
            if !base.is_empty() {
                if let Ok(index) = suffix.parse::<u32>() {
                    return Some(Self::indexed(base, index));
                }
            }
        }
        Some(Self::single(rest))
    }
}

impl Display for ChunkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}{}_{}", CHUNK_KEY_PREFIX, self.short_event_id, index),
            None => write!(f, "{}{}", CHUNK_KEY_PREFIX, self.short_event_id),
        }
    }
}
