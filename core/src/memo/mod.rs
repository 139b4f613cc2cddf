//! Memo codec
//!
//! Certificate metadata travels on the ledger through two tiny side
//! channels: the transaction text memo (28 bytes) and attached data
//! entries (64-byte values). Encoding squeezes the metadata into those
//! limits; decoding reassembles it from whatever survived, tolerating
//! truncation and out-of-order chunk delivery. Entries are written once
//! and can never be edited, so a truncated entry is a permanent fact of
//! the ledger, not a transient failure.

pub(crate) mod chunk_key;
pub mod error;

pub use chunk_key::{ChunkKey, CHUNK_KEY_PREFIX};
pub use error::MemoError;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::commons::models::CertificateMetadata;

/// Byte budget of a ledger text memo.
pub const MEMO_TEXT_LIMIT: usize = 28;
/// Byte budget of a single data-entry value.
pub const DATA_VALUE_LIMIT: usize = 64;
/// Length of the short event id prefix carried on the wire.
pub const SHORT_EVENT_ID_LEN: usize = 8;
/// Compact marker memo prefix.
pub const CERT_MEMO_PREFIX: &str = "CERT:";
/// Legacy marker signature found in older JSON memos.
pub const CERT_SIGNATURE: &str = "CERTIFICATE";

/// One ledger data entry carrying a slice of encoded metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoChunk {
    pub key: ChunkKey,
    /// Base64 of the raw payload slice, as stored on the ledger.
    pub value_b64: String,
}

/// Identifying signal recovered from a transaction memo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerMemo {
    pub event_id: Option<String>,
    pub event_name: Option<String>,
}

static IMAGE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""imageUrl"\s*:\s*"([^"]*(?:\\.[^"]*)*)"?"#).expect("valid regex"));
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""title"\s*:\s*"([^"]*)""#).expect("valid regex"));
static DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""description"\s*:\s*"([^"]*)""#).expect("valid regex"));
static EVENT_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(?:eventName|event_name)"\s*:\s*"([^"]*)""#).expect("valid regex")
});
static EVENT_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(?:eventId|event_id|event)"\s*:\s*"([^"]+)""#).expect("valid regex")
});

/// Loosely-typed view of decoded metadata JSON. Accepts both the
/// current camelCase keys and the legacy snake_case memo fields.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawMetadata {
    #[serde(alias = "event_id", alias = "event")]
    event_id: Option<String>,
    #[serde(alias = "event_name")]
    event_name: Option<String>,
    title: Option<String>,
    description: Option<String>,
    #[serde(alias = "image_url")]
    image_url: Option<String>,
}

/// Fixed-length prefix of an event id, the lossy compression that makes
/// identifiers fit the wire. Full ids are recovered later against the
/// event catalog.
pub fn short_event_id(event_id: &str) -> &str {
    match event_id.char_indices().nth(SHORT_EVENT_ID_LEN) {
        Some((idx, _)) => &event_id[..idx],
        None => event_id,
    }
}

/// Build the compact marker memo for an event, clipped to the memo
/// byte budget.
pub fn marker_memo(event_id: &str) -> String {
    let memo = format!("{}{}", CERT_MEMO_PREFIX, short_event_id(event_id));
    if memo.len() <= MEMO_TEXT_LIMIT {
        memo
    } else {
        split_utf8(&memo, MEMO_TEXT_LIMIT)[0].to_owned()
    }
}

/// Whether a memo carries a recognized certificate signature.
pub fn is_certificate_memo(memo: &str) -> bool {
    memo.contains(CERT_SIGNATURE) || memo.starts_with(CERT_MEMO_PREFIX)
}

/// Recover the plaintext of a ledger memo given its declared type.
pub fn memo_plaintext(memo: &str, memo_type: &str) -> Option<String> {
    match memo_type {
        "text" => Some(memo.to_owned()),
        "hash" | "return" => base64::decode(memo)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok()),
        _ => None,
    }
}

/// Encode metadata into data-entry chunks.
///
/// A payload within `max_chunk_bytes` becomes one `cert_meta_<shortId>`
/// entry; anything larger is split into ordered
/// `cert_meta_<shortId>_<index>` slices, index starting at 0.
pub fn encode_metadata(
    metadata: &CertificateMetadata,
    max_chunk_bytes: usize,
) -> Result<Vec<MemoChunk>, MemoError> {
    if max_chunk_bytes == 0 {
        return Err(MemoError::InvalidChunkSize);
    }
    let json = serde_json::to_string(metadata)?;
    let short_id = short_event_id(&metadata.event_id);
    if json.len() <= max_chunk_bytes {
        return Ok(vec![MemoChunk {
            key: ChunkKey::single(short_id),
            value_b64: base64::encode(&json),
        }]);
    }
    Ok(split_utf8(&json, max_chunk_bytes)
        .into_iter()
        .enumerate()
        .map(|(index, slice)| MemoChunk {
            key: ChunkKey::indexed(short_id, index as u32),
            value_b64: base64::encode(slice),
        })
        .collect())
}

/// Decode metadata from whatever chunks came back from the ledger.
///
/// Never fails: a strict JSON parse is attempted first, then a repair
/// pass that closes unbalanced braces, then independent per-field regex
/// extraction. The event id always survives because the chunk key
/// carries the short id. Returns `None` only when no chunk is usable.
pub fn decode_chunks(chunks: &[MemoChunk]) -> Option<CertificateMetadata> {
    // A readable single-chunk entry wins over any indexed leftovers;
    // an unreadable one falls through to them.
    let single = chunks
        .iter()
        .find(|chunk| chunk.key.index.is_none())
        .and_then(|chunk| {
            decode_value(chunk).map(|(_, text)| (chunk.key.short_event_id.clone(), text))
        });
    let text = single.or_else(|| {
        let mut indexed: Vec<(u32, String, String)> = chunks
            .iter()
            .filter_map(|chunk| {
                let index = chunk.key.index?;
                let (_, text) = decode_value(chunk)?;
                Some((index, chunk.key.short_event_id.clone(), text))
            })
            .collect();
        indexed.sort_by_key(|(index, _, _)| *index);
        indexed.first().map(|(_, short_id, _)| {
            let joined: String = indexed.iter().map(|(_, _, text)| text.as_str()).collect();
            (short_id.clone(), joined)
        })
    });
    let (short_id, text) = text?;
    Some(parse_metadata_text(&text, &short_id))
}

/// Recover the identifying signal from a transaction memo, handling the
/// compact `CERT:` form, well-formed legacy JSON and truncated legacy
/// JSON.
pub fn decode_marker_memo(memo: &str) -> MarkerMemo {
    if let Some(rest) = memo.strip_prefix(CERT_MEMO_PREFIX) {
        let id = rest.trim();
        return MarkerMemo {
            event_id: (!id.is_empty()).then(|| id.to_owned()),
            event_name: None,
        };
    }
    if memo.contains('{') {
        if let Ok(raw) = serde_json::from_str::<RawMetadata>(memo.trim()) {
            return MarkerMemo {
                event_id: raw.event_id,
                event_name: raw.event_name,
            };
        }
        // Truncated before completion, pull what survived.
        return MarkerMemo {
            event_id: capture(&EVENT_ID_RE, memo),
            event_name: capture(&EVENT_NAME_RE, memo).filter(|name| !name.is_empty()),
        };
    }
    MarkerMemo::default()
}

fn decode_value(chunk: &MemoChunk) -> Option<(ChunkKey, String)> {
    match base64::decode(&chunk.value_b64) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Some((chunk.key.clone(), text)),
            Err(_) => {
                log::debug!("chunk {} is not valid utf8, skipping", chunk.key);
                None
            }
        },
        Err(_) => {
            log::debug!("chunk {} is not valid base64, skipping", chunk.key);
            None
        }
    }
}

fn parse_metadata_text(text: &str, fallback_short_id: &str) -> CertificateMetadata {
    if let Ok(raw) = serde_json::from_str::<RawMetadata>(text) {
        return finish(raw, fallback_short_id);
    }
    if let Some(repaired) = repair_truncated_json(text) {
        if let Ok(raw) = serde_json::from_str::<RawMetadata>(&repaired) {
            log::debug!("recovered truncated metadata for {}", fallback_short_id);
            return finish(raw, fallback_short_id);
        }
    }
    // Field-level extraction: each field recovered or lost on its own.
    let raw = RawMetadata {
        event_id: capture(&EVENT_ID_RE, text),
        event_name: capture(&EVENT_NAME_RE, text).filter(|name| !name.is_empty()),
        title: capture(&TITLE_RE, text),
        description: capture(&DESCRIPTION_RE, text),
        image_url: capture(&IMAGE_URL_RE, text).filter(|url| !url.is_empty()),
    };
    finish(raw, fallback_short_id)
}

fn finish(raw: RawMetadata, fallback_short_id: &str) -> CertificateMetadata {
    CertificateMetadata {
        event_id: raw
            .event_id
            .unwrap_or_else(|| fallback_short_id.to_owned()),
        event_name: raw.event_name,
        title: raw.title,
        description: raw.description,
        image_url: raw.image_url,
    }
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}

/// Append the minimal closing characters to a JSON prefix cut off
/// mid-object. Returns `None` when the braces already balance.
fn repair_truncated_json(text: &str) -> Option<String> {
    let mut fixed = text.trim().to_owned();
    let open = fixed.matches('{').count();
    let close = fixed.matches('}').count();
    if open <= close {
        return None;
    }
    if !fixed.ends_with('"') && !fixed.ends_with('}') {
        fixed.push('"');
    }
    fixed.push_str(&"}".repeat(open - close));
    Some(fixed)
}

/// Split on char boundaries into slices of at most `max_bytes` bytes.
fn split_utf8(s: &str, max_bytes: usize) -> Vec<&str> {
    let mut slices = Vec::new();
    let mut start = 0;
    while start < s.len() {
        let mut end = (start + max_bytes).min(s.len());
        while end > start && !s.is_char_boundary(end) {
            end -= 1;
        }
        if end == start {
            // max_bytes smaller than one char; take the whole char.
            end = s[start..]
                .char_indices()
                .nth(1)
                .map(|(idx, _)| start + idx)
                .unwrap_or(s.len());
        }
        slices.push(&s[start..end]);
        start = end;
    }
    slices
}
