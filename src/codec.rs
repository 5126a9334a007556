//! Content Codec
//!
//! Deterministic, seeded transform from file content to the simulated storage
//! format kept in `encoded_content`. The encoded form is an envelope carrying a
//! seed fingerprint, the content length, a keyed BLAKE3 digest and a short
//! hex-encoded preview of the content. It is lossy: [`ContentCodec::decode`]
//! recovers the preview and digest for display, never the original bytes.
//!
//! Envelope layout: `PEPX1:<seed fingerprint>:<byte length>:<digest>:<preview hex>`

use crate::error::CodecError;
use serde::{Deserialize, Serialize};

/// Envelope tag and format version
pub const ENVELOPE_TAG: &str = "PEPX1";

/// Default number of leading characters embedded in the preview
pub const DEFAULT_PREVIEW_CHARS: usize = 48;

const DIGEST_BYTES: usize = 16;
const FINGERPRINT_BYTES: usize = 4;

/// Generate a fresh random seed.
pub fn generate_seed() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Short, stable identifier of a seed that is safe to embed in encoded output
pub fn seed_fingerprint(seed: &str) -> String {
    let hash = blake3::hash(seed.as_bytes());
    hex::encode(&hash.as_bytes()[..FINGERPRINT_BYTES])
}

/// Seeded content encoder.
///
/// One codec (one seed) is shared by every encode call for the lifetime of a
/// [`crate::service::VfsService`].
#[derive(Debug, Clone)]
pub struct ContentCodec {
    seed: String,
    key: [u8; 32],
    fingerprint: String,
    preview_chars: usize,
}

/// Display summary recovered from an encoded string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedContent {
    pub seed_fingerprint: String,
    pub original_len: usize,
    pub digest: String,
    pub preview: String,
    /// True when the preview is shorter than the original content
    pub truncated: bool,
}

impl ContentCodec {
    pub fn new(seed: impl Into<String>) -> Self {
        let seed = seed.into();
        let key = *blake3::hash(seed.as_bytes()).as_bytes();
        let fingerprint = seed_fingerprint(&seed);
        Self {
            seed,
            key,
            fingerprint,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Encode content. Pure function of `(seed, preview_chars, content)`.
    pub fn encode(&self, content: &str) -> String {
        let digest = blake3::keyed_hash(&self.key, content.as_bytes());
        let preview_end = content
            .char_indices()
            .nth(self.preview_chars)
            .map(|(idx, _)| idx)
            .unwrap_or(content.len());
        format!(
            "{}:{}:{}:{}:{}",
            ENVELOPE_TAG,
            self.fingerprint,
            content.len(),
            hex::encode(&digest.as_bytes()[..DIGEST_BYTES]),
            hex::encode(&content.as_bytes()[..preview_end])
        )
    }

    /// Recover the display summary embedded in an encoded string.
    ///
    /// Needs no seed; the original content cannot be reconstructed from the
    /// result unless `truncated` is false.
    pub fn decode(encoded: &str) -> Result<DecodedContent, CodecError> {
        let mut parts = encoded.splitn(5, ':');
        let tag = parts.next().unwrap_or_default();
        if tag != ENVELOPE_TAG {
            return Err(CodecError::Malformed(format!(
                "unknown envelope tag {:?}",
                tag
            )));
        }

        let (fingerprint, len, digest, preview_hex) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(f), Some(l), Some(d), Some(p)) => (f, l, d, p),
                _ => {
                    return Err(CodecError::Malformed(
                        "envelope is missing fields".to_string(),
                    ))
                }
            };

        if fingerprint.len() != FINGERPRINT_BYTES * 2 || hex::decode(fingerprint).is_err() {
            return Err(CodecError::Malformed(format!(
                "bad seed fingerprint {:?}",
                fingerprint
            )));
        }
        if digest.len() != DIGEST_BYTES * 2 || hex::decode(digest).is_err() {
            return Err(CodecError::Malformed(format!("bad digest {:?}", digest)));
        }
        let original_len: usize = len
            .parse()
            .map_err(|e| CodecError::Malformed(format!("bad length {:?}: {}", len, e)))?;
        let preview_bytes = hex::decode(preview_hex)
            .map_err(|e| CodecError::Malformed(format!("bad preview: {}", e)))?;
        let preview = String::from_utf8(preview_bytes)
            .map_err(|e| CodecError::Malformed(format!("preview is not UTF-8: {}", e)))?;
        if preview.len() > original_len {
            return Err(CodecError::Malformed(
                "preview is longer than the recorded length".to_string(),
            ));
        }

        Ok(DecodedContent {
            seed_fingerprint: fingerprint.to_string(),
            original_len,
            digest: digest.to_string(),
            truncated: preview.len() < original_len,
            preview,
        })
    }

    /// Whether `encoded` is exactly what this codec produces for `content`
    pub fn verify(&self, content: &str, encoded: &str) -> bool {
        self.encode(content) == encoded
    }
}
