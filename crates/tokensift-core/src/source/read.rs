use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::{fs, io::Read, path::Path};

use crate::report::model::{SourceHash, SourceInfo};

/// Source text loaded for analysis, with its content fingerprint.
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Where the text came from (informational only).
    pub path: Option<String>,

    /// Decoded source text.
    pub text: String,

    pub size_bytes: u64,

    /// Hash algorithm used for fingerprinting.
    pub hash_alg: String,

    /// Hex-encoded hash of the source bytes.
    pub hash_hex: String,
}

impl SourceContext {
    /// Convert into report-facing metadata.
    ///
    /// The text itself is dropped; reports never carry the full source.
    pub fn into_source_info(self) -> SourceInfo {
        SourceInfo {
            path: self.path,
            size_bytes: self.size_bytes,
            hash: SourceHash {
                algorithm: self.hash_alg,
                value: self.hash_hex,
            },
        }
    }
}

/// Hex SHA-256 of the source text.
///
/// Depends only on the bytes, so it can key an external result cache.
pub fn source_fingerprint(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Read a source file and compute its fingerprint.
pub fn read_source(path: &Path) -> Result<SourceContext> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read source: {}", path.display()))?;

    from_bytes(bytes, Some(path.display().to_string()))
}

/// Read source text from any reader (e.g. stdin).
pub fn read_source_from<R: Read>(mut reader: R, label: &str) -> Result<SourceContext> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .with_context(|| format!("failed to read source: {label}"))?;

    from_bytes(bytes, Some(label.to_string()))
}

fn from_bytes(bytes: Vec<u8>, path: Option<String>) -> Result<SourceContext> {
    let size_bytes = bytes.len() as u64;
    let label = path.clone().unwrap_or_default();
    let text = String::from_utf8(bytes)
        .with_context(|| format!("source is not valid UTF-8: {label}"))?;

    Ok(SourceContext {
        path,
        size_bytes,
        hash_alg: "sha256".to_string(),
        hash_hex: source_fingerprint(&text),
        text,
    })
}
