//! JSON file output handler
//!
//! Records are written to `<base>/<hash(netloc)>/<hash(url)>.json`, so a
//! repeated crawl of the same URL overwrites the same file.

use crate::output::traits::{OutputError, OutputResult, RecordSink};
use crate::output::PageRecord;
use crate::url::NetworkLocation;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of every record file
const RECORD_EXTENSION: &str = "json";

/// Hex-encoded 128-bit content hash of a string
///
/// The first 16 bytes of the SHA-256 digest, giving 32 lowercase hex characters.
///
/// # Examples
///
/// ```
/// use sumi_harvest::output::content_hash;
///
/// let hash = content_hash("https://example.com/");
/// assert_eq!(hash.len(), 32);
/// assert_eq!(hash, content_hash("https://example.com/"));
/// ```
pub fn content_hash(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(&digest[..16])
}

/// Writes page records as indented JSON files in a per-domain directory
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    directory: PathBuf,
}

impl JsonFileSink {
    /// Creates the domain directory under `base` and returns a sink writing into it
    ///
    /// # Arguments
    ///
    /// * `base` - Base output directory (created if missing)
    /// * `origin` - Network location of the crawl's seed
    pub fn create(base: &Path, origin: &NetworkLocation) -> OutputResult<Self> {
        let directory = base.join(content_hash(&origin.to_string()));
        fs::create_dir_all(&directory).map_err(|source| OutputError::Write {
            path: directory.clone(),
            source,
        })?;
        Ok(Self { directory })
    }

    /// Directory the records are written to
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File path the record for `url` is written to
    pub fn record_path(&self, url: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}", content_hash(url), RECORD_EXTENSION))
    }
}

impl RecordSink for JsonFileSink {
    fn save(&mut self, record: &PageRecord) -> OutputResult<PathBuf> {
        let body = to_indented_json(record).map_err(|source| OutputError::Serialization {
            url: record.metadata.url.clone(),
            source,
        })?;

        let path = self.record_path(&record.metadata.url);
        write_replacing(&path, &body)?;

        tracing::debug!("Saved {} to {}", record.metadata.url, path.display());
        Ok(path)
    }
}

/// Serializes with four-space indentation
fn to_indented_json(record: &PageRecord) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    record.serialize(&mut serializer)?;
    Ok(buf)
}

/// Writes to a temporary sibling and renames it over the target
///
/// The target is either the previous complete record or the new one, never a
/// partial write.
fn write_replacing(path: &Path, body: &[u8]) -> OutputResult<()> {
    let tmp = path.with_extension(format!("{}.tmp", RECORD_EXTENSION));

    if let Err(source) = fs::write(&tmp, body) {
        let _ = fs::remove_file(&tmp);
        return Err(OutputError::Write { path: tmp, source });
    }

    if let Err(source) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(OutputError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}
