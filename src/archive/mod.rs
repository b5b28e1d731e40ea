//! # Peak Archives
//!
//! Stages hand their results to each other through small key-to-array
//! archives, so any stage can be re-run without repeating the ones before it.
//! An archive is a ZIP container:
//!
//! ```text
//! pdf_dwell_peaks.pdfz
//! ├── mimetype          # "application/vnd.pdfpeak.archive" (uncompressed, first)
//! ├── manifest.json     # format version, creation time, ordered entries
//! └── arrays/
//!     ├── 30.json       # [164, 237, 362, ...]
//!     └── 100.json
//! ```
//!
//! Entry order is preserved: it is the order curves were measured in, and the
//! tracker and integral stages rely on it.

mod error;


pub use error::ArchiveError;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// MIME type stored in the `mimetype` entry.
pub const ARCHIVE_MIMETYPE: &str = "application/vnd.pdfpeak.archive";

/// Current archive layout version.
pub const ARCHIVE_FORMAT_VERSION: &str = "1.0";

const MANIFEST_ENTRY: &str = "manifest.json";

/// Kind of data held under a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayKind {
    /// Integer sample indices (peak positions).
    Indices,
    /// Floating-point values (integrals, differences).
    Values,
}

impl fmt::Display for ArrayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKind::Indices => f.pad("indices"),
            ArrayKind::Values => f.pad("values"),
        }
    }
}

/// One stored array.
#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveArray {
    /// Peak positions.
    Indices(Vec<usize>),
    /// Integrals or integral differences.
    Values(Vec<f64>),
}

impl ArchiveArray {
    /// Kind of this array.
    pub fn kind(&self) -> ArrayKind {
        match self {
            ArchiveArray::Indices(_) => ArrayKind::Indices,
            ArchiveArray::Values(_) => ArrayKind::Values,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            ArchiveArray::Indices(v) => v.len(),
            ArchiveArray::Values(v) => v.len(),
        }
    }

    /// True when the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ManifestEntry {
    key: String,
    kind: ArrayKind,
    len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Manifest {
    format_version: String,
    created: DateTime<Utc>,
    entries: Vec<ManifestEntry>,
}

/// Ordered mapping from string keys to arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayArchive {
    entries: Vec<(String, ArchiveArray)>,
    created: Option<DateTime<Utc>>,
}

impl ArrayArchive {
    /// Empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `array` under `key`.
    ///
    /// Replacing an existing key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, array: ArchiveArray) -> Result<(), ArchiveError> {
        let key = key.into();
        validate_key(&key)?;
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = array,
            None => self.entries.push((key, array)),
        }
        Ok(())
    }

    /// Array stored under `key`.
    pub fn get(&self, key: &str) -> Option<&ArchiveArray> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, a)| a)
    }

    /// Peak positions stored under `key`.
    pub fn indices(&self, key: &str) -> Result<&[usize], ArchiveError> {
        match self.get(key) {
            Some(ArchiveArray::Indices(v)) => Ok(v),
            Some(other) => Err(ArchiveError::KindMismatch {
                key: key.to_string(),
                expected: ArrayKind::Indices,
                found: other.kind(),
            }),
            None => Err(ArchiveError::MissingKey(key.to_string())),
        }
    }

    /// Values stored under `key`.
    pub fn values(&self, key: &str) -> Result<&[f64], ArchiveError> {
        match self.get(key) {
            Some(ArchiveArray::Values(v)) => Ok(v),
            Some(other) => Err(ArchiveError::KindMismatch {
                key: key.to_string(),
                expected: ArrayKind::Values,
                found: other.kind(),
            }),
            None => Err(ArchiveError::MissingKey(key.to_string())),
        }
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `(key, array)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArchiveArray)> {
        self.entries.iter().map(|(k, a)| (k.as_str(), a))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the archive holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Creation time recorded in the manifest, for loaded archives.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    /// Write the archive to `path`, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ArchiveError> {
        let path = path.as_ref();
        let bytes = self.to_zip_bytes()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&bytes)?;
        temp.flush()?;
        temp.persist(path).map_err(|e| ArchiveError::IoError(e.error))?;

        debug!("Wrote archive {} ({} keys)", path.display(), self.len());
        Ok(())
    }

    fn to_zip_bytes(&self) -> Result<Vec<u8>, ArchiveError> {
        let mut zip_writer = ZipWriter::new(Cursor::new(Vec::new()));

        // mimetype must be the first entry and uncompressed
        let stored = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(0o644);
        zip_writer.start_file("mimetype", stored)?;
        zip_writer.write_all(ARCHIVE_MIMETYPE.as_bytes())?;

        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        let manifest = Manifest {
            format_version: ARCHIVE_FORMAT_VERSION.to_string(),
            created: Utc::now(),
            entries: self
                .entries
                .iter()
                .map(|(key, array)| ManifestEntry {
                    key: key.clone(),
                    kind: array.kind(),
                    len: array.len(),
                })
                .collect(),
        };
        zip_writer.start_file(MANIFEST_ENTRY, deflated)?;
        zip_writer.write_all(serde_json::to_string_pretty(&manifest)?.as_bytes())?;

        for (key, array) in &self.entries {
            let json = match array {
                ArchiveArray::Indices(v) => serde_json::to_string(v)?,
                ArchiveArray::Values(v) => {
                    if let Some(bad) = v.iter().find(|x| !x.is_finite()) {
                        return Err(ArchiveError::InvalidFormat(format!(
                            "array '{key}' contains non-finite value {bad}"
                        )));
                    }
                    serde_json::to_string(v)?
                }
            };
            zip_writer.start_file(array_entry(key), deflated)?;
            zip_writer.write_all(json.as_bytes())?;
        }

        Ok(zip_writer.finish()?.into_inner())
    }

    /// Read an archive written by [`ArrayArchive::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;

        {
            let mut first = archive.by_index(0).map_err(|_| {
                ArchiveError::InvalidFormat("archive has no entries".to_string())
            })?;
            if first.name() != "mimetype" {
                return Err(ArchiveError::InvalidFormat(format!(
                    "first entry is '{}', expected 'mimetype'",
                    first.name()
                )));
            }
            let mut mimetype = String::new();
            first.read_to_string(&mut mimetype)?;
            if mimetype != ARCHIVE_MIMETYPE {
                return Err(ArchiveError::InvalidFormat(format!(
                    "unexpected mimetype '{mimetype}'"
                )));
            }
        }

        let manifest: Manifest = serde_json::from_str(&read_entry(&mut archive, MANIFEST_ENTRY)?)?;
        if manifest.format_version != ARCHIVE_FORMAT_VERSION {
            return Err(ArchiveError::InvalidFormat(format!(
                "unsupported format version {}",
                manifest.format_version
            )));
        }

        let mut loaded = ArrayArchive {
            entries: Vec::with_capacity(manifest.entries.len()),
            created: Some(manifest.created),
        };
        for entry in &manifest.entries {
            let json = read_entry(&mut archive, &array_entry(&entry.key))?;
            let array = match entry.kind {
                ArrayKind::Indices => ArchiveArray::Indices(serde_json::from_str(&json)?),
                ArrayKind::Values => ArchiveArray::Values(serde_json::from_str(&json)?),
            };
            if array.len() != entry.len {
                return Err(ArchiveError::InvalidFormat(format!(
                    "array '{}' has {} elements, manifest says {}",
                    entry.key,
                    array.len(),
                    entry.len
                )));
            }
            loaded.insert(entry.key.clone(), array)?;
        }

        debug!("Loaded archive {} ({} keys)", path.display(), loaded.len());
        Ok(loaded)
    }
}

fn array_entry(key: &str) -> String {
    format!("arrays/{key}.json")
}

fn validate_key(key: &str) -> Result<(), ArchiveError> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if ok {
        Ok(())
    } else {
        Err(ArchiveError::InvalidKey(key.to_string()))
    }
}

fn read_entry<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, ArchiveError> {
    let mut file = archive
        .by_name(name)
        .map_err(|_| ArchiveError::InvalidFormat(format!("archive missing {name}")))?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}
