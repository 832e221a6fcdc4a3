//! Text entry extraction from Aozora ZIP archives.
//!
//! Each Aozora archive holds one plain-text work, sometimes alongside
//! illustrations. The first entry whose name ends in the configured text
//! suffix (ASCII case-insensitive) is read; directories are skipped.
//! Bytes are returned undecoded.

use std::io::{Cursor, Read};

use tracing::debug;

use crate::config::ExtractConfig;
use crate::error::{ReaderError, Result};

/// A raw entry read out of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

fn open(bytes: &[u8]) -> Result<zip::ZipArchive<Cursor<&[u8]>>> {
    zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ReaderError::InvalidArchive(e.to_string()))
}

fn has_suffix(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name.is_char_boundary(name.len() - suffix.len())
        && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Read the first text entry of a ZIP archive.
pub fn extract_text_entry(bytes: &[u8], config: &ExtractConfig) -> Result<ArchiveEntry> {
    let mut archive = open(bytes)?;
    let mut seen = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .map_err(|e| ReaderError::InvalidArchive(e.to_string()))?;
        let name = entry.name().to_string();

        if entry.is_dir() || !has_suffix(&name, &config.text_extension) {
            seen.push(name);
            continue;
        }

        let limit = config.max_entry_bytes;
        let mut out = Vec::new();
        entry
            .take(limit.saturating_add(1))
            .read_to_end(&mut out)
            .map_err(|e| ReaderError::InvalidArchive(format!("{}: {}", name, e)))?;
        if out.len() as u64 > limit {
            return Err(ReaderError::InvalidArchive(format!(
                "entry {} exceeds size limit ({} bytes)",
                name, limit
            )));
        }

        debug!(entry = %name, bytes = out.len(), "Selected text entry");
        return Ok(ArchiveEntry { name, bytes: out });
    }

    Err(ReaderError::NoTextEntryFound { entries: seen })
}

/// Names of all entries, in central-directory order.
pub fn list_entries(bytes: &[u8]) -> Result<Vec<String>> {
    let mut archive = open(bytes)?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .map_err(|e| ReaderError::InvalidArchive(e.to_string()))?;
        names.push(entry.name().to_string());
    }
    Ok(names)
}
