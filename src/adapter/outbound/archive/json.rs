//! One pretty-printed JSON file per symbol.
//!
//! Saving over an existing record first renames it to
//! `{SYMBOL}_backup_{unix_seconds}.json`; backups are never loaded.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::io;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::{is_valid_symbol, CompanyData};
use crate::error::{Error, Result};
use crate::port::outbound::company::CompanyStore;

/// Marker in the file name of backup copies.
const BACKUP_MARKER: &str = "_backup_";

/// JSON-file [`CompanyStore`] rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonCompanyStore {
    dir: PathBuf,
}

impl JsonCompanyStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for `symbol`, which must be a bare exchange
    /// symbol so the file stays inside the data directory.
    fn record_path(&self, symbol: &str) -> Result<PathBuf> {
        if !is_valid_symbol(symbol) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid archive symbol: {symbol:?}"),
            )
            .into());
        }
        Ok(self.dir.join(format!("{symbol}.json")))
    }

    /// Current record files sorted by name, as `(symbol, path)`.
    fn record_files(&self) -> Result<Vec<(String, PathBuf)>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.contains(BACKUP_MARKER) {
                continue;
            }
            files.push((stem.to_string(), path));
        }
        files.sort();
        Ok(files)
    }
}

impl CompanyStore for JsonCompanyStore {
    fn save(&self, symbol: &str, data: &CompanyData) -> Result<PathBuf> {
        let path = self.record_path(symbol)?;
        fs::create_dir_all(&self.dir)?;

        if path.exists() {
            let backup = self.dir.join(format!(
                "{symbol}{BACKUP_MARKER}{}.json",
                Utc::now().timestamp()
            ));
            fs::rename(&path, &backup)?;
            info!(backup = %backup.display(), "Created backup");
        }

        fs::write(&path, serde_json::to_string_pretty(data)?)?;
        debug!(path = %path.display(), "Saved company record");
        Ok(path)
    }

    fn load_all(&self) -> Result<Vec<(String, CompanyData)>> {
        let mut records = Vec::new();
        for (symbol, path) in self.record_files()? {
            let parsed = fs::read_to_string(&path)
                .map_err(Error::from)
                .and_then(|text| Ok(serde_json::from_str::<CompanyData>(&text)?));
            match parsed {
                Ok(data) => records.push((symbol, data)),
                Err(err) => warn!(path = %path.display(), error = %err, "Skipping unreadable record"),
            }
        }
        Ok(records)
    }

    fn fingerprint(&self) -> Result<u64> {
        let mut hasher = DefaultHasher::new();
        for (symbol, path) in self.record_files()? {
            symbol.hash(&mut hasher);
            match fs::read(&path) {
                Ok(bytes) => bytes.hash(&mut hasher),
                Err(err) => warn!(path = %path.display(), error = %err, "Cannot read record"),
            }
        }
        Ok(hasher.finish())
    }
}
