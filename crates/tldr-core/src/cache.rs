//! On-disk page cache
//!
//! Pages are stored one file per key under
//! `<root>/pages[.<language>]/<platform>/<command>.md`, mirroring the remote
//! repository layout; the bare `pages` directory is English. The cache is a
//! best-effort accelerator: every failure here must be recoverable by the
//! resolver, never fatal to a lookup.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use thiserror::Error;

use crate::language::DEFAULT_LANGUAGE;
use crate::page::{Page, PageKey};
use crate::platform::Platform;

/// Cache read/write failure. Callers treat these as "no cache", not errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("cache IO error: {0}")]
    Io(#[from] io::Error),
}

/// File-system key/value store for pages.
#[derive(Debug, Clone)]
pub struct Cache {
    root: PathBuf,
}

impl Cache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one language's page tree.
    fn language_dir(&self, language: &str) -> PathBuf {
        if language == DEFAULT_LANGUAGE {
            self.root.join("pages")
        } else {
            self.root.join(format!("pages.{}", language))
        }
    }

    fn entry_path(&self, key: &PageKey) -> PathBuf {
        self.language_dir(&key.language)
            .join(key.platform.as_str())
            .join(format!("{}.md", key.command))
    }

    /// Read the cached page for a key. Missing, unreadable and empty
    /// entries all come back as None.
    pub fn load(&self, key: &PageKey) -> Option<Page> {
        let raw = fs::read_to_string(self.entry_path(key)).ok()?;
        if raw.trim().is_empty() {
            return None;
        }
        Some(Page::new(raw))
    }

    /// Persist a page under its key, replacing any previous entry.
    ///
    /// The write goes through a sibling temp file and a rename so a failed
    /// or interrupted store never leaves a half-written entry behind.
    pub fn store(&self, key: &PageKey, page: &Page) -> Result<(), StorageError> {
        let path = self.entry_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("md.tmp");
        fs::write(&tmp, page.raw())?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Whether a cached entry exists and was written within `max_age`.
    /// Absence is simply "no", never an error.
    pub fn is_fresh(&self, key: &PageKey, max_age: Duration) -> bool {
        let Ok(metadata) = fs::metadata(self.entry_path(key)) else {
            return false;
        };
        let Ok(modified) = metadata.modified() else {
            return false;
        };
        match SystemTime::now().duration_since(modified) {
            Ok(age) => age <= max_age,
            // Clock skew put the mtime in the future; count it as fresh.
            Err(_) => true,
        }
    }

    /// Enumerate the cached pages for the given platforms and languages,
    /// sorted by command then language. Unreadable directories contribute
    /// nothing; as everywhere in the cache, absence is not an error.
    pub fn list(&self, platforms: &[Platform], languages: &[String]) -> Vec<PageKey> {
        let mut keys = Vec::new();
        for language in languages {
            for &platform in platforms {
                let dir = self.language_dir(language).join(platform.as_str());
                let Ok(entries) = fs::read_dir(&dir) else {
                    continue;
                };
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().and_then(|e| e.to_str()) != Some("md") {
                        continue;
                    }
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        keys.push(PageKey::new(stem, platform, language));
                    }
                }
            }
        }
        keys.sort_by(|a, b| {
            a.command
                .cmp(&b.command)
                .then_with(|| a.language.cmp(&b.language))
        });
        keys
    }

    /// Remove every cached page for one language.
    pub fn clear(&self, language: &str) -> Result<(), StorageError> {
        let dir = self.language_dir(language);
        if !dir.exists() {
            return Ok(());
        }
        fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
