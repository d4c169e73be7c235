//! Page and page key types

use std::fmt;

use crate::platform::Platform;

/// Identifies one cache slot / one remote page: a command documented for one
/// platform in one language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    /// Page name, already normalized (lowercase, words joined with `-`).
    pub command: String,
    pub platform: Platform,
    /// Lowercase language code, optionally with a region subtag (`pt_BR`).
    pub language: String,
}

impl PageKey {
    pub fn new(command: &str, platform: Platform, language: &str) -> Self {
        Self {
            command: command.to_string(),
            platform,
            language: language.to_string(),
        }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.language, self.platform, self.command)
    }
}

/// One fetched page: the raw markdown text for a single (command, platform,
/// language) triple. Immutable once constructed; a cache refresh replaces
/// the whole page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    raw: String,
}

impl Page {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Build a page from raw response bytes. Invalid UTF-8 is replaced
    /// rather than rejected; the renderer must cope with anything.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            raw: String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.raw.lines()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }
}
