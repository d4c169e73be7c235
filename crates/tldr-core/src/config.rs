//! Client configuration
//!
//! The resolver takes one immutable [`Config`] record built by the CLI
//! layer; nothing in the core reads the environment or parses flags itself.
//! [`FileConfig`] is the optional TOML config file the CLI merges in.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::platform::Platform;
use crate::render::OptionStyle;

/// Default page source: the upstream tldr-pages raw file tree.
pub const DEFAULT_SOURCE: &str = "https://raw.githubusercontent.com/tldr-pages/tldr/main/pages";

/// Default cache entry lifetime before a network refresh is attempted.
pub const DEFAULT_CACHE_MAX_AGE_HOURS: u64 = 24;

/// Resolved, immutable settings for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Page source base URL, without a trailing slash.
    pub source: String,
    /// Cache root directory.
    pub cache_dir: PathBuf,
    /// Whether the cache participates at all. When off, transport errors
    /// are fatal (there is nothing to fall back to).
    pub cache_enabled: bool,
    /// Freshness window for cached entries.
    pub cache_max_age: Duration,
    /// Explicit platform override (singleton search list).
    pub platform: Option<Platform>,
    /// Explicit language override.
    pub language: Option<String>,
    /// Preferred language, in `TLDR_LANGUAGE` shape; ranks above the
    /// session list without suppressing it.
    pub preferred_language: Option<String>,
    /// Session language list, in `LANGUAGE` shape (colon-separated).
    pub session_languages: Option<String>,
    /// OS locale, in `LANG` shape.
    pub locale: Option<String>,
    /// Display mode for `{{[short|long]}}` option placeholders.
    pub option_style: OptionStyle,
}

impl Config {
    /// The default cache root: `<user cache dir>/tldr`.
    pub fn default_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("tldr")
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: DEFAULT_SOURCE.to_string(),
            cache_dir: Self::default_cache_dir(),
            cache_enabled: true,
            cache_max_age: Duration::from_secs(DEFAULT_CACHE_MAX_AGE_HOURS * 3600),
            platform: None,
            language: None,
            preferred_language: None,
            session_languages: None,
            locale: None,
            option_style: OptionStyle::default(),
        }
    }
}

/// Optional on-disk configuration (`~/.config/tldr/config.toml`). Every
/// field is optional; absent fields keep their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub source: Option<String>,
    pub cache_dir: Option<PathBuf>,
    pub cache_max_age_hours: Option<u64>,
    pub option_style: Option<String>,
}

impl FileConfig {
    /// The conventional config file location.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("tldr")
            .join("config.toml")
    }

    /// Load the file if it exists; a missing file is an empty config, a
    /// malformed one is an error worth telling the user about.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(FileConfig::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Fold the file's settings into a config record.
    pub fn apply(self, mut config: Config) -> Config {
        if let Some(source) = self.source {
            config.source = source;
        }
        if let Some(cache_dir) = self.cache_dir {
            config.cache_dir = cache_dir;
        }
        if let Some(hours) = self.cache_max_age_hours {
            config.cache_max_age = Duration::from_secs(hours * 3600);
        }
        if let Some(style) = self.option_style {
            // Unrecognized values keep the default rather than aborting.
            if let Ok(style) = style.parse() {
                config.option_style = style;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = FileConfig::load(&tmp.path().join("config.toml")).unwrap();
        assert!(config.source.is_none());
    }

    #[test]
    fn test_load_and_apply() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            "source = \"https://mirror.example/pages\"\ncache_max_age_hours = 48\noption_style = \"both\"\n",
        )
        .unwrap();

        let config = FileConfig::load(&path).unwrap().apply(Config::default());
        assert_eq!(config.source, "https://mirror.example/pages");
        assert_eq!(config.cache_max_age, Duration::from_secs(48 * 3600));
        assert_eq!(config.option_style, OptionStyle::Both);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "source = [not toml").unwrap();
        assert!(FileConfig::load(&path).is_err());
    }
}
