//! Page resolution
//!
//! Finds the best-matching page for a command by scanning (platform,
//! language) pairs in priority order: platforms outer, languages inner.
//! A full cache pass runs before any network traffic; the network pass
//! writes every successful fetch back to the cache and falls back to stale
//! entries when the network is down. The nesting order is user-observable
//! and must not change.

use thiserror::Error;

use crate::cache::Cache;
use crate::config::Config;
use crate::fetch::{FetchError, PageSource};
use crate::language::language_list;
use crate::page::{Page, PageKey};
use crate::platform::{platform_list, Platform};

#[derive(Error, Debug)]
pub enum ResolveError {
    /// Every candidate pair was scanned and the repository confirmed the
    /// page does not exist anywhere. Carries the command so the caller can
    /// point at the upstream contribution process.
    #[error("documentation for `{command}` is not available")]
    NotFound { command: String },

    /// The network failed and no cached fallback existed.
    #[error("could not reach the page source: {0}")]
    Transport(String),
}

/// A successful lookup: the page plus where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedPage {
    pub page: Page,
    pub platform: Platform,
    pub language: String,
}

/// Outcome of one network attempt for one pair.
enum Attempt {
    Hit(Page),
    /// The repository confirmed the page does not exist for this pair.
    Miss,
    /// The network failed and no cached fallback existed for this pair.
    /// The scan may continue, but exhaustion is then a transport failure,
    /// not a confirmed miss.
    TransportMiss(String),
}

/// The resolution engine. Owns the search policy; storage and transport
/// are injected.
pub struct Resolver<S: PageSource> {
    config: Config,
    source: S,
    cache: Option<Cache>,
}

impl<S: PageSource> Resolver<S> {
    pub fn new(config: Config, source: S) -> Self {
        let cache = config
            .cache_enabled
            .then(|| Cache::new(config.cache_dir.clone()));
        Self {
            config,
            source,
            cache,
        }
    }

    fn platforms(&self) -> Vec<Platform> {
        platform_list(self.config.platform)
    }

    fn languages(&self) -> Vec<String> {
        language_list(
            self.config.language.as_deref(),
            self.config.preferred_language.as_deref(),
            self.config.session_languages.as_deref(),
            self.config.locale.as_deref(),
        )
    }

    /// Resolve one command to its best-matching page.
    ///
    /// Cache-first: the first fresh cache entry in priority order wins and
    /// the network is never touched. Otherwise each pair is fetched in the
    /// same order; 404 moves on, success is cached and returned, and a
    /// transport failure falls back to that pair's stale cache entry when
    /// one exists. With caching disabled a transport failure is fatal.
    pub fn resolve(&self, command: &str) -> Result<ResolvedPage, ResolveError> {
        let platforms = self.platforms();
        let languages = self.languages();

        if let Some(cache) = &self.cache {
            for &platform in &platforms {
                for language in &languages {
                    let key = PageKey::new(command, platform, language);
                    if cache.is_fresh(&key, self.config.cache_max_age) {
                        if let Some(page) = cache.load(&key) {
                            return Ok(ResolvedPage {
                                page,
                                platform,
                                language: language.clone(),
                            });
                        }
                    }
                }
            }
        }

        let mut transport_failure: Option<String> = None;

        for &platform in &platforms {
            for language in &languages {
                let key = PageKey::new(command, platform, language);
                match self.fetch_with_fallback(&key)? {
                    Attempt::Hit(page) => {
                        return Ok(ResolvedPage {
                            page,
                            platform,
                            language: language.clone(),
                        });
                    }
                    Attempt::Miss => continue,
                    Attempt::TransportMiss(message) => {
                        transport_failure.get_or_insert(message);
                    }
                }
            }
        }

        // A pair the repository never answered for is not a confirmed
        // miss; surface the network failure instead.
        if let Some(message) = transport_failure {
            return Err(ResolveError::Transport(message));
        }
        Err(ResolveError::NotFound {
            command: command.to_string(),
        })
    }

    /// Resolve every matching platform instead of stopping at the first:
    /// for each platform in priority order, the first language that yields
    /// a page contributes one entry. Used to report that other platforms
    /// also document a command.
    pub fn resolve_all(&self, command: &str) -> Result<Vec<ResolvedPage>, ResolveError> {
        let platforms = self.platforms();
        let languages = self.languages();
        let mut matches = Vec::new();
        let mut transport_failure: Option<String> = None;

        for &platform in &platforms {
            'languages: for language in &languages {
                let key = PageKey::new(command, platform, language);

                if let Some(cache) = &self.cache {
                    if cache.is_fresh(&key, self.config.cache_max_age) {
                        if let Some(page) = cache.load(&key) {
                            matches.push(ResolvedPage {
                                page,
                                platform,
                                language: language.clone(),
                            });
                            break 'languages;
                        }
                    }
                }

                match self.fetch_with_fallback(&key)? {
                    Attempt::Hit(page) => {
                        matches.push(ResolvedPage {
                            page,
                            platform,
                            language: language.clone(),
                        });
                        break 'languages;
                    }
                    Attempt::Miss => continue,
                    Attempt::TransportMiss(message) => {
                        transport_failure.get_or_insert(message);
                    }
                }
            }
        }

        if matches.is_empty() {
            if let Some(message) = transport_failure {
                return Err(ResolveError::Transport(message));
            }
            return Err(ResolveError::NotFound {
                command: command.to_string(),
            });
        }
        Ok(matches)
    }

    /// One network attempt for one pair. A successful fetch is persisted;
    /// cache write failures are swallowed because the cache is an
    /// accelerator, not a dependency. A transport failure falls back to
    /// this pair's stale cache entry; without one the scan continues, but
    /// the failure is reported so exhaustion stays distinguishable from a
    /// confirmed miss. With caching disabled it is immediately fatal.
    fn fetch_with_fallback(&self, key: &PageKey) -> Result<Attempt, ResolveError> {
        match self.source.fetch(key) {
            Ok(page) => {
                if page.is_empty() {
                    // An empty body is no page; never cache it.
                    return Ok(Attempt::Miss);
                }
                if let Some(cache) = &self.cache {
                    let _ = cache.store(key, &page);
                }
                Ok(Attempt::Hit(page))
            }
            Err(FetchError::NotFound) => Ok(Attempt::Miss),
            Err(FetchError::Transport(message)) => {
                if let Some(cache) = &self.cache {
                    if let Some(page) = cache.load(key) {
                        return Ok(Attempt::Hit(page));
                    }
                    return Ok(Attempt::TransportMiss(message));
                }
                Err(ResolveError::Transport(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Canned page source: known pages return 200, everything else 404,
    /// and every call is counted.
    struct MockSource {
        pages: HashMap<PageKey, String>,
        calls: RefCell<usize>,
        /// When set, every fetch fails with a transport error.
        network_down: bool,
    }

    impl MockSource {
        fn new() -> Self {
            Self {
                pages: HashMap::new(),
                calls: RefCell::new(0),
                network_down: false,
            }
        }

        fn with_page(mut self, key: PageKey, body: &str) -> Self {
            self.pages.insert(key, body.to_string());
            self
        }

        fn down(mut self) -> Self {
            self.network_down = true;
            self
        }

        fn call_count(&self) -> usize {
            *self.calls.borrow()
        }
    }

    impl PageSource for MockSource {
        fn fetch(&self, key: &PageKey) -> Result<Page, FetchError> {
            *self.calls.borrow_mut() += 1;
            if self.network_down {
                return Err(FetchError::Transport("connection refused".to_string()));
            }
            match self.pages.get(key) {
                Some(body) => Ok(Page::new(body.clone())),
                None => Err(FetchError::NotFound),
            }
        }
    }

    // Defaults with an isolated cache root; no env leaks into the language
    // list because the core never reads the environment.
    fn test_config(cache_root: &TempDir) -> Config {
        Config {
            cache_dir: cache_root.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_fresh_cache_hit_skips_network() {
        // Scenario A: fresh entry for (gem, common, en) -> returned without
        // a single fetcher call.
        let tmp = TempDir::new().unwrap();
        let cache = Cache::new(tmp.path());
        let key = PageKey::new("gem", Platform::Common, "en");
        cache.store(&key, &Page::new("# gem\n")).unwrap();

        let resolver = Resolver::new(test_config(&tmp), MockSource::new());
        let resolved = resolver.resolve("gem").unwrap();

        assert_eq!(resolved.page.raw(), "# gem\n");
        assert_eq!(resolved.platform, Platform::Common);
        assert_eq!(resolver.source.call_count(), 0);
    }

    #[test]
    fn test_network_hit_is_returned_and_cached() {
        // Scenario B: 404 everywhere except (jq, common, en).
        let tmp = TempDir::new().unwrap();
        let key = PageKey::new("jq", Platform::Common, "en");
        let source = MockSource::new().with_page(key.clone(), "# jq\n");

        let resolver = Resolver::new(test_config(&tmp), source);
        let resolved = resolver.resolve("jq").unwrap();

        assert_eq!(resolved.page.raw(), "# jq\n");
        assert_eq!(resolved.platform, Platform::Common);
        assert_eq!(
            Cache::new(tmp.path()).load(&key).unwrap().raw(),
            "# jq\n"
        );
    }

    #[test]
    fn test_transport_error_falls_back_to_stale_cache() {
        // Scenario C: network down everywhere, stale (cmd, linux, en)
        // entry present.
        let tmp = TempDir::new().unwrap();
        let cache = Cache::new(tmp.path());
        let key = PageKey::new("cmd", Platform::Linux, "en");
        cache.store(&key, &Page::new("# cmd\n")).unwrap();

        let mut config = test_config(&tmp);
        // Stale: anything older than zero seconds.
        config.cache_max_age = Duration::ZERO;
        std::thread::sleep(Duration::from_millis(20));

        let resolver = Resolver::new(config, MockSource::new().down());
        let resolved = resolver.resolve("cmd").unwrap();
        assert_eq!(resolved.page.raw(), "# cmd\n");
        assert_eq!(resolved.platform, Platform::Linux);
    }

    #[test]
    fn test_transport_exhaustion_with_empty_cache_is_fatal() {
        // Network down everywhere and nothing cached: the repository never
        // confirmed absence, so this must surface as a transport failure,
        // not as "page does not exist".
        let tmp = TempDir::new().unwrap();
        let resolver = Resolver::new(test_config(&tmp), MockSource::new().down());
        match resolver.resolve("cmd") {
            Err(ResolveError::Transport(_)) => {}
            other => panic!("expected transport error, got {:?}", other.map(|r| r.page)),
        }
    }

    #[test]
    fn test_resolve_all_transport_exhaustion_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let resolver = Resolver::new(test_config(&tmp), MockSource::new().down());
        assert!(matches!(
            resolver.resolve_all("cmd"),
            Err(ResolveError::Transport(_))
        ));
    }

    #[test]
    fn test_transport_error_without_cache_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let mut config = test_config(&tmp);
        config.cache_enabled = false;

        let resolver = Resolver::new(config, MockSource::new().down());
        match resolver.resolve("cmd") {
            Err(ResolveError::Transport(_)) => {}
            other => panic!("expected transport error, got {:?}", other.map(|r| r.page)),
        }
    }

    #[test]
    fn test_exhausted_search_is_definitive_not_found() {
        let tmp = TempDir::new().unwrap();
        let resolver = Resolver::new(test_config(&tmp), MockSource::new());
        match resolver.resolve("no-such-command") {
            Err(ResolveError::NotFound { command }) => {
                assert_eq!(command, "no-such-command");
            }
            other => panic!("expected not found, got {:?}", other.map(|r| r.platform)),
        }
    }

    #[test]
    fn test_platform_override_narrows_search() {
        let tmp = TempDir::new().unwrap();
        let key = PageKey::new("dtrace", Platform::SunOs, "en");
        let source = MockSource::new().with_page(key, "# dtrace\n");

        let mut config = test_config(&tmp);
        config.platform = Some(Platform::SunOs);

        let resolver = Resolver::new(config, source);
        let resolved = resolver.resolve("dtrace").unwrap();
        assert_eq!(resolved.platform, Platform::SunOs);
        // Singleton platform list, one language: exactly one fetch.
        assert_eq!(resolver.source.call_count(), 1);
    }

    #[test]
    fn test_language_priority_is_inner_loop() {
        // A less-preferred language on the first-ranked platform wins over
        // a preferred language on a later platform.
        let tmp = TempDir::new().unwrap();
        let first_platform = platform_list(None)[0];
        let source = MockSource::new()
            .with_page(PageKey::new("cmd", first_platform, "en"), "first platform\n")
            .with_page(
                PageKey::new("cmd", Platform::Android, "de"),
                "later platform\n",
            );

        let mut config = test_config(&tmp);
        config.session_languages = Some("de".to_string());

        let resolver = Resolver::new(config, source);
        let resolved = resolver.resolve("cmd").unwrap();
        assert_eq!(resolved.page.raw(), "first platform\n");
        assert_eq!(resolved.language, "en");
    }

    #[test]
    fn test_resolve_all_collects_every_platform() {
        let tmp = TempDir::new().unwrap();
        let source = MockSource::new()
            .with_page(PageKey::new("cmd", Platform::Common, "en"), "common\n")
            .with_page(PageKey::new("cmd", Platform::Windows, "en"), "windows\n");

        let resolver = Resolver::new(test_config(&tmp), source);
        let matches = resolver.resolve_all("cmd").unwrap();

        let platforms: Vec<Platform> = matches.iter().map(|m| m.platform).collect();
        assert!(platforms.contains(&Platform::Common));
        assert!(platforms.contains(&Platform::Windows));
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_empty_fetched_page_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let source =
            MockSource::new().with_page(PageKey::new("cmd", Platform::Common, "en"), "");

        let resolver = Resolver::new(test_config(&tmp), source);
        assert!(matches!(
            resolver.resolve("cmd"),
            Err(ResolveError::NotFound { .. })
        ));
    }
}
