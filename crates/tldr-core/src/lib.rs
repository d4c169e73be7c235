//! tldr-core - Page resolution and terminal rendering for the tldr client
//!
//! The library holds everything with decision logic: the priority-ordered
//! platform/language search with its cache-first and stale-fallback policy,
//! and the line-oriented renderer for the constrained page markdown. Flag
//! parsing, environment reading and exit codes live in the `tldr` binary.

pub mod cache;
pub mod config;
pub mod fetch;
pub mod language;
pub mod page;
pub mod platform;
pub mod render;
pub mod resolve;
pub mod style;

pub use cache::Cache;
pub use config::{Config, FileConfig};
pub use fetch::{FetchError, HttpFetcher, PageSource};
pub use page::{Page, PageKey};
pub use platform::Platform;
pub use render::{OptionStyle, RenderOptions, StyledToken};
pub use resolve::{ResolveError, ResolvedPage, Resolver};
pub use style::{Style, StyleKey, StyleSheet};
