//! tldr - Collaborative cheatsheets for console commands
//!
//! Thin CLI over `tldr-core`: parses flags, reads the environment and the
//! optional config file into one immutable `Config`, runs the resolver, and
//! prints the rendered page. Exit codes: 0 success, 1 fatal error (network
//! or otherwise), 3 page not found.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;

use tldr_core::render::{paint, render_page, render_plain, RenderOptions};
use tldr_core::{
    Cache, Config, FileConfig, HttpFetcher, Page, Platform, ResolveError, Resolver, Style,
    StyleKey, StyleSheet,
};

/// Exit code for a definitive "no such page anywhere" miss, distinct from
/// transport failures.
const EXIT_NOT_FOUND: i32 = 3;

const CONTRIBUTE_URL: &str = "https://github.com/tldr-pages/tldr";

#[derive(Parser)]
#[command(name = "tldr")]
#[command(about = "Collaborative cheatsheets for console commands")]
#[command(version)]
#[command(after_help = r#"EXAMPLES:
    # Show the page for a command
    tldr tar

    # Multi-word commands work too
    tldr git checkout

    # Pages for another platform or language
    tldr --platform osx caffeinate
    tldr --language pt_BR tar

    # Render a local page file
    tldr --render ./my-page.md

    # List commands with a locally cached page
    tldr --list

    # Drop all cached pages
    tldr --clear-cache

ENVIRONMENT:
    TLDR_SOURCE            Page source base URL
    TLDR_CACHE_DIR         Cache directory
    TLDR_CACHE_MAX_AGE     Cache freshness window in hours
    TLDR_LANGUAGE          Preferred page language, ranked above LANGUAGE
    TLDR_OPTION_STYLE      Option placeholder display: short, long, both
    TLDR_COLOR_NAME, TLDR_COLOR_DESCRIPTION, TLDR_COLOR_EXAMPLE,
    TLDR_COLOR_COMMAND, TLDR_COLOR_PARAMETER
                           Style specs like "cyan on black bold"
"#)]
struct Cli {
    /// Command to look up (multiple words are joined, e.g. `git checkout`)
    command: Vec<String>,

    /// Override the search platform
    #[arg(short, long)]
    platform: Option<Platform>,

    /// Override the page language
    #[arg(short = 'L', long)]
    language: Option<String>,

    /// Override the page source base URL
    #[arg(long)]
    source: Option<String>,

    /// Bypass the local cache entirely
    #[arg(long)]
    no_cache: bool,

    /// Render a local page file instead of looking a command up
    #[arg(short, long, value_name = "FILE")]
    render: Option<PathBuf>,

    /// Print the raw page without styling
    #[arg(long)]
    markdown: bool,

    /// List the commands with a locally cached page
    #[arg(short, long)]
    list: bool,

    /// Remove all cached pages for the configured languages
    #[arg(long)]
    clear_cache: bool,
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = build_config(&cli)?;

    if let Some(path) = &cli.render {
        return cmd_render_file(path);
    }
    if cli.clear_cache {
        return cmd_clear_cache(&config);
    }
    if cli.list {
        return cmd_list(&config);
    }
    if cli.command.is_empty() {
        bail!("no command given; try 'tldr --help'");
    }

    let command = normalize_command(&cli.command);
    cmd_lookup(&config, &command, cli.markdown)
}

/// Fold defaults, the config file, the environment and the flags into one
/// immutable record, in that order of precedence.
fn build_config(cli: &Cli) -> Result<Config> {
    let file = FileConfig::load(&FileConfig::default_path())?;
    let mut config = file.apply(Config::default());

    if let Ok(source) = env::var("TLDR_SOURCE") {
        config.source = source;
    }
    if let Ok(dir) = env::var("TLDR_CACHE_DIR") {
        config.cache_dir = PathBuf::from(dir);
    }
    if let Ok(hours) = env::var("TLDR_CACHE_MAX_AGE") {
        let hours: u64 = hours
            .parse()
            .context("TLDR_CACHE_MAX_AGE must be a number of hours")?;
        config.cache_max_age = Duration::from_secs(hours * 3600);
    }
    if let Ok(style) = env::var("TLDR_OPTION_STYLE") {
        if let Ok(style) = style.parse() {
            config.option_style = style;
        }
    }
    config.preferred_language = env::var("TLDR_LANGUAGE").ok();
    config.session_languages = env::var("LANGUAGE").ok();
    config.locale = env::var("LANG").ok();

    if let Some(source) = &cli.source {
        config.source = source.clone();
    }
    config.platform = cli.platform;
    config.language = cli.language.clone();
    if cli.no_cache {
        config.cache_enabled = false;
    }
    Ok(config)
}

/// Join command words with dashes, lowercased: `git checkout` becomes the
/// page name `git-checkout`.
fn normalize_command(words: &[String]) -> String {
    words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

fn cmd_lookup(config: &Config, command: &str, markdown: bool) -> Result<i32> {
    let fetcher =
        HttpFetcher::new(&config.source).context("Failed to set up the page fetcher")?;
    let resolver = Resolver::new(config.clone(), fetcher);

    match resolver.resolve(command) {
        Ok(resolved) => {
            print_page(&resolved.page, config, markdown);
            Ok(0)
        }
        Err(ResolveError::NotFound { command }) => {
            eprintln!("Documentation for `{}` is not available.", command);
            report_other_platforms(config, &command);
            eprintln!("Consider contributing a page: {}", CONTRIBUTE_URL);
            Ok(EXIT_NOT_FOUND)
        }
        Err(err @ ResolveError::Transport(_)) => Err(err.into()),
    }
}

/// After a miss under a platform override, scan the default platform list
/// and name the platforms that do document the command.
fn report_other_platforms(config: &Config, command: &str) {
    if config.platform.is_none() {
        return;
    }

    let mut widened = config.clone();
    widened.platform = None;
    let Ok(fetcher) = HttpFetcher::new(&widened.source) else {
        return;
    };

    let resolver = Resolver::new(widened, fetcher);
    if let Ok(matches) = resolver.resolve_all(command) {
        let platforms: Vec<String> = matches.iter().map(|m| m.platform.to_string()).collect();
        eprintln!(
            "The page exists for other platforms: {}",
            platforms.join(", ")
        );
    }
}

fn print_page(page: &Page, config: &Config, markdown: bool) {
    if markdown {
        for line in render_plain(page) {
            println!("{}", line);
        }
        return;
    }

    let options = RenderOptions {
        option_style: config.option_style,
    };
    let sheet = stylesheet_from_env();
    for line in paint(&render_page(page, &options), &sheet) {
        println!("{}", line);
    }
}

fn cmd_render_file(path: &Path) -> Result<i32> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read page from {:?}", path))?;
    for line in render_plain(&Page::new(raw)) {
        println!("{}", line);
    }
    Ok(0)
}

/// The search language list for this invocation.
fn configured_languages(config: &Config) -> Vec<String> {
    tldr_core::language::language_list(
        config.language.as_deref(),
        config.preferred_language.as_deref(),
        config.session_languages.as_deref(),
        config.locale.as_deref(),
    )
}

/// List every command with a cached page across the configured platforms
/// and languages, one `name (lang)` entry per line.
fn cmd_list(config: &Config) -> Result<i32> {
    let cache = Cache::new(config.cache_dir.clone());
    let platforms = tldr_core::platform::platform_list(config.platform);
    let languages = configured_languages(config);

    let mut entries: Vec<String> = cache
        .list(&platforms, &languages)
        .iter()
        .map(|key| format!("{} ({})", key.command, key.language))
        .collect();
    entries.dedup();

    for entry in entries {
        println!("{}", entry);
    }
    Ok(0)
}

/// Clear the cache subtree of every configured language, reporting each
/// one; a partial failure clears what it can and exits nonzero.
fn cmd_clear_cache(config: &Config) -> Result<i32> {
    let cache = Cache::new(config.cache_dir.clone());
    let languages = configured_languages(config);

    let mut failed = false;
    for language in &languages {
        match cache.clear(language) {
            Ok(()) => println!("{} cleared cache for '{}'", "ok:".green(), language),
            Err(err) => {
                eprintln!(
                    "{} could not clear cache for '{}': {}",
                    "warning:".yellow(),
                    language,
                    err
                );
                failed = true;
            }
        }
    }
    Ok(if failed { 1 } else { 0 })
}

/// Build the style sheet: built-in defaults overridden per key by the
/// `TLDR_COLOR_*` environment variables.
fn stylesheet_from_env() -> StyleSheet {
    apply_color_overrides(StyleSheet::default(), |key| {
        env::var(format!("TLDR_COLOR_{}", key.as_str().to_uppercase())).ok()
    })
}

fn apply_color_overrides(
    mut sheet: StyleSheet,
    lookup: impl Fn(StyleKey) -> Option<String>,
) -> StyleSheet {
    for key in StyleKey::ALL {
        if let Some(spec) = lookup(key) {
            if !spec.trim().is_empty() {
                sheet.set(key, Style::parse(&spec));
            }
        }
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["tldr", "-p", "osx", "git", "checkout"]).unwrap();
        assert_eq!(cli.platform, Some(Platform::OsX));
        assert_eq!(cli.command, vec!["git", "checkout"]);
    }

    #[test]
    fn test_cli_parses_list_flag() {
        let cli = Cli::try_parse_from(["tldr", "--list"]).unwrap();
        assert!(cli.list);
        assert!(cli.command.is_empty());
    }

    #[test]
    fn test_normalize_command_joins_words() {
        let words = vec!["Git".to_string(), "Checkout".to_string()];
        assert_eq!(normalize_command(&words), "git-checkout");
    }

    #[test]
    fn test_color_overrides_replace_only_named_keys() {
        let sheet = apply_color_overrides(StyleSheet::default(), |key| match key {
            StyleKey::Command => Some("blue underline".to_string()),
            _ => None,
        });
        assert_eq!(sheet.command, Style::parse("blue underline"));
        assert_eq!(sheet.name, StyleSheet::default().name);
    }

    #[test]
    fn test_blank_color_override_keeps_default() {
        let sheet = apply_color_overrides(StyleSheet::default(), |_| Some("   ".to_string()));
        assert_eq!(sheet, StyleSheet::default());
    }
}
