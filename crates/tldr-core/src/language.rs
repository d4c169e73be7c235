//! Language priority for page lookup
//!
//! Precedence: explicit override > session language list (colon-separated,
//! LANGUAGE-style) > OS locale > English. English is always present so a
//! lookup can never run out of languages before trying the upstream default.

/// The language every page repository is guaranteed to carry.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Translations where the region changes the page content, so the subtag
/// survives normalization. Everything else collapses to the bare language.
const REGION_SPLIT_LANGUAGES: [&str; 3] = ["pt_BR", "pt_PT", "zh_TW"];

/// Normalize a raw locale value into a page language code.
///
/// Strips encoding and modifier suffixes, lowercases the language subtag
/// and uppercases the region, then drops the region unless the translation
/// is region-split upstream: `en_US.UTF-8` -> `en`, `pt_BR` -> `pt_BR`.
/// Bare `pt` has no upstream tree of its own and maps to `pt_PT`. Returns
/// None for empty values and the `C`/`POSIX` locales, which carry no
/// language information.
fn normalize(raw: &str) -> Option<String> {
    let code = raw.split(['.', '@']).next().unwrap_or("");
    if code.is_empty() || code == "C" || code == "POSIX" {
        return None;
    }

    match code.split_once(['_', '-']) {
        Some((lang, region)) => {
            let lang = lang.to_ascii_lowercase();
            let full = format!("{}_{}", lang, region.to_ascii_uppercase());
            if REGION_SPLIT_LANGUAGES.contains(&full.as_str()) {
                Some(full)
            } else {
                Some(lang)
            }
        }
        None => {
            let lang = code.to_ascii_lowercase();
            if lang == "pt" {
                Some("pt_PT".to_string())
            } else {
                Some(lang)
            }
        }
    }
}

/// Build the ordered language search list.
///
/// `preferred` is a single code in the shape of the `TLDR_LANGUAGE`
/// environment variable and ranks above `session_languages`, a
/// colon-separated list in the shape of `LANGUAGE`; `locale` is a single
/// value in the shape of `LANG`. All are read by the caller, never here.
/// The result is deduplicated preserving first occurrence and always ends
/// with English unless English already ranks higher.
pub fn language_list(
    override_language: Option<&str>,
    preferred: Option<&str>,
    session_languages: Option<&str>,
    locale: Option<&str>,
) -> Vec<String> {
    let mut list: Vec<String> = Vec::new();

    let mut push = |code: Option<String>| {
        if let Some(code) = code {
            if !list.contains(&code) {
                list.push(code);
            }
        }
    };

    if let Some(over) = override_language {
        push(normalize(over));
    } else {
        push(preferred.and_then(normalize));
        if let Some(session) = session_languages {
            for entry in session.split(':') {
                push(normalize(entry));
            }
        }
        push(locale.and_then(normalize));
    }

    if !list.iter().any(|code| code == DEFAULT_LANGUAGE) {
        list.push(DEFAULT_LANGUAGE.to_string());
    }
    list
}
