//! Markdown-to-terminal rendering
//!
//! Pages use a constrained dialect: every line is classified by its first
//! significant character (`#` heading, `>` description, `-` example text,
//! backtick command line, blank). The renderer is a line-oriented pass that
//! never fails; anything unrecognized falls through as description text.
//!
//! Rendering is split in two: [`render_page`] produces semantic
//! [`StyledToken`]s, [`paint`] applies a [`StyleSheet`] to them. Tests and
//! alternative front ends consume the tokens directly.

use std::str::FromStr;

use crate::page::Page;
use crate::style::{StyleKey, StyleSheet};

/// A run of text tagged with its semantic style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledToken {
    pub text: String,
    pub style: StyleKey,
}

impl StyledToken {
    fn new(text: impl Into<String>, style: StyleKey) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Which form of a `{{[short|long]}}` option placeholder to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionStyle {
    Short,
    #[default]
    Long,
    Both,
}

impl FromStr for OptionStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "short" => Ok(OptionStyle::Short),
            "long" => Ok(OptionStyle::Long),
            "both" => Ok(OptionStyle::Both),
            other => Err(format!("unknown option style: {}", other)),
        }
    }
}

/// Renderer knobs. Styling itself lives in [`StyleSheet`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub option_style: OptionStyle,
}

/// One output line: an indent plus styled tokens. No tokens means a blank
/// separator line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub indent: usize,
    pub tokens: Vec<StyledToken>,
}

impl RenderedLine {
    fn blank() -> Self {
        Self {
            indent: 0,
            tokens: Vec::new(),
        }
    }

    fn new(indent: usize, tokens: Vec<StyledToken>) -> Self {
        Self { indent, tokens }
    }

    pub fn is_blank(&self) -> bool {
        self.tokens.is_empty()
    }
}

// Sentinels standing in for escaped braces during placeholder scanning.
// Control characters never occur in page text.
const ESCAPED_OPEN: &str = "\u{1}";
const ESCAPED_CLOSE: &str = "\u{2}";

/// Render a page to styled token lines. Output always begins and ends with
/// exactly one blank line.
pub fn render_page(page: &Page, opts: &RenderOptions) -> Vec<RenderedLine> {
    let mut out = vec![RenderedLine::blank()];

    for raw in page.lines() {
        let line = raw.trim();
        let Some(first) = line.chars().next() else {
            // Blank separator: carries no content in styled mode.
            continue;
        };

        match first {
            '#' => {
                let text = line.trim_start_matches('#').trim_start();
                out.push(RenderedLine::new(
                    2,
                    vec![StyledToken::new(text, StyleKey::Name)],
                ));
            }
            '>' => {
                let text = line[1..].trim_end_matches('<').trim();
                out.push(RenderedLine::new(
                    1,
                    vec![StyledToken::new(text, StyleKey::Description)],
                ));
            }
            '-' => {
                out.push(RenderedLine::blank());
                out.push(RenderedLine::new(2, example_tokens(line)));
            }
            '`' => {
                let body = line[1..].strip_suffix('`').unwrap_or(&line[1..]);
                out.push(RenderedLine::new(4, command_tokens(body, opts.option_style)));
            }
            _ => {
                out.push(RenderedLine::new(
                    0,
                    vec![StyledToken::new(line, StyleKey::Description)],
                ));
            }
        }
    }

    out.push(RenderedLine::blank());
    out
}

/// Plain mode: each input line right-trimmed, verbatim, plus one trailing
/// blank line. An empty page yields nothing at all.
pub fn render_plain(page: &Page) -> Vec<String> {
    let mut out: Vec<String> = page.lines().map(|l| l.trim_end().to_string()).collect();
    if !out.is_empty() {
        out.push(String::new());
    }
    out
}

/// Apply a style sheet to rendered lines, producing printable strings.
pub fn paint(lines: &[RenderedLine], sheet: &StyleSheet) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            if line.is_blank() {
                return String::new();
            }
            let mut text = " ".repeat(line.indent);
            for token in &line.tokens {
                text.push_str(&sheet.get(token.style).paint(&token.text));
            }
            text
        })
        .collect()
}

/// Split an example description line on backtick spans. Span text gets the
/// command style so inline code stands out from the surrounding prose.
fn example_tokens(line: &str) -> Vec<StyledToken> {
    let mut tokens = Vec::new();
    let mut rest = line;

    while let Some(start) = rest.find('`') {
        push_token(&mut tokens, &rest[..start], StyleKey::Example);
        match rest[start + 1..].find('`') {
            Some(len) => {
                push_token(&mut tokens, &rest[start + 1..start + 1 + len], StyleKey::Command);
                rest = &rest[start + 1 + len + 1..];
            }
            None => {
                // Unmatched backtick: keep the remainder literal.
                push_token(&mut tokens, &rest[start..], StyleKey::Example);
                rest = "";
            }
        }
    }
    push_token(&mut tokens, rest, StyleKey::Example);
    tokens
}

/// Split a command line into literal command text and `{{...}}` placeholder
/// parameters. `\{\{` / `\}\}` escapes are shielded with sentinels before
/// scanning and restored as literal braces afterwards, so escaped braces
/// never open a placeholder.
fn command_tokens(body: &str, option_style: OptionStyle) -> Vec<StyledToken> {
    let shielded = body
        .replace("\\{\\{", ESCAPED_OPEN)
        .replace("\\}\\}", ESCAPED_CLOSE);

    let mut tokens = Vec::new();
    let mut rest = shielded.as_str();

    while let Some(start) = rest.find("{{") {
        push_restored(&mut tokens, &rest[..start], StyleKey::Command);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(len) => {
                let inner = &after_open[..len];
                push_restored(
                    &mut tokens,
                    &placeholder_text(inner, option_style),
                    StyleKey::Parameter,
                );
                rest = &after_open[len + 2..];
            }
            None => {
                // Unterminated placeholder: the braces are literal text.
                push_restored(&mut tokens, &rest[start..], StyleKey::Command);
                rest = "";
            }
        }
    }
    push_restored(&mut tokens, rest, StyleKey::Command);
    tokens
}

/// Resolve a placeholder's display text. `[short|long]` encodes an option
/// pair; everything else is kept as-is.
fn placeholder_text(inner: &str, option_style: OptionStyle) -> String {
    let pair = inner
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .and_then(|s| s.split_once('|'));

    match pair {
        Some((short, long)) => match option_style {
            OptionStyle::Short => short.to_string(),
            OptionStyle::Long => long.to_string(),
            OptionStyle::Both => format!("{}|{}", short, long),
        },
        None => inner.to_string(),
    }
}

fn push_restored(tokens: &mut Vec<StyledToken>, text: &str, style: StyleKey) {
    let restored = text.replace(ESCAPED_OPEN, "{{").replace(ESCAPED_CLOSE, "}}");
    push_token(tokens, &restored, style);
}

/// Append a token, merging into the previous one when the style matches and
/// skipping empty runs.
fn push_token(tokens: &mut Vec<StyledToken>, text: &str, style: StyleKey) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = tokens.last_mut() {
        if last.style == style {
            last.text.push_str(text);
            return;
        }
    }
    tokens.push(StyledToken::new(text, style));
}
