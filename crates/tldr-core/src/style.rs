//! Semantic styles for rendered output
//!
//! The renderer emits tokens tagged with a semantic [`StyleKey`]; the sheet
//! maps each key to a concrete color/attribute triple. The vocabularies are
//! closed: unknown colors or attributes in user-supplied specs are dropped
//! deterministically and the built-in default survives per field.

use colored::{Color, ColoredString, Colorize};

/// The fixed vocabulary of semantic styles a token can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKey {
    /// Command name heading (`# tar`).
    Name,
    /// Summary lines (`> Archiving utility.`).
    Description,
    /// Example description lines (`- Extract an archive:`).
    Example,
    /// Literal command text inside example command lines.
    Command,
    /// User-fillable `{{...}}` placeholder text.
    Parameter,
}

impl StyleKey {
    pub const ALL: [StyleKey; 5] = [
        StyleKey::Name,
        StyleKey::Description,
        StyleKey::Example,
        StyleKey::Command,
        StyleKey::Parameter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StyleKey::Name => "name",
            StyleKey::Description => "description",
            StyleKey::Example => "example",
            StyleKey::Command => "command",
            StyleKey::Parameter => "parameter",
        }
    }
}

/// Text attributes a style may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr {
    Bold,
    Dimmed,
    Italic,
    Underline,
    Reversed,
    Blink,
}

/// One resolved style: optional foreground, optional background, any number
/// of attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub attrs: Vec<Attr>,
}

impl Style {
    pub fn fg(color: Color) -> Self {
        Style {
            fg: Some(color),
            ..Style::default()
        }
    }

    pub fn attr(attr: Attr) -> Self {
        Style {
            attrs: vec![attr],
            ..Style::default()
        }
    }

    /// Parse a whitespace-separated spec: `[color] [on <color>] [attr ...]`,
    /// e.g. `cyan on black bold underline`. Unrecognized words are ignored;
    /// whatever parses wins over nothing, never over the caller's default.
    pub fn parse(spec: &str) -> Self {
        let mut style = Style::default();
        let mut next_is_background = false;

        for word in spec.split_whitespace() {
            let word = word.to_ascii_lowercase();
            if word == "on" {
                next_is_background = true;
                continue;
            }
            if let Some(color) = parse_color(&word) {
                if next_is_background {
                    style.bg = Some(color);
                } else {
                    style.fg = Some(color);
                }
            } else if let Some(attr) = parse_attr(&word) {
                if !style.attrs.contains(&attr) {
                    style.attrs.push(attr);
                }
            }
            next_is_background = false;
        }
        style
    }

    /// Apply this style to a piece of text, producing ANSI-styled output.
    pub fn paint(&self, text: &str) -> String {
        let mut styled = ColoredString::from(text);
        if let Some(fg) = self.fg {
            styled = styled.color(fg);
        }
        if let Some(bg) = self.bg {
            styled = styled.on_color(bg);
        }
        for attr in &self.attrs {
            styled = match attr {
                Attr::Bold => styled.bold(),
                Attr::Dimmed => styled.dimmed(),
                Attr::Italic => styled.italic(),
                Attr::Underline => styled.underline(),
                Attr::Reversed => styled.reversed(),
                Attr::Blink => styled.blink(),
            };
        }
        styled.to_string()
    }
}

fn parse_color(word: &str) -> Option<Color> {
    match word {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        _ => None,
    }
}

fn parse_attr(word: &str) -> Option<Attr> {
    match word {
        "bold" => Some(Attr::Bold),
        "dim" | "dimmed" => Some(Attr::Dimmed),
        "italic" => Some(Attr::Italic),
        "underline" => Some(Attr::Underline),
        "reverse" | "reversed" => Some(Attr::Reversed),
        "blink" => Some(Attr::Blink),
        _ => None,
    }
}

/// Maps every [`StyleKey`] to its resolved style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    pub name: Style,
    pub description: Style,
    pub example: Style,
    pub command: Style,
    pub parameter: Style,
}

impl Default for StyleSheet {
    fn default() -> Self {
        StyleSheet {
            name: Style::attr(Attr::Bold),
            description: Style::default(),
            example: Style::fg(Color::Green),
            command: Style::fg(Color::Red),
            parameter: Style::default(),
        }
    }
}

impl StyleSheet {
    pub fn get(&self, key: StyleKey) -> &Style {
        match key {
            StyleKey::Name => &self.name,
            StyleKey::Description => &self.description,
            StyleKey::Example => &self.example,
            StyleKey::Command => &self.command,
            StyleKey::Parameter => &self.parameter,
        }
    }

    /// Replace one key's style with a parsed spec.
    pub fn set(&mut self, key: StyleKey, style: Style) {
        match key {
            StyleKey::Name => self.name = style,
            StyleKey::Description => self.description = style,
            StyleKey::Example => self.example = style,
            StyleKey::Command => self.command = style,
            StyleKey::Parameter => self.parameter = style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_spec() {
        let style = Style::parse("cyan on black bold underline");
        assert_eq!(style.fg, Some(Color::Cyan));
        assert_eq!(style.bg, Some(Color::Black));
        assert_eq!(style.attrs, vec![Attr::Bold, Attr::Underline]);
    }

    #[test]
    fn test_parse_ignores_unknown_words() {
        let style = Style::parse("chartreuse bold sparkly");
        assert_eq!(style.fg, None);
        assert_eq!(style.bg, None);
        assert_eq!(style.attrs, vec![Attr::Bold]);
    }

    #[test]
    fn test_parse_trailing_on_is_harmless() {
        let style = Style::parse("red on");
        assert_eq!(style.fg, Some(Color::Red));
        assert_eq!(style.bg, None);
    }

    #[test]
    fn test_parse_deduplicates_attrs() {
        let style = Style::parse("bold bold bold");
        assert_eq!(style.attrs, vec![Attr::Bold]);
    }

    #[test]
    fn test_empty_style_paints_verbatim() {
        colored::control::set_override(false);
        assert_eq!(Style::default().paint("plain"), "plain");
        colored::control::unset_override();
    }
}
