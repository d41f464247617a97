use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node};

static INITIALS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u:\b)[A-Z]").expect("initials pattern is valid"));

/// String utility functions
pub struct StringUtils;

impl StringUtils {
    /// Truncate to at most `max` characters, replacing the tail with "..."
    ///
    /// Input that already fits is returned unchanged.
    pub fn truncate(s: &str, max: usize) -> String {
        if s.chars().count() <= max {
            return s.to_string();
        }

        let mut truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        truncated.push_str("...");
        truncated
    }

    /// Strip all HTML markup, keeping escaped text content
    ///
    /// Script and style bodies are dropped entirely.
    pub fn clean(html: &str) -> String {
        let fragment = Html::parse_fragment(html);
        let mut text = String::with_capacity(html.len());

        for node in fragment.root_element().descendants() {
            if let Node::Text(content) = node.value() {
                let hidden = node.ancestors().any(|ancestor| {
                    matches!(ancestor.value(), Node::Element(element) if matches!(element.name(), "script" | "style"))
                });
                if !hidden {
                    text.push_str(content);
                }
            }
        }

        html_escape::encode_quoted_attribute(&text).into_owned()
    }

    /// Clean HTML then truncate
    pub fn clean_and_truncate(html: &str, max: usize) -> String {
        Self::truncate(&Self::clean(html), max)
    }

    /// Capitalize every word: "hello world" => "Hello World"
    pub fn ucwords(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        let mut word_start = true;

        for c in s.chars() {
            if c.is_alphanumeric() {
                if word_start {
                    out.extend(c.to_uppercase());
                } else {
                    out.extend(c.to_lowercase());
                }
                word_start = false;
            } else {
                out.push(c);
                // apostrophes stay inside a word ("don't")
                if c != '\'' && c != '\u{2019}' {
                    word_start = true;
                }
            }
        }

        out
    }

    /// Initials of every word, uppercased: "Hello world" => "HW"
    ///
    /// A `max` of zero or less returns every initial.
    pub fn first_letter(s: &str, max: i32) -> String {
        let initials: String = INITIALS
            .find_iter(&s.to_uppercase())
            .map(|m| m.as_str())
            .collect();

        match usize::try_from(max) {
            Ok(max) if max > 0 => initials.chars().take(max).collect(),
            _ => initials,
        }
    }

    /// Lowercase, hyphen-separated, ASCII-only slug
    ///
    /// Non-Latin scripts are transliterated: "Привет мир" => "privet-mir"
    pub fn slug(s: &str) -> String {
        let ascii = deunicode::deunicode(&s.replace('&', " and "));

        ascii
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect::<String>()
            .split('-')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Uppercase the first character only: "hello world" => "Hello world"
    pub fn first_to_upper(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}
