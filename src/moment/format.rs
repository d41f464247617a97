//! Moment-style format patterns (`DD MMMM YYYY, HH:mm`) on top of chrono.
//!
//! Each recognized token maps onto a single chrono strftime item, except the
//! quarter (`Q`) and ordinal day (`Do`) tokens which chrono has no item for.
//! Text wrapped in square brackets is emitted verbatim.

use chrono::{DateTime, Datelike, FixedOffset};
use std::fmt::Write;

/// Default pattern used by `Display`
pub const ISO_8601: &str = "YYYY-MM-DDTHH:mm:ssZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    Strftime(&'static str),
    Quarter,
    OrdinalDay,
}

// Longest tokens first so `MMMM` wins over `MM` and `M`.
const TOKENS: &[(&str, Item)] = &[
    ("YYYY", Item::Strftime("%Y")),
    ("YY", Item::Strftime("%y")),
    ("GGGG", Item::Strftime("%G")),
    ("MMMM", Item::Strftime("%B")),
    ("MMM", Item::Strftime("%b")),
    ("MM", Item::Strftime("%m")),
    ("M", Item::Strftime("%-m")),
    ("DDDD", Item::Strftime("%j")),
    ("DDD", Item::Strftime("%-j")),
    ("DD", Item::Strftime("%d")),
    ("Do", Item::OrdinalDay),
    ("D", Item::Strftime("%-d")),
    ("dddd", Item::Strftime("%A")),
    ("ddd", Item::Strftime("%a")),
    ("d", Item::Strftime("%w")),
    ("E", Item::Strftime("%u")),
    ("WW", Item::Strftime("%V")),
    ("HH", Item::Strftime("%H")),
    ("H", Item::Strftime("%-H")),
    ("hh", Item::Strftime("%I")),
    ("h", Item::Strftime("%-I")),
    ("mm", Item::Strftime("%M")),
    ("m", Item::Strftime("%-M")),
    ("ss", Item::Strftime("%S")),
    ("s", Item::Strftime("%-S")),
    ("SSS", Item::Strftime("%3f")),
    ("A", Item::Strftime("%p")),
    ("a", Item::Strftime("%P")),
    ("ZZ", Item::Strftime("%z")),
    ("Z", Item::Strftime("%:z")),
    ("X", Item::Strftime("%s")),
    ("Q", Item::Quarter),
];

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Literal(&'a str),
    Item(Item),
}

fn tokenize(pattern: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = pattern;

    while let Some(first) = rest.chars().next() {
        if first == '[' {
            if let Some(end) = rest.find(']') {
                tokens.push(Token::Literal(&rest[1..end]));
                rest = &rest[end + 1..];
                continue;
            }
        }

        if let Some((name, item)) = TOKENS.iter().find(|(name, _)| rest.starts_with(name)) {
            tokens.push(Token::Item(*item));
            rest = &rest[name.len()..];
            continue;
        }

        let width = first.len_utf8();
        tokens.push(Token::Literal(&rest[..width]));
        rest = &rest[width..];
    }

    tokens
}

/// Render `dt` using a moment-style pattern
pub(crate) fn format(dt: &DateTime<FixedOffset>, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);

    for token in tokenize(pattern) {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Item(Item::Strftime(item)) => {
                let _ = write!(out, "{}", dt.format(item));
            }
            Token::Item(Item::Quarter) => {
                let _ = write!(out, "{}", (dt.month() - 1) / 3 + 1);
            }
            Token::Item(Item::OrdinalDay) => out.push_str(&ordinal(dt.day())),
        }
    }

    out
}

/// Translate a moment-style pattern into a chrono strftime string.
///
/// Returns `None` when the pattern contains a token chrono cannot parse.
pub(crate) fn to_strftime(pattern: &str) -> Option<String> {
    let mut out = String::with_capacity(pattern.len() * 2);

    for token in tokenize(pattern) {
        match token {
            Token::Literal(text) => out.push_str(&text.replace('%', "%%")),
            Token::Item(Item::Strftime(item)) => out.push_str(item),
            Token::Item(_) => return None,
        }
    }

    Some(out)
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}
