//! Shared text cleanup for rider-facing labels (stop names, headsigns).
//!
//! Every function here is a pure `&str -> String` transform so agency rules
//! can compose them in whatever order their feed needs.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Languages a feed can be published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[serde(alias = "en")]
    English,
    #[serde(alias = "fr")]
    French,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::French => "fr",
        }
    }
}

lazy_static! {
    static ref VIA: Regex = Regex::new(r"(?i)(^|\W)via\W.*$").unwrap();
    static ref UPPER_CASE_WORD: Regex = Regex::new(r"\b\p{Lu}{2,}(?:['’]\p{Lu}{1,2})?\b").unwrap();
    static ref MC_X: Regex = Regex::new(r"\b(Mc)(\p{Ll})").unwrap();
    static ref EMPTY_PARENTHESES: Regex = Regex::new(r"\(\s*\)").unwrap();
    static ref ORDINAL_WORD: Regex = Regex::new(
        r"(?i)\b(first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth)\b"
    )
    .unwrap();
    static ref SPACED_ORDINAL: Regex = Regex::new(r"(?i)\b(\d+)\s+(st|nd|rd|th)\b").unwrap();
    static ref STREET_TYPES: Vec<(Regex, &'static str)> = [
        ("avenue", "Ave"),
        ("boulevard", "Blvd"),
        ("street", "St"),
        ("road", "Rd"),
        ("drive", "Dr"),
        ("crescent", "Cres"),
        ("court", "Ct"),
        ("parkway", "Pkwy"),
        ("highway", "Hwy"),
        ("lane", "Ln"),
        ("terrace", "Terr"),
        ("square", "Sq"),
        ("circle", "Cir"),
        ("private", "Pvt"),
    ]
    .into_iter()
    .map(|(word, short)| (Regex::new(&format!(r"(?i)\b{word}\b")).unwrap(), short))
    .collect();
    static ref SPACES: Regex = Regex::new(r"\s+").unwrap();
    static ref SPACE_BEFORE_CLOSING: Regex = Regex::new(r"\s+([,.\)])").unwrap();
    static ref SPACE_AFTER_OPENING: Regex = Regex::new(r"\(\s+").unwrap();
    static ref LOOSE_DASH: Regex = Regex::new(r"\s+-\s*|\s*-\s+").unwrap();
    static ref SPACE_BEFORE_HIGH_PUNCTUATION: Regex = Regex::new(r"\s*([:;!?])").unwrap();
}

const BOUND_CHARS: &[char] = &['-', '/', ',', ';', ':', '–', '—'];

/// Builds a case-insensitive pattern matching any of `words` as whole words.
///
/// Word boundaries are zero-width, so adjacent occurrences all match and the
/// surrounding separators stay in place. Each word must start and end with a
/// word character.
pub fn clean_words(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
        .expect("escaped word alternation is a valid pattern")
}

/// Replacement string for a [`clean_words`] pattern, with `$` taken
/// literally.
pub fn clean_words_replacement(replacement: &str) -> String {
    replacement.replace('$', "$$")
}

/// Drops a "via ..." clause and everything after it.
///
/// A label that is nothing but a via clause is returned trimmed instead of
/// emptied.
pub fn remove_via(text: &str) -> String {
    let removed = VIA.replace(text, "${1}");
    let removed = removed.trim();
    if removed.is_empty() {
        text.trim().to_string()
    } else {
        removed.to_string()
    }
}

/// Title-cases words written entirely in upper case, leaving `ignored_words`
/// (acronyms) untouched.
pub fn title_case_upper_case_words(text: &str, ignored_words: &[&str]) -> String {
    UPPER_CASE_WORD
        .replace_all(text, |caps: &Captures| {
            let word = &caps[0];
            if ignored_words.contains(&word) {
                word.to_string()
            } else {
                title_case_word(word)
            }
        })
        .into_owned()
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// "Mcdonald" -> "McDonald".
pub fn fix_mc_x_case(text: &str) -> String {
    MC_X.replace_all(text, |caps: &Captures| {
        format!("{}{}", &caps[1], caps[2].to_uppercase())
    })
    .into_owned()
}

/// Strips separator punctuation and whitespace left dangling at either end,
/// along with emptied parentheses.
pub fn clean_bounds(text: &str) -> String {
    let text = EMPTY_PARENTHESES.replace_all(text, "");
    text.trim_matches(|c: char| c.is_whitespace() || BOUND_CHARS.contains(&c))
        .to_string()
}

fn ordinal_suffix(n: u64) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Spelled-out ordinals become numerals ("Third" -> "3rd") and detached
/// suffixes are joined ("1 st" -> "1st") when they agree with the number.
pub fn clean_numbers(text: &str) -> String {
    let text = ORDINAL_WORD.replace_all(text, |caps: &Captures| {
        let n = match caps[1].to_lowercase().as_str() {
            "first" => 1,
            "second" => 2,
            "third" => 3,
            "fourth" => 4,
            "fifth" => 5,
            "sixth" => 6,
            "seventh" => 7,
            "eighth" => 8,
            "ninth" => 9,
            _ => 10,
        };
        format!("{n}{}", ordinal_suffix(n))
    });
    SPACED_ORDINAL
        .replace_all(&text, |caps: &Captures| {
            let suffix = caps[2].to_lowercase();
            match caps[1].parse::<u64>() {
                Ok(n) if ordinal_suffix(n) == suffix => format!("{}{suffix}", &caps[1]),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Abbreviates street type words ("Avenue" -> "Ave").
pub fn clean_street_types(text: &str) -> String {
    STREET_TYPES
        .iter()
        .fold(text.to_string(), |acc, (pattern, short)| {
            pattern.replace_all(&acc, *short).into_owned()
        })
}

/// Final whitespace and punctuation pass, without locale context.
pub fn clean_label(text: &str) -> String {
    let text = SPACES.replace_all(text, " ");
    let text = SPACE_BEFORE_CLOSING.replace_all(&text, "${1}");
    let text = SPACE_AFTER_OPENING.replace_all(&text, "(");
    let text = LOOSE_DASH.replace_all(&text, " - ");
    capitalize_first(text.trim())
}

/// [`clean_label`], then the spacing rule of `locale` before `: ; ! ?`:
/// none in English, a single space in French.
pub fn clean_label_locale(locale: Locale, text: &str) -> String {
    let text = clean_label(text);
    let text: Cow<str> = match locale {
        Locale::English => SPACE_BEFORE_HIGH_PUNCTUATION.replace_all(&text, "${1}"),
        Locale::French => SPACE_BEFORE_HIGH_PUNCTUATION.replace_all(&text, " ${1}"),
    };
    text.trim().to_string()
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        _ => text.to_string(),
    }
}
