//! Title normalisation shared by the title scorer and title search.
//!
//! Titles from different publishers differ in casing, punctuation, leading
//! articles, episode-number prefixes and trailing qualifiers. Everything
//! here maps a raw title onto a comparable key.

use regex::Regex;
use std::sync::LazyLock;

macro_rules! title_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

title_pattern!(RE_DATE, r"\d{1,2}/\d{1,2}/(\d{2}|\d{4})");
title_pattern!(RE_SEQUENCE, r"(?i)episode.*\d+");
title_pattern!(RE_SEQUENCE_PREFIX, r"^\s*\d+\s*[.:-]\s*(.*)$");
title_pattern!(RE_RATING_SUFFIX, r"\s*\((un)?rated\)\s*$");
title_pattern!(RE_YEAR_SUFFIX, r"\s*\(\d{4}\)\s*$");
title_pattern!(RE_FC, r"\bfc\b");
title_pattern!(RE_NON_ALNUM, r"[^a-z0-9]+");

const LEADING_WORDS: [&str; 2] = ["the ", "live "];

/// Rough kind of a title. Titles of different kinds never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleType {
    /// Looks like `12/03/2011`.
    Date,
    /// Looks like `Episode 4`.
    Sequence,
    Default,
}

impl TitleType {
    pub fn of(title: &str) -> TitleType {
        if is_match(&RE_DATE, title) {
            TitleType::Date
        } else if is_match(&RE_SEQUENCE, title) {
            TitleType::Sequence
        } else {
            TitleType::Default
        }
    }
}

fn is_match(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(text))
}

fn replace_all(pattern: &LazyLock<Option<Regex>>, text: &str, with: &str) -> String {
    match pattern.as_ref() {
        Some(re) => re.replace_all(text, with).into_owned(),
        None => text.to_string(),
    }
}

/// Comparable key for a title: lowercase, qualifiers and punctuation removed,
/// words joined by `-`.
pub fn normalize(title: &str) -> String {
    let mut t = title.trim().to_lowercase();

    let unprefixed = RE_SEQUENCE_PREFIX
        .as_ref()
        .and_then(|re| re.captures(&t))
        .and_then(|c| c.get(1))
        .map(|rest| rest.as_str().to_string())
        .filter(|rest| !rest.is_empty());
    if let Some(rest) = unprefixed {
        t = rest;
    }
    t = replace_all(&RE_RATING_SUFFIX, &t, "");
    t = replace_all(&RE_YEAR_SUFFIX, &t, "");

    for word in LEADING_WORDS {
        if let Some(rest) = t.strip_prefix(word) {
            t = rest.to_string();
        }
    }

    t = t
        .replace(" vs. ", " vs ")
        .replace(" v ", " vs ")
        .replace(" & ", " and ")
        .replace(',', "");
    t = replace_all(&RE_FC, &t, "");

    let joined = replace_all(&RE_NON_ALNUM, &t, "-");
    joined.trim_matches('-').to_string()
}

/// Normalised titles equal once dashes are ignored.
pub fn same_title(a: &str, b: &str) -> bool {
    undashed(&normalize(a)) == undashed(&normalize(b))
}

/// The part of each title before its first colon matches. Applies only when
/// at least one title has a colon after its first character.
pub fn same_prefix(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim_start_matches(':'), b.trim_start_matches(':'));
    if !a.contains(':') && !b.contains(':') {
        return false;
    }
    let key = |t: &str| undashed(&normalize(t.split(':').next().unwrap_or(t)));
    let (ka, kb) = (key(a), key(b));
    !ka.is_empty() && ka == kb
}

/// Similarity in `[0, 1]` between two titles after normalisation.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (na, nb) = (undashed(&normalize(a)), undashed(&normalize(b)));
    if na.is_empty() || nb.is_empty() {
        return 0.0;
    }
    if na == nb {
        return 1.0;
    }
    strsim::normalized_levenshtein(&na, &nb)
}

fn undashed(t: &str) -> String {
    t.replace('-', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_articles_qualifiers_and_punctuation() {
        assert_eq!(normalize("The Office (2005)"), "office");
        assert_eq!(normalize("Live Cricket: England, Australia"), "cricket-england-australia");
        assert_eq!(normalize("Taken (Unrated)"), "taken");
        assert_eq!(normalize("3. The Return"), "return");
    }

    #[test]
    fn sporting_fixtures_normalise_alike() {
        assert!(same_title("Arsenal v Chelsea", "Arsenal vs. Chelsea"));
        assert!(same_title("Arsenal FC vs Chelsea", "Arsenal vs Chelsea"));
        assert!(same_title("Fish & Chips", "fish and chips"));
    }

    #[test]
    fn title_types() {
        assert_eq!(TitleType::of("12/03/2011"), TitleType::Date);
        assert_eq!(TitleType::of("Episode 4"), TitleType::Sequence);
        assert_eq!(TitleType::of("Rose"), TitleType::Default);
    }

    #[test]
    fn colon_prefix_matching() {
        assert!(same_prefix("Horizon: Black Holes", "Horizon"));
        assert!(!same_prefix("Horizon", "Panorama"));
        assert!(!same_prefix(":Horizon", "Horizon"));
    }

    #[test]
    fn similarity_is_one_for_equal_keys() {
        assert_eq!(similarity("The Office", "office"), 1.0);
        assert!(similarity("Doctor Who", "Doctor Who Confidential") < 1.0);
        assert_eq!(similarity("", "x"), 0.0);
    }
}
