use fuzzy_matcher::skim::SkimMatcherV2;
use itertools::Itertools;

use crate::error::Result;
use crate::search::fold::{fold_char, fold_str};
use crate::search::highlight::ranges_from_char_indices;
use crate::search::{FieldMatch, Matcher};

/// Multiplier for a query matching the start of the text as one contiguous run.
const PREFIX_BONUS: f64 = 2.0;

/// Multiplier for a match whose first char starts a word.
const WORD_START_BONUS: f64 = 1.5;

/// Subsequence matcher on top of any [`fuzzy_matcher::FuzzyMatcher`].
///
/// Query and text are case folded char by char before they reach the inner
/// matcher, so case is ignored beyond ASCII and aligned char indices still
/// point into the original text.
///
/// The inner matcher picks the best alignment of the query chars and scores
/// it. That score is then scaled by where the alignment starts: a contiguous
/// prefix beats a match starting at a word boundary, which beats a match
/// starting inside a word.
///
/// Highlights cover every char from the start of the text up to the last
/// aligned char that also occurs in the query, so `"gle"` in `"Google"`
/// highlights `G` and `gle`.
pub struct FuzzyMatcher<T = SkimMatcherV2>(T);

impl<T> FuzzyMatcher<T> {
    pub fn new(inner: T) -> Self {
        Self(inner)
    }
}

impl Default for FuzzyMatcher<SkimMatcherV2> {
    fn default() -> Self {
        Self(SkimMatcherV2::default().ignore_case())
    }
}

pub struct FuzzyQuery {
    /// Case folded query.
    pattern: String,

    /// Lowercase chars of the query, whitespace excluded.
    alphabet: Vec<char>,
}

impl FuzzyQuery {
    fn contains(&self, ch: char) -> bool {
        self.alphabet.contains(&fold_char(ch))
    }
}

impl<T> Matcher for FuzzyMatcher<T>
where
    T: fuzzy_matcher::FuzzyMatcher,
{
    type Query = FuzzyQuery;

    fn prepare(&self, query: &str) -> Result<FuzzyQuery> {
        let alphabet = query
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .map(fold_char)
            .unique()
            .collect_vec();

        Ok(FuzzyQuery {
            pattern: fold_str(query),
            alphabet,
        })
    }

    fn find(&self, query: &FuzzyQuery, text: &str) -> Option<FieldMatch> {
        let (score, aligned) = self.0.fuzzy_indices(&fold_str(text), &query.pattern)?;
        let last = *aligned.last()?;

        let chars = text.chars().collect_vec();

        let highlighted = chars
            .iter()
            .take(last + 1)
            .enumerate()
            .filter(|&(idx, &ch)| aligned.contains(&idx) || query.contains(ch))
            .map(|(idx, _)| idx)
            .collect_vec();

        let ranges = ranges_from_char_indices(text, &highlighted);
        let score = score.max(1) as f64 * placement_bonus(&chars, &aligned);

        Some(FieldMatch { ranges, score })
    }
}

fn placement_bonus(chars: &[char], aligned: &[usize]) -> f64 {
    let contiguous_prefix = aligned.iter().enumerate().all(|(pos, &idx)| pos == idx);
    if contiguous_prefix {
        return PREFIX_BONUS;
    }

    let first = aligned[0];
    if first == 0 {
        return WORD_START_BONUS;
    }

    let (prev, current) = (chars[first - 1], chars[first]);
    let word_start = !prev.is_alphanumeric() || (prev.is_lowercase() && current.is_uppercase());

    if word_start {
        WORD_START_BONUS
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(query: &str, text: &str) -> Option<FieldMatch> {
        let matcher: FuzzyMatcher = FuzzyMatcher::default();
        let query = matcher.prepare(query).unwrap();
        matcher.find(&query, text)
    }

    fn ranges(query: &str, text: &str) -> Vec<(usize, usize)> {
        find(query, text)
            .map(|found| found.ranges.iter().map(|r| (r.start, r.length)).collect())
            .unwrap_or_default()
    }

    #[test]
    fn matches_subsequences_ignoring_case() {
        assert!(find("tsr", "Tab Search").is_some());
        assert!(find("TAB", "tab search").is_some());
        assert!(find("bat", "tab search").is_none());
        assert!(find("x", "tab search").is_none());
    }

    #[test]
    fn ignores_case_beyond_ascii() {
        assert_eq!(ranges("café", "CAFÉ ÜBER"), vec![(0, 5)]);
        assert_eq!(ranges("über", "CAFÉ ÜBER"), vec![(6, 5)]);
        assert_eq!(ranges("ÜB", "café über"), vec![(6, 3)]);
        assert!(find("cafe", "CAFÉ").is_none());
    }

    #[test]
    fn highlights_query_chars_up_to_the_match() {
        assert_eq!(ranges("gle", "Google"), vec![(0, 1), (3, 3)]);
        assert_eq!(ranges("gle", "www.google.com"), vec![(4, 1), (7, 3)]);
        assert_eq!(ranges("sear", "Search Engine"), vec![(0, 4)]);
    }

    #[test]
    fn placement_ranks_prefix_then_word_start_then_inner() {
        let prefix = find("sear", "search engine").unwrap().score;
        let word = find("sear", "tab search").unwrap().score;
        let inner = find("sear", "asear").unwrap().score;

        assert!(prefix > word, "{prefix} <= {word}");
        assert!(word > inner, "{word} <= {inner}");
    }

    #[test]
    fn placement_bonus_classes() {
        let chars = |text: &str| text.chars().collect_vec();

        assert_eq!(placement_bonus(&chars("abc"), &[0, 1, 2]), PREFIX_BONUS);
        assert_eq!(placement_bonus(&chars("a_bc"), &[0, 2]), WORD_START_BONUS);
        assert_eq!(placement_bonus(&chars("a bc"), &[2, 3]), WORD_START_BONUS);
        assert_eq!(placement_bonus(&chars("aBc"), &[1, 2]), WORD_START_BONUS);
        assert_eq!(placement_bonus(&chars("abc"), &[1, 2]), 1.0);
    }

    #[test]
    fn ranges_are_bytes_for_multibyte_text() {
        let text = "Über café";
        let found = find("caf", text).unwrap();
        let last = found.ranges.last().unwrap();
        assert_eq!(&text[last.start..last.end()], "caf");
    }
}
