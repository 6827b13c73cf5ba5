use itertools::Itertools;
use log::debug;
use regex::{Regex, RegexBuilder};

use crate::error::Result;
use crate::search::fold::{fold_char, fold_str};
use crate::search::{FieldMatch, HighlightRange, Matcher};

/// Finds every occurrence of the query as a literal, case-insensitive
/// substring. Occurrences are scanned left to right and never overlap.
///
/// Each occurrence contributes `1 / (1 + start)` to the field score, so
/// earlier and more frequent matches rank higher.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactMatcher;

pub enum ExactQuery {
    Pattern(Regex),

    /// Case folded query chars, used when the query is too large to compile.
    Folded(Vec<char>),
}

impl Matcher for ExactMatcher {
    type Query = ExactQuery;

    fn prepare(&self, query: &str) -> Result<ExactQuery> {
        // the query is plain text, never a pattern
        let built = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build();

        match built {
            Ok(pattern) => Ok(ExactQuery::Pattern(pattern)),
            Err(regex::Error::CompiledTooBig(limit)) => {
                debug!(
                    "query of {} chars exceeds regex size limit {}, scanning folded text",
                    query.chars().count(),
                    limit
                );
                Ok(ExactQuery::Folded(fold_str(query).chars().collect()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn find(&self, query: &ExactQuery, text: &str) -> Option<FieldMatch> {
        let ranges = match query {
            ExactQuery::Pattern(pattern) => pattern
                .find_iter(text)
                .filter(|found| !found.is_empty())
                .map(|found| HighlightRange::new(found.start(), found.len()))
                .collect_vec(),
            ExactQuery::Folded(needle) => scan_folded(needle, text),
        };

        if ranges.is_empty() {
            return None;
        }

        let score: f64 = ranges
            .iter()
            .map(|range| 1.0 / (1.0 + range.start as f64))
            .sum();

        Some(FieldMatch { ranges, score })
    }
}

/// Non-overlapping, left to right occurrences of the folded `needle` in `text`.
fn scan_folded(needle: &[char], text: &str) -> Vec<HighlightRange> {
    let haystack = text
        .char_indices()
        .map(|(byte_idx, ch)| (byte_idx, fold_char(ch)))
        .collect_vec();

    let mut ranges = Vec::new();
    if needle.is_empty() {
        return ranges;
    }

    let mut idx = 0;
    while idx + needle.len() <= haystack.len() {
        let window = &haystack[idx..idx + needle.len()];
        if window.iter().map(|&(_, ch)| ch).eq(needle.iter().copied()) {
            let start = window[0].0;
            let end = haystack
                .get(idx + needle.len())
                .map_or(text.len(), |&(byte_idx, _)| byte_idx);

            ranges.push(HighlightRange::new(start, end - start));
            idx += needle.len();
        } else {
            idx += 1;
        }
    }

    ranges
}
