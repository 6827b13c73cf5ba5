use std::collections::BTreeMap;

use itertools::Itertools;
use log::{debug, trace};
use serde::Serialize;

pub use fields::*;
pub use matchers::*;
pub use providers::*;

use crate::error::{Result, SearchError};

mod fields;
mod fold;
pub mod highlight;
mod matchers;
mod providers;

/// A matched span `[start, start + length)` of a field's text.
///
/// Offsets are in bytes and always fall on char boundaries, so
/// `&text[range.start..range.end()]` is the highlighted substring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct HighlightRange {
    pub start: usize,
    pub length: usize,
}

impl HighlightRange {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// What a matcher found in the text of a single field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldMatch {
    /// Matched spans, sorted by start and never overlapping.
    pub ranges: Vec<HighlightRange>,

    /// Unweighted quality of the match, higher is better.
    pub score: f64,
}

/// A record that survived the search, annotated with its matched spans.
#[derive(Clone, Debug, Serialize)]
pub struct MatchResult<'a, R> {
    pub record: &'a R,

    /// Highlight ranges keyed by field name. Fields without a match are absent.
    pub highlight_ranges: BTreeMap<String, Vec<HighlightRange>>,

    #[serde(skip)]
    score: f64,
}

impl<'a, R> MatchResult<'a, R> {
    fn unscored(record: &'a R) -> Self {
        Self {
            record,
            highlight_ranges: BTreeMap::new(),
            score: 0.0,
        }
    }

    /// The composite score used to order results. Only meaningful relative
    /// to other results of the same call.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Ranges matched in the given field, empty if the field did not match.
    pub fn ranges(&self, field: &str) -> &[HighlightRange] {
        self.highlight_ranges
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// A scanning strategy that locates a query inside a field's text.
pub trait Matcher {
    /// Query representation computed once per search call.
    type Query;

    /// Prepares the trimmed, non-empty query for repeated use.
    fn prepare(&self, query: &str) -> Result<Self::Query>;

    /// Finds the spans of `text` matching the query together with a quality
    /// score. Returns `None` if the text does not match.
    fn find(&self, query: &Self::Query, text: &str) -> Option<FieldMatch>;
}

/// Which fields to search and how to scan them.
pub struct SearchOptions<R> {
    pub fields: Vec<FieldSpec<R>>,
    pub fuzzy: bool,
}

impl<R> SearchOptions<R> {
    pub fn exact(fields: Vec<FieldSpec<R>>) -> Self {
        Self { fields, fuzzy: false }
    }

    pub fn fuzzy(fields: Vec<FieldSpec<R>>) -> Self {
        Self { fields, fuzzy: true }
    }
}

/// Searches `records` for `query` and returns the matching records, best first.
///
/// An empty (or whitespace only) query returns every record in input order
/// without highlights. Otherwise a record is kept if at least one of its
/// fields matches; records with equal scores keep their input order.
pub fn search<'a, R>(
    query: &str,
    records: &'a [R],
    options: &SearchOptions<R>,
) -> Result<Vec<MatchResult<'a, R>>> {
    if options.fuzzy {
        fuzzy_search(query, records, &options.fields)
    } else {
        exact_search(query, records, &options.fields)
    }
}

/// Literal, case-insensitive substring search.
pub fn exact_search<'a, R>(
    query: &str,
    records: &'a [R],
    fields: &[FieldSpec<R>],
) -> Result<Vec<MatchResult<'a, R>>> {
    search_with(&ExactMatcher, query, records, fields)
}

/// Case-insensitive subsequence search using the default fuzzy matcher.
pub fn fuzzy_search<'a, R>(
    query: &str,
    records: &'a [R],
    fields: &[FieldSpec<R>],
) -> Result<Vec<MatchResult<'a, R>>> {
    let matcher: FuzzyMatcher = FuzzyMatcher::default();
    search_with(&matcher, query, records, fields)
}

/// Runs the ranking pipeline with an arbitrary matcher.
pub fn search_with<'a, R, M>(
    matcher: &M,
    query: &str,
    records: &'a [R],
    fields: &[FieldSpec<R>],
) -> Result<Vec<MatchResult<'a, R>>>
where
    M: Matcher + ?Sized,
{
    validate_fields(fields)?;

    let query = query.trim();
    if query.is_empty() {
        return Ok(records.iter().map(MatchResult::unscored).collect());
    }

    let prepared = matcher.prepare(query)?;

    let results = records
        .iter()
        .filter_map(|record| score_record(matcher, &prepared, record, fields))
        // sorted_by is stable, equal scores keep their input order
        .sorted_by(|lhs, rhs| rhs.score.total_cmp(&lhs.score))
        .collect_vec();

    debug!(
        "query {:?} matched {} of {} records",
        query,
        results.len(),
        records.len()
    );

    Ok(results)
}

fn score_record<'a, R, M>(
    matcher: &M,
    query: &M::Query,
    record: &'a R,
    fields: &[FieldSpec<R>],
) -> Option<MatchResult<'a, R>>
where
    M: Matcher + ?Sized,
{
    let mut highlight_ranges = BTreeMap::new();
    let mut score = 0.0;

    for field in fields {
        let text = field.text(record);
        if text.is_empty() {
            continue;
        }

        let Some(found) = matcher.find(query, &text) else {
            continue;
        };

        if found.ranges.is_empty() {
            continue;
        }

        trace!(
            "field {:?} matched {} span(s), score {}",
            field.name(),
            found.ranges.len(),
            found.score
        );

        score += field.weight() * found.score;
        highlight_ranges.insert(field.name().to_owned(), found.ranges);
    }

    if highlight_ranges.is_empty() {
        return None;
    }

    Some(MatchResult {
        record,
        highlight_ranges,
        score,
    })
}

fn validate_fields<R>(fields: &[FieldSpec<R>]) -> Result<()> {
    if fields.is_empty() {
        return Err(SearchError::NoFields);
    }

    for field in fields {
        if field.name().is_empty() {
            return Err(SearchError::EmptyFieldName);
        }

        let weight = field.weight();
        if !weight.is_finite() || weight <= 0.0 {
            return Err(SearchError::InvalidWeight {
                field: field.name().to_owned(),
                weight,
            });
        }
    }

    if let Some(name) = fields.iter().map(FieldSpec::name).duplicates().next() {
        return Err(SearchError::DuplicateField(name.to_owned()));
    }

    Ok(())
}
