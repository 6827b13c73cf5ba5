//! Helpers for turning match positions into highlight ranges and back into text.

use super::HighlightRange;

/// Converts char indices of `text` into byte ranges, merging adjacent chars
/// into a single range. Indices must be sorted; duplicates and indices past
/// the end of the text are ignored.
pub fn ranges_from_char_indices(text: &str, indices: &[usize]) -> Vec<HighlightRange> {
    let mut ranges: Vec<HighlightRange> = Vec::new();
    let mut wanted = indices.iter().copied().peekable();

    for (char_idx, (byte_idx, ch)) in text.char_indices().enumerate() {
        while wanted.next_if(|&idx| idx < char_idx).is_some() {}

        if wanted.next_if_eq(&char_idx).is_none() {
            continue;
        }

        match ranges.last_mut() {
            Some(last) if last.end() == byte_idx => last.length += ch.len_utf8(),
            _ => ranges.push(HighlightRange::new(byte_idx, ch.len_utf8())),
        }
    }

    ranges
}

/// Renders `text` with every range wrapped in `open` and `close`.
///
/// Ranges that overlap a previous one or do not fall on char boundaries
/// are skipped.
pub fn render(text: &str, ranges: &[HighlightRange], open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len() + ranges.len() * (open.len() + close.len()));
    let mut cursor = 0;

    for range in ranges {
        if range.start < cursor {
            continue;
        }

        let (Some(before), Some(matched)) = (
            text.get(cursor..range.start),
            text.get(range.start..range.end()),
        ) else {
            continue;
        };

        out.push_str(before);
        out.push_str(open);
        out.push_str(matched);
        out.push_str(close);
        cursor = range.end();
    }

    out.push_str(&text[cursor..]);
    out
}
