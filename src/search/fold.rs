//! Char-for-char case folding.
//!
//! Every char maps to exactly one folded char, so char positions in folded
//! text are positions in the original text.

/// The first char of the lowercase form of `ch`.
pub(crate) fn fold_char(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

pub(crate) fn fold_str(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_beyond_ascii() {
        assert_eq!(fold_str("CAFÉ ÜBER"), "café über");
        assert_eq!(fold_str("ΣΟΦΙΑ"), "σοφια");
    }

    #[test]
    fn keeps_one_char_per_char() {
        // 'İ' lowercases to "i\u{307}", only the first char is kept
        let text = "İstanbul";
        assert_eq!(fold_str(text).chars().count(), text.chars().count());
        assert_eq!(fold_char('İ'), 'i');
    }
}
