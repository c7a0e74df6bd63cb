//! Word counting for journal entries.
//!
//! # Responsibility
//! - Provide the single definition of "word" used by every write path.
//!
//! # Invariants
//! - `count_words` is pure: the same text always yields the same count.
//! - Leading/trailing whitespace never changes the result.

/// Counts whitespace-separated words in `text`.
///
/// Runs of any Unicode whitespace (spaces, tabs, newlines) count as a single
/// separator, so `"a \n\t b"` is two words and `"   "` is zero.
pub fn count_words(text: &str) -> u32 {
    let count = text.split_whitespace().count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::count_words;

    #[test]
    fn empty_and_blank_text_has_no_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   "), 0);
        assert_eq!(count_words("\n\t \r\n"), 0);
    }

    #[test]
    fn runs_of_whitespace_are_one_separator() {
        assert_eq!(count_words("one  two\n\nthree\tfour"), 4);
    }

    #[test]
    fn trimming_does_not_change_the_count() {
        let samples = ["  padded words  ", "\nline\n", "single", " a b c "];
        for sample in samples {
            assert_eq!(count_words(sample), count_words(sample.trim()));
        }
    }

    #[test]
    fn punctuation_stays_attached_to_words() {
        assert_eq!(count_words("Hello, world! It's - fine."), 5);
    }

    #[test]
    fn unicode_whitespace_separates_words() {
        assert_eq!(count_words("caf\u{e9}\u{3000}na\u{ef}ve\u{a0}word"), 3);
    }
}
