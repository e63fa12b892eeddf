//! Shingle creation and text normalization.
//!
//! Produces the set of shingles (word n-grams) over which MinHash signatures
//! are computed. Normalization keeps hyphens: the corpus is markdown with
//! YAML frontmatter, where hyphens carry structural meaning (keys, dashed
//! slugs), and stripping them previously produced empty shingle sets for
//! code-heavy documents and widespread false negatives.

use std::collections::BTreeSet;

/// Shingle generator for creating word n-grams from document text.
#[derive(Debug, Clone)]
pub struct ShingleGenerator {
    /// Shingle size (number of words per shingle)
    shingle_size: usize,
}

impl ShingleGenerator {
    /// Create a new shingle generator with the given shingle size.
    pub fn new(shingle_size: usize) -> Self {
        Self { shingle_size }
    }

    /// Create the shingle set for a document.
    ///
    /// Guaranteed non-empty for any non-empty input: word shingles when the
    /// text has at least `shingle_size` words, then individual words, then
    /// character shingles over the normalized text, then the normalized text
    /// itself.
    pub fn shingles(&self, text: &str) -> BTreeSet<String> {
        if text.is_empty() {
            return BTreeSet::new();
        }

        let normalized = normalize_text(text);
        let words: Vec<&str> = normalized.split_whitespace().collect();

        if words.len() >= self.shingle_size {
            return words
                .windows(self.shingle_size)
                .map(|window| window.join(" "))
                .collect();
        }

        if !words.is_empty() {
            return words.iter().map(|word| (*word).to_string()).collect();
        }

        let chars: Vec<char> = normalized.chars().collect();
        if chars.len() >= self.shingle_size {
            return chars
                .windows(self.shingle_size)
                .map(|window| window.iter().collect())
                .collect();
        }

        let mut singleton = BTreeSet::new();
        singleton.insert(normalized);
        singleton
    }

    /// The configured shingle size.
    pub fn shingle_size(&self) -> usize {
        self.shingle_size
    }
}

/// Normalize document text for shingling.
///
/// Lowercases, collapses whitespace runs to single spaces, and strips every
/// character that is not ASCII alphanumeric, whitespace, or `-`.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut normalized = String::with_capacity(lowered.len());

    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !normalized.ends_with(' ') && !normalized.is_empty() {
                normalized.push(' ');
            }
        } else if ch.is_ascii_alphanumeric() || ch == '-' {
            normalized.push(ch);
        }
    }

    while normalized.ends_with(' ') {
        normalized.pop();
    }

    normalized
}

/// Count whitespace-delimited words in a document.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
