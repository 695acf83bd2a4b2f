//! Text primitives: normalization and sentence splitting.
//!
//! Sentence boundaries are found with a small explicit state machine rather
//! than a pattern: a boundary is a run of whitespace that directly follows a
//! terminator (`.`, `!`, `?`). The terminator stays with the sentence it ends.

use std::borrow::Cow;

/// Fragments lacking a terminator survive only when they have more words than this.
pub const MIN_UNTERMINATED_WORDS: usize = 5;

pub fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Punctuation removed by [`normalize`]: the ASCII punctuation set.
pub fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lowercases, strips punctuation and collapses whitespace runs to single spaces.
pub fn normalize(text: &str) -> String {
    let stripped: String = text.to_lowercase().chars().filter(|c| !is_punctuation(*c)).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Appends a `.` when `sentence` does not already end with a terminator.
pub fn ensure_terminated(sentence: &str) -> Cow<'_, str> {
    if sentence.ends_with(is_terminator) {
        Cow::Borrowed(sentence)
    } else {
        Cow::Owned(format!("{sentence}."))
    }
}

/// Splits `text` into sentences, lazily and in source order.
///
/// Each raw fragment is trimmed and kept only if it ends with a terminator or
/// has more than [`MIN_UNTERMINATED_WORDS`] words; kept fragments without a
/// terminator get a `.` appended. The iterator is `Clone`, so a copy taken
/// before consumption restarts from the beginning.
pub fn split_sentences(text: &str) -> Sentences<'_> {
    Sentences { rest: text }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Text,
    Terminator,
}

#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    rest: &'a str,
}

impl<'a> Sentences<'a> {
    fn next_fragment(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let mut state = Scan::Text;
        for (i, c) in self.rest.char_indices() {
            state = match state {
                Scan::Terminator if c.is_whitespace() => {
                    let fragment = &self.rest[..i];
                    self.rest = self.rest[i..].trim_start();
                    return Some(fragment);
                }
                _ if is_terminator(c) => Scan::Terminator,
                _ => Scan::Text,
            };
        }
        let fragment = self.rest;
        self.rest = "";
        Some(fragment)
    }
}

impl<'a> Iterator for Sentences<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(fragment) = self.next_fragment() {
            let fragment = fragment.trim();
            if fragment.is_empty() {
                continue;
            }
            if fragment.ends_with(is_terminator) || word_count(fragment) > MIN_UNTERMINATED_WORDS {
                return Some(ensure_terminated(fragment));
            }
        }
        None
    }
}
