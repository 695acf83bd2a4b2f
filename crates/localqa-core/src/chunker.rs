use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::text::{split_sentences, word_count};

pub const DEFAULT_MAX_WORDS: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub max_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_words: DEFAULT_MAX_WORDS }
    }
}

/// Groups the sentences of `text` into passages of at most `max_words` words.
///
/// Passages never split a sentence: a single sentence longer than `max_words`
/// becomes its own over-long passage. Sentences inside a passage are joined
/// with single spaces.
pub fn segment(text: &str, max_words: usize) -> Vec<String> {
    let mut passages = Vec::new();
    let mut current: Vec<Cow<'_, str>> = Vec::new();
    let mut current_words = 0;
    for sentence in split_sentences(text) {
        let words = word_count(&sentence);
        if current_words + words > max_words && !current.is_empty() {
            passages.push(current.join(" "));
            current.clear();
            current_words = 0;
        }
        current_words += words;
        current.push(sentence);
    }
    if !current.is_empty() {
        passages.push(current.join(" "));
    }
    passages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::normalize;

    fn sentence_of(words: usize, tag: &str) -> String {
        let mut s = vec![tag; words].join(" ");
        s.push('.');
        s
    }

    #[test]
    fn small_text_is_one_passage() {
        assert_eq!(segment("One two three. Four five six.", 120), vec!["One two three. Four five six."]);
    }

    #[test]
    fn closes_passage_before_overflowing() {
        let text = [sentence_of(4, "a"), sentence_of(4, "b"), sentence_of(4, "c")].join(" ");
        let passages = segment(&text, 8);
        assert_eq!(passages, vec![format!("{} {}", sentence_of(4, "a"), sentence_of(4, "b")), sentence_of(4, "c")]);
    }

    #[test]
    fn exact_fit_stays_in_one_passage() {
        let text = [sentence_of(5, "a"), sentence_of(5, "b")].join(" ");
        assert_eq!(segment(&text, 10).len(), 1);
        assert_eq!(segment(&text, 9).len(), 2);
    }

    #[test]
    fn oversize_sentence_is_isolated_not_split() {
        let text = [sentence_of(3, "a"), sentence_of(20, "big"), sentence_of(3, "c")].join(" ");
        let passages = segment(&text, 10);
        assert_eq!(passages.len(), 3);
        assert_eq!(passages[1], sentence_of(20, "big"));
    }

    #[test]
    fn oversize_first_sentence_does_not_emit_empty_passage() {
        let passages = segment(&sentence_of(15, "x"), 10);
        assert_eq!(passages, vec![sentence_of(15, "x")]);
    }

    #[test]
    fn passages_respect_bound_and_lose_no_sentence() {
        let text = (0..40).map(|i| sentence_of(1 + i % 7, &format!("w{i}"))).collect::<Vec<_>>().join("\n");
        let max_words = 12;
        let passages = segment(&text, max_words);
        for p in &passages {
            assert!(!p.is_empty());
            assert!(word_count(p) <= max_words, "passage over bound: {p}");
        }
        let rejoined: Vec<String> = split_sentences(&text).map(|s| normalize(&s)).collect();
        assert_eq!(normalize(&passages.join(" ")), rejoined.join(" "));
    }

    #[test]
    fn no_sentences_no_passages() {
        assert!(segment("", 120).is_empty());
        assert!(segment("Header only", 120).is_empty());
    }
}
