//! Heuristic sentence-level answer extraction over retrieved passages.

use std::borrow::Cow;
use std::collections::BTreeSet;

use tracing::debug;

use localqa_core::text::{ensure_terminated, is_punctuation, split_sentences, word_count};
use localqa_core::types::{Answer, AnswerKind, Candidate, SearchHit};

/// Minimum top retrieval score required before an answer is attempted.
pub const CONFIDENCE_FLOOR: f32 = 0.01;

pub const NO_ANSWER: &str = "I couldn't find relevant information to answer this question.";

/// Interrogative and function words that never count as keywords.
pub const STOP_WORDS: [&str; 20] = [
    "what", "is", "the", "how", "do", "i", "does", "have", "for", "many", "long", "to", "a", "an", "are", "get", "can",
    "my", "schedule", "take",
];

/// Weights of the sentence relevance heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    /// Per keyword found in the sentence.
    pub keyword_match: i32,
    /// Per query word longer than `long_word_min_chars` found in the sentence.
    pub long_word_match: i32,
    pub long_word_min_chars: usize,
    /// Subtracted when the sentence has more than `long_sentence_words` words.
    pub long_sentence_penalty: i32,
    pub long_sentence_words: usize,
    /// Added when the sentence contains an ASCII digit.
    pub digit_bonus: i32,
    /// Sentences with fewer words are never candidates.
    pub min_sentence_words: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            keyword_match: 2,
            long_word_match: 1,
            long_word_min_chars: 3,
            long_sentence_penalty: 2,
            long_sentence_words: 50,
            digit_bonus: 1,
            min_sentence_words: 5,
        }
    }
}

/// Query words minus stop words: lowercased, outer punctuation stripped, empties dropped.
pub fn extract_keywords(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(is_punctuation))
        .filter(|w| !w.is_empty() && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Scores one sentence against the query.
///
/// A keyword that is also a long query word is rewarded twice, once per rule.
pub fn score_sentence(sentence: &str, keywords: &[String], query_lower: &str, weights: &ScoringWeights) -> i32 {
    let sentence_lower = sentence.to_lowercase();
    let mut score = 0;
    for keyword in keywords {
        if sentence_lower.contains(keyword.as_str()) {
            score += weights.keyword_match;
        }
    }
    for word in query_lower.split_whitespace() {
        if word.chars().count() > weights.long_word_min_chars && sentence_lower.contains(word) {
            score += weights.long_word_match;
        }
    }
    if word_count(sentence) > weights.long_sentence_words {
        score -= weights.long_sentence_penalty;
    }
    if sentence.chars().any(|c| c.is_ascii_digit()) {
        score += weights.digit_bonus;
    }
    score
}

/// Everything the extractor decided, for callers that want the trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub answer: Answer,
    pub keywords: Vec<String>,
    /// Positively scored sentences, best first.
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerExtractor {
    weights: ScoringWeights,
    confidence_floor: f32,
}

impl Default for AnswerExtractor {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

impl AnswerExtractor {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights, confidence_floor: CONFIDENCE_FLOOR }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn extract(&self, query: &str, hits: &[SearchHit<'_>]) -> Extraction {
        let Some(top) = hits.first().filter(|h| h.score >= self.confidence_floor) else {
            debug!(hits = hits.len(), "no hit above confidence floor");
            return Extraction { answer: no_answer(), keywords: Vec::new(), candidates: Vec::new() };
        };

        let keywords = extract_keywords(query);
        let query_lower = query.to_lowercase();
        debug!(?keywords, "extracted keywords");

        let mut candidates = Vec::new();
        for hit in hits {
            for sentence in split_sentences(&hit.passage.text) {
                if word_count(&sentence) < self.weights.min_sentence_words {
                    continue;
                }
                let relevance = score_sentence(&sentence, &keywords, &query_lower, &self.weights);
                if relevance > 0 {
                    candidates.push(Candidate {
                        sentence: sentence.into_owned(),
                        relevance,
                        source: hit.passage.source.clone(),
                        passage_score: hit.score,
                    });
                }
            }
        }
        // stable: earlier candidates win full ties
        candidates.sort_by(|a, b| b.relevance.cmp(&a.relevance).then(b.passage_score.total_cmp(&a.passage_score)));
        debug!(candidates = candidates.len(), "scored candidate sentences");

        let (sentence, source, kind) = match candidates.first() {
            Some(best) => (Cow::Borrowed(best.sentence.as_str()), best.source.clone(), AnswerKind::Extracted),
            None => {
                let first = split_sentences(&top.passage.text).next().unwrap_or(Cow::Borrowed(top.passage.text.as_str()));
                (first, top.passage.source.clone(), AnswerKind::Fallback)
            }
        };
        let text = ensure_terminated(sentence.trim()).into_owned();
        let answer = Answer { text, sources: BTreeSet::from([source]), kind, trace: None };
        Extraction { answer, keywords, candidates }
    }
}

fn no_answer() -> Answer {
    Answer { text: NO_ANSWER.to_string(), sources: BTreeSet::new(), kind: AnswerKind::LowConfidence, trace: None }
}
