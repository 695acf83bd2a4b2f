//! Domain types used by the index, the retriever and the answer extractor.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type DocumentName = String;
pub type PassageId = String;

/// A named source text, as handed to the engine by whoever discovered it.
///
/// `name` must be unique within one [`DocumentStore`](crate::DocumentStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: DocumentName,
    pub content: String,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self { name: name.into(), content: content.into() }
    }
}

/// A sentence-aligned chunk of a document; the unit of retrieval.
///
/// - `id`: `"<source>_passage_<index>"`, unique across the store
/// - `source`: name of the parent [`Document`]
/// - `index`: position within the parent document
/// - `text`: the passage payload, never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub id: PassageId,
    pub source: DocumentName,
    pub index: usize,
    pub text: String,
}

impl Passage {
    pub fn new(source: &str, index: usize, text: String) -> Self {
        Self { id: format!("{source}_passage_{index}"), source: source.to_string(), index, text }
    }
}

/// A passage ranked against a query.
///
/// `score` is the cosine similarity between query and passage vectors. It
/// lies in `[0, 1]` for TF-IDF vectors; higher is always better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a> {
    pub passage: &'a Passage,
    pub score: f32,
}

/// A sentence scored for direct answer suitability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub sentence: String,
    pub relevance: i32,
    pub source: DocumentName,
    pub passage_score: f32,
}

/// Which path of the extractor produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// Best-scoring candidate sentence.
    Extracted,
    /// No sentence scored positively; first sentence of the top passage.
    Fallback,
    /// Nothing retrieved above the confidence floor.
    LowConfidence,
}

/// Per-hit line of the debug trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitTrace {
    pub id: PassageId,
    pub source: DocumentName,
    pub score: f32,
    pub preview: String,
}

/// Intermediate retrieval and scoring state, attached when debugging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerTrace {
    pub normalized_query: String,
    pub hits: Vec<HitTrace>,
    pub keywords: Vec<String>,
    /// Best first.
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub sources: BTreeSet<DocumentName>,
    pub kind: AnswerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<AnswerTrace>,
}

impl Answer {
    pub fn is_low_confidence(&self) -> bool {
        self.kind == AnswerKind::LowConfidence
    }
}
