//! localqa-answer
//!
//! Question answering facade: ingests documents into a [`DocumentStore`],
//! fits the TF-IDF retriever over their passages and extracts a single answer
//! sentence per query.

pub mod extractor;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use localqa_core::chunker::ChunkingConfig;
use localqa_core::config::Settings;
use localqa_core::error::{Error, Result};
use localqa_core::text::normalize;
use localqa_core::traits::Retriever;
use localqa_core::types::{Answer, AnswerTrace, Document, HitTrace, SearchHit};
use localqa_core::DocumentStore;
use localqa_text::TfIdfRetriever;

pub use extractor::{AnswerExtractor, Extraction, ScoringWeights, CONFIDENCE_FLOOR, NO_ANSWER};

const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub documents: usize,
    pub passages: usize,
    pub vocabulary: usize,
}

/// Build-then-query engine.
///
/// Documents are ingested first; [`QaEngine::build_index`] then fits a fresh
/// retriever snapshot over every stored passage. Ingesting again drops the
/// snapshot, so queries fail with [`Error::IndexNotBuilt`] until the index is
/// rebuilt.
#[derive(Debug, Clone, Default)]
pub struct QaEngine {
    store: DocumentStore,
    retriever: Option<TfIdfRetriever>,
    extractor: AnswerExtractor,
}

impl QaEngine {
    pub fn new(chunking: ChunkingConfig) -> Self {
        Self { store: DocumentStore::new(chunking), retriever: None, extractor: AnswerExtractor::default() }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.chunking())
    }

    pub fn with_extractor(mut self, extractor: AnswerExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Ingests `documents` and builds the index in one step.
    pub fn with_documents<I>(chunking: ChunkingConfig, documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut engine = Self::new(chunking);
        engine.ingest(documents)?;
        engine.build_index();
        Ok(engine)
    }

    /// Adds documents to the store. Returns the number of passages created.
    pub fn ingest<I>(&mut self, documents: I) -> Result<usize>
    where
        I: IntoIterator<Item = Document>,
    {
        if self.retriever.take().is_some() {
            debug!("dropped stale index before ingest");
        }
        let created = self.store.extend(documents)?;
        info!(documents = self.store.documents().len(), passages = self.store.passages().len(), "ingested documents");
        Ok(created)
    }

    /// Fits a new index over all stored passages and swaps it in.
    pub fn build_index(&mut self) -> IndexStats {
        if self.store.passages().is_empty() {
            warn!("no passages to index; every query will return the low-confidence answer");
        }
        let retriever = TfIdfRetriever::build(self.store.passages().to_vec());
        let stats = IndexStats {
            documents: self.store.documents().len(),
            passages: retriever.len(),
            vocabulary: retriever.index().vocabulary_len(),
        };
        self.retriever = Some(retriever);
        stats
    }

    pub fn is_indexed(&self) -> bool {
        self.retriever.is_some()
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn retriever(&self) -> Result<&TfIdfRetriever> {
        self.retriever.as_ref().ok_or(Error::IndexNotBuilt)
    }

    pub fn retrieve(&self, query: &str, k: usize) -> Result<Vec<SearchHit<'_>>> {
        Ok(self.retriever()?.retrieve(query, k))
    }

    /// Answers `query` from the top `k` passages. With `debug` set the answer
    /// carries an [`AnswerTrace`] of the retrieval and scoring steps.
    pub fn answer(&self, query: &str, k: usize, debug: bool) -> Result<Answer> {
        let hits = self.retrieve(query, k)?;
        let Extraction { mut answer, keywords, candidates } = self.extractor.extract(query, &hits);
        debug!(query, kind = ?answer.kind, sources = ?answer.sources, "answered query");
        if debug {
            answer.trace = Some(AnswerTrace {
                normalized_query: normalize(query),
                hits: hits.iter().map(hit_trace).collect(),
                keywords,
                candidates,
            });
        }
        Ok(answer)
    }
}

fn hit_trace(hit: &SearchHit<'_>) -> HitTrace {
    HitTrace {
        id: hit.passage.id.clone(),
        source: hit.passage.source.clone(),
        score: hit.score,
        preview: hit.passage.text.chars().take(PREVIEW_CHARS).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn querying_before_build_fails_loudly() {
        let mut engine = QaEngine::default();
        engine.ingest([Document::new("a.txt", "The warranty lasts for two years.")]).expect("ingest");
        assert!(matches!(engine.answer("warranty", 3, false), Err(Error::IndexNotBuilt)));
        assert!(matches!(engine.retrieve("warranty", 3), Err(Error::IndexNotBuilt)));
    }

    #[test]
    fn ingest_invalidates_and_rebuild_restores() {
        let mut engine = QaEngine::with_documents(ChunkingConfig::default(), [Document::new("a.txt", "Alpha facts are here.")])
            .expect("engine");
        assert!(engine.is_indexed());
        engine.ingest([Document::new("b.txt", "The warranty lasts for two years.")]).expect("ingest");
        assert!(!engine.is_indexed());
        let stats = engine.build_index();
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.passages, 2);
        let answer = engine.answer("warranty length", 3, false).expect("answer");
        assert!(answer.sources.contains("b.txt"));
    }

    #[test]
    fn failed_ingest_still_drops_the_index() {
        let mut engine = QaEngine::with_documents(ChunkingConfig::default(), [Document::new("a.txt", "Alpha facts are here.")])
            .expect("engine");
        let result = engine.ingest([
            Document::new("b.txt", "The warranty lasts for two years."),
            Document::new("a.txt", "Duplicate name."),
        ]);
        assert!(matches!(result, Err(Error::DuplicateDocument(name)) if name == "a.txt"));
        assert_eq!(engine.store().documents().len(), 2);
        assert!(!engine.is_indexed());
        assert!(matches!(engine.answer("warranty", 3, false), Err(Error::IndexNotBuilt)));

        engine.build_index();
        let answer = engine.answer("How long is the warranty?", 3, false).expect("answer");
        assert!(answer.sources.contains("b.txt"));
    }

    #[test]
    fn custom_weights_change_the_chosen_sentence() {
        let docs = [Document::new(
            "a.txt",
            "The warranty covers the motor and blades. The warranty lasts for 2 years from purchase.",
        )];
        let default = QaEngine::with_documents(ChunkingConfig::default(), docs.clone()).expect("engine");
        let answer = default.answer("warranty", 3, false).expect("answer");
        assert_eq!(answer.text, "The warranty lasts for 2 years from purchase.");

        let weights = ScoringWeights { digit_bonus: -5, ..ScoringWeights::default() };
        let engine = QaEngine::with_documents(ChunkingConfig::default(), docs)
            .expect("engine")
            .with_extractor(AnswerExtractor::new(weights));
        let answer = engine.answer("warranty", 3, false).expect("answer");
        assert_eq!(answer.text, "The warranty covers the motor and blades.");
    }

    #[test]
    fn trace_only_when_debugging() {
        let engine = QaEngine::with_documents(ChunkingConfig::default(), [Document::new("a.txt", "The warranty lasts for 2 years.")])
            .expect("engine");
        assert!(engine.answer("What is the warranty?", 3, false).expect("answer").trace.is_none());
        let trace = engine.answer("What is the warranty?", 3, true).expect("answer").trace.expect("trace");
        assert_eq!(trace.normalized_query, "what is the warranty");
        assert_eq!(trace.hits.len(), 1);
        assert_eq!(trace.hits[0].id, "a.txt_passage_0");
        assert_eq!(trace.keywords, vec!["warranty"]);
        assert_eq!(trace.candidates.len(), 1);
    }
}
