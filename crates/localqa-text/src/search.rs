use tracing::{debug, info};

use localqa_core::text::normalize;
use localqa_core::traits::Retriever;
use localqa_core::types::{Passage, SearchHit};

use crate::index::{build_index, LexicalIndex};

/// Immutable snapshot pairing passages with the index fitted over them.
///
/// Passage `i` always corresponds to index vector `i`; both are built together
/// and never mutated, so the snapshot can be shared freely once built.
#[derive(Debug, Clone)]
pub struct TfIdfRetriever {
    passages: Vec<Passage>,
    index: LexicalIndex,
}

impl TfIdfRetriever {
    pub fn build(passages: Vec<Passage>) -> Self {
        let normalized: Vec<String> = passages.iter().map(|p| normalize(&p.text)).collect();
        let index = build_index(&normalized);
        info!(passages = index.len(), vocabulary = index.vocabulary_len(), "indexed passages");
        Self { passages, index }
    }

    pub fn index(&self) -> &LexicalIndex {
        &self.index
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    /// Cosine similarity of `query` against every passage, in passage order.
    pub fn scores(&self, query: &str) -> Vec<f32> {
        let normalized = normalize(query);
        let query_vector = self.index.transform(&normalized);
        if query_vector.is_zero() {
            debug!(query, "query has no indexed terms");
        }
        self.index.similarities(&query_vector)
    }
}

/// Positions of the `k` highest scores, best first; equal scores keep the
/// lower position first.
pub fn top_k(scores: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(k);
    ranked
}

impl Retriever for TfIdfRetriever {
    fn retrieve(&self, query: &str, k: usize) -> Vec<SearchHit<'_>> {
        if k == 0 || self.passages.is_empty() {
            return Vec::new();
        }
        let hits: Vec<SearchHit<'_>> = top_k(&self.scores(query), k)
            .into_iter()
            .map(|(i, score)| SearchHit { passage: &self.passages[i], score })
            .collect();
        for (rank, hit) in hits.iter().enumerate() {
            debug!(rank = rank + 1, score = hit.score, id = %hit.passage.id, source = %hit.passage.source, "retrieved passage");
        }
        hits
    }

    fn len(&self) -> usize {
        self.passages.len()
    }
}
