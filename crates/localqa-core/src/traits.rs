use crate::types::SearchHit;

pub trait Retriever: Send + Sync {
    /// Ranks indexed passages against `query`, best first, at most `k` hits.
    /// Ties keep passage order.
    fn retrieve(&self, query: &str, k: usize) -> Vec<SearchHit<'_>>;

    /// Number of indexed passages.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
