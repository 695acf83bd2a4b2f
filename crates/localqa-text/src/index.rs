//! TF-IDF vector space over normalized passage texts.
//!
//! [`build_index`] fits the vocabulary and passage vectors once and returns an
//! immutable [`LexicalIndex`]. Queries are projected with
//! [`LexicalIndex::transform`]; terms outside the fitted vocabulary are ignored.

use std::collections::{BTreeMap, HashMap};

pub type TermId = usize;

/// Splits normalized text into index terms: maximal runs of alphanumerics or
/// `_`, keeping only terms of two characters or more.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_')).filter(|t| t.chars().nth(1).is_some())
}

/// Sparse weight vector: `(term, weight)` pairs sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(TermId, f32)>,
}

impl SparseVector {
    /// Weights raw term counts by `idf` and L2-normalizes the result.
    fn weighted(counts: BTreeMap<TermId, u32>, idf: &[f32]) -> Self {
        let mut entries: Vec<(TermId, f32)> =
            counts.into_iter().map(|(term, tf)| (term, tf as f32 * idf[term])).collect();
        let norm = entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[(TermId, f32)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|(_, w)| *w == 0.0)
    }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0f32);
        while i < self.entries.len() && j < other.entries.len() {
            let (a, wa) = self.entries[i];
            let (b, wb) = other.entries[j];
            match a.cmp(&b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Cosine similarity; 0 when either side is the zero vector.
    pub fn cosine(&self, other: &SparseVector) -> f32 {
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return 0.0;
        }
        self.dot(other) / denom
    }
}

/// Fitted vocabulary, idf weights and one vector per passage, in passage order.
#[derive(Debug, Clone, Default)]
pub struct LexicalIndex {
    vocabulary: BTreeMap<String, TermId>,
    idf: Vec<f32>,
    vectors: Vec<SparseVector>,
}

/// Fits a TF-IDF index over `texts` (already normalized).
///
/// Term ids follow lexicographic term order and idf is smoothed as
/// `ln((1 + n) / (1 + df)) + 1`, so fitting the same texts in the same order
/// always yields the same index.
pub fn build_index<S: AsRef<str>>(texts: &[S]) -> LexicalIndex {
    let term_counts: Vec<HashMap<&str, u32>> = texts
        .iter()
        .map(|text| {
            let mut counts = HashMap::new();
            for term in tokenize(text.as_ref()) {
                *counts.entry(term).or_insert(0) += 1;
            }
            counts
        })
        .collect();

    let mut document_frequency: BTreeMap<&str, u32> = BTreeMap::new();
    for counts in &term_counts {
        for term in counts.keys() {
            *document_frequency.entry(*term).or_insert(0) += 1;
        }
    }

    let n = texts.len() as f64;
    let mut vocabulary = BTreeMap::new();
    let mut idf = Vec::with_capacity(document_frequency.len());
    for (id, (term, df)) in document_frequency.into_iter().enumerate() {
        vocabulary.insert(term.to_string(), id);
        idf.push((((1.0 + n) / (1.0 + f64::from(df))).ln() + 1.0) as f32);
    }

    let vectors = term_counts
        .into_iter()
        .map(|counts| {
            let ids: BTreeMap<TermId, u32> = counts.into_iter().map(|(term, tf)| (vocabulary[term], tf)).collect();
            SparseVector::weighted(ids, &idf)
        })
        .collect();

    LexicalIndex { vocabulary, idf, vectors }
}

impl LexicalIndex {
    /// Projects normalized text into the fitted space. Unknown terms get zero weight.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();
        for term in tokenize(text) {
            if let Some(&id) = self.vocabulary.get(term) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        SparseVector::weighted(counts, &self.idf)
    }

    /// Number of indexed passages.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.term_id(term).map(|id| self.idf[id])
    }

    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    /// Cosine similarity of `query` against every passage, in passage order.
    pub fn similarities(&self, query: &SparseVector) -> Vec<f32> {
        self.vectors.iter().map(|v| query.cosine(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<&'static str> {
        vec![
            "the blender has a two year warranty",
            "the grill has a one year warranty",
            "the handbook lists paid leave",
        ]
    }

    #[test]
    fn tokenize_drops_single_characters() {
        let terms: Vec<&str> = tokenize("a 2year warranty x_y i 3000 °f").collect();
        assert_eq!(terms, vec!["2year", "warranty", "x_y", "3000"]);
    }

    #[test]
    fn vocabulary_is_sorted_and_complete() {
        let index = build_index(&corpus());
        assert_eq!(index.len(), 3);
        assert_eq!(index.term_id("blender"), Some(0));
        assert!(index.term_id("a").is_none());
        let ids: Vec<TermId> = ["blender", "grill", "handbook", "has"].iter().filter_map(|t| index.term_id(t)).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn rare_terms_outweigh_common_ones() {
        let index = build_index(&corpus());
        let common = index.idf("the").expect("the");
        let shared = index.idf("warranty").expect("warranty");
        let rare = index.idf("blender").expect("blender");
        assert!(rare > shared && shared > common);
        // term present everywhere keeps weight 1 with smoothing
        assert!((common - 1.0).abs() < 1e-6);
    }

    #[test]
    fn passage_vectors_are_unit_length() {
        let index = build_index(&corpus());
        for v in index.vectors() {
            assert!((v.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn unseen_terms_are_ignored() {
        let index = build_index(&corpus());
        let before = index.vocabulary_len();
        let v = index.transform("zeppelin blender");
        assert_eq!(v.entries().len(), 1);
        assert_eq!(index.vocabulary_len(), before);
        assert!(index.transform("zeppelin").is_zero());
    }

    #[test]
    fn zero_vectors_have_zero_similarity() {
        let index = build_index(&corpus());
        let zero = index.transform("");
        assert!(zero.is_zero());
        assert!(index.similarities(&zero).iter().all(|s| *s == 0.0));
        assert_eq!(zero.cosine(&zero), 0.0);
    }

    #[test]
    fn identical_text_has_similarity_one() {
        let index = build_index(&corpus());
        let q = index.transform(corpus()[0]);
        let sims = index.similarities(&q);
        assert!((sims[0] - 1.0).abs() < 1e-5);
        assert!(sims[0] > sims[1] && sims[1] > sims[2]);
    }

    #[test]
    fn fitting_is_deterministic() {
        let a = build_index(&corpus());
        let b = build_index(&corpus());
        assert_eq!(a.vectors(), b.vectors());
        assert_eq!(a.vocabulary_len(), b.vocabulary_len());
    }

    #[test]
    fn empty_corpus_builds_empty_index() {
        let index = build_index::<&str>(&[]);
        assert!(index.is_empty());
        assert_eq!(index.vocabulary_len(), 0);
        assert!(index.similarities(&index.transform("anything")).is_empty());
    }
}
