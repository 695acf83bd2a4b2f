//! In-memory document store: ingested documents plus their derived passages.

use std::collections::HashSet;

use tracing::debug;

use crate::chunker::{segment, ChunkingConfig};
use crate::error::{Error, Result};
use crate::types::{Document, Passage};

/// Owns every ingested [`Document`] and the passages segmented from them.
///
/// Passages are stored in ingestion order, and within one document in source
/// order. The lexical index relies on this order staying stable.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    chunking: ChunkingConfig,
    documents: Vec<Document>,
    passages: Vec<Passage>,
    names: HashSet<String>,
}

impl DocumentStore {
    pub fn new(chunking: ChunkingConfig) -> Self {
        Self { chunking, ..Self::default() }
    }

    pub fn chunking(&self) -> ChunkingConfig {
        self.chunking
    }

    /// Segments `document` into passages and stores both. Returns the number
    /// of passages created, which is zero for content without sentences.
    pub fn add(&mut self, document: Document) -> Result<usize> {
        if !self.names.insert(document.name.clone()) {
            return Err(Error::DuplicateDocument(document.name));
        }
        let before = self.passages.len();
        for (index, text) in segment(&document.content, self.chunking.max_words).into_iter().enumerate() {
            self.passages.push(Passage::new(&document.name, index, text));
        }
        let created = self.passages.len() - before;
        debug!(document = %document.name, passages = created, "segmented document");
        self.documents.push(document);
        Ok(created)
    }

    pub fn extend<I>(&mut self, documents: I) -> Result<usize>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut created = 0;
        for document in documents {
            created += self.add(document)?;
        }
        Ok(created)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    pub fn document(&self, name: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.name == name)
    }

    pub fn passages_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Passage> + 'a {
        self.passages.iter().filter(move |p| p.source == name)
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
