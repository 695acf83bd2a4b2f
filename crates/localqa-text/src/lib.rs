//! localqa-text
//!
//! TF-IDF lexical index over passages (`index`) and the cosine-similarity
//! retriever built on top of it (`search`).

pub mod index;
pub mod search;

pub use index::{build_index, LexicalIndex, SparseVector};
pub use search::TfIdfRetriever;
