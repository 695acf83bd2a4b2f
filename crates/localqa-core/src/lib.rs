//! localqa-core
//!
//! Domain types, text primitives (normalization, sentence splitting, passage
//! segmentation), the in-memory document store, document loading and
//! configuration shared by the index, answer and CLI crates.

#![deny(unused_imports)]
#![deny(unused_variables)]

pub mod chunker;
pub mod config;
pub mod error;
pub mod loader;
pub mod samples;
pub mod store;
pub mod text;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use store::DocumentStore;
pub use types::{Answer, AnswerKind, AnswerTrace, Candidate, Document, HitTrace, Passage, SearchHit};
