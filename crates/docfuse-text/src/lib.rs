//! docfuse-text
//!
//! Lexical side of the engine: pluggable segmenters and an in-memory Okapi
//! BM25 index over pre-tokenized documents.

pub mod bm25;
pub mod segment;

pub use bm25::Bm25Index;
pub use segment::{StopwordSegmenter, UnicodeSegmenter};
