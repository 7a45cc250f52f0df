//! docfuse-hybrid
//!
//! Corpus generations, Reciprocal Rank Fusion and the retrieval orchestrator,
//! with an ephemeral and a store-backed front end.

pub mod engine;
pub mod fusion;
pub mod generation;
pub mod memory;
pub mod source;
pub mod store;
pub mod store_backed;

pub use engine::HybridSearcher;
pub use fusion::{fuse, fuse_scored, DEFAULT_RRF_K};
pub use generation::Generation;
pub use memory::InMemoryIndex;
pub use source::{filter_window, parse_timestamp, FileRecordSource, VecRecordSource};
pub use store::DocumentStore;
pub use store_backed::StoreBackedIndex;
