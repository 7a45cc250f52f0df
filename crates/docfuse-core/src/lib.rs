#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod records;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use types::{DocId, Document, FitState, IndexKind, RankedList, Record, SearchResult};
