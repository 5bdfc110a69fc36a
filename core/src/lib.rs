//! In-memory full-text search core.
//!
//! Pipeline: NDJSON corpus -> tokenizer -> Russian stemmer -> inverted index
//! and Zipf histogram, queried through a boolean engine with TF-IDF ranking
//! and persisted as a binary snapshot.

pub mod corpus;
pub mod engine;
pub mod index;
pub mod persist;
pub mod query;
pub mod stemmer;
pub mod strmap;
pub mod tokenizer;
pub mod zipf;

pub use corpus::Document;
pub use engine::{Engine, Metadata};
pub use index::{DocId, InvertedIndex, Posting, PostingList};
pub use query::ScoredDoc;
pub use strmap::StringMap;
pub use zipf::{TermFrequency, ZipfAnalyzer};
