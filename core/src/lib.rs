//! Lexical search core for the knowledge-base chat server: tokenization,
//! tf-idf weighting, cosine ranking, and an atomically swappable index.

pub mod corpus;
pub mod index;
pub mod search;
pub mod shared;
pub mod tfidf;
pub mod tokenizer;

pub use corpus::{CorpusError, CorpusSource, JsonFileSource, Knowledge, KnowledgeEntry};
pub use index::{build_index, Document, Index};
pub use search::{
    cosine_similarity, search, top_k, ScoredResult, SearchResult, DEFAULT_THRESHOLD,
    DEFAULT_TOP_K,
};
pub use shared::SharedIndex;
pub use tokenizer::tokenize;
