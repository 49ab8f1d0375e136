use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::index::{Document, Index};
use crate::tfidf::{term_frequency, tfidf_weights};
use crate::tokenizer::tokenize;

/// Similarity floor applied by callers when the corpus does not set its own.
pub const DEFAULT_THRESHOLD: f32 = 0.12;
/// Result count used by callers that do not pass their own k.
pub const DEFAULT_TOP_K: usize = 3;

/// A document scored against one query. Borrows from the index snapshot the
/// query ran on; never outlives a single search.
#[derive(Debug, Clone, Copy)]
pub struct ScoredResult<'a> {
    pub document: &'a Document,
    pub score: f32,
}

/// An owned search hit ready for response shaping.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub question: String,
    pub answer: String,
    pub score: f32,
}

/// Cosine similarity between a sparse query vector and a document weight
/// map, clamped to [0, 1]. A zero norm on either side scores zero. Sorted
/// maps fix the accumulation order, keeping equal inputs bit-equal.
pub fn cosine_similarity(query: &BTreeMap<String, f32>, document: &BTreeMap<String, f32>) -> f32 {
    let mut dot = 0.0f32;
    let mut query_norm = 0.0f32;
    for (term, q_weight) in query {
        if let Some(d_weight) = document.get(term) {
            dot += q_weight * d_weight;
        }
        query_norm += q_weight * q_weight;
    }
    // The document norm covers the whole document, not just the overlap.
    let doc_norm: f32 = document.values().map(|w| w * w).sum();
    if query_norm == 0.0 || doc_norm == 0.0 {
        return 0.0;
    }
    (dot / (query_norm.sqrt() * doc_norm.sqrt())).clamp(0.0, 1.0)
}

/// Score every document against the query and return the k best, descending.
/// Equal scores keep corpus order (the sort is stable). A query with no
/// indexable terms yields no results.
pub fn top_k<'a>(index: &'a Index, query: &str, k: usize) -> Vec<ScoredResult<'a>> {
    let tokens = tokenize(query);
    let query_vec = tfidf_weights(&term_frequency(&tokens), &index.idf);
    if query_vec.is_empty() {
        return Vec::new();
    }
    let mut scored: Vec<ScoredResult<'a>> = index
        .docs
        .iter()
        .map(|document| ScoredResult {
            document,
            score: cosine_similarity(&query_vec, &document.weights),
        })
        .collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(k);
    scored
}

/// Top-k hits as owned question/answer/score triples, descending by score.
pub fn search(index: &Index, query: &str, k: usize) -> Vec<SearchResult> {
    top_k(index, query, k)
        .into_iter()
        .map(|hit| SearchResult {
            question: hit.document.question.clone(),
            answer: hit.document.answer.clone(),
            score: hit.score,
        })
        .collect()
}
