use std::collections::{BTreeMap, HashMap};

use crate::corpus::Knowledge;
use crate::tfidf::{inverse_document_frequency, term_frequency, tfidf_weights};
use crate::tokenizer::tokenize;

/// One indexed question/answer record. Immutable once built; owned by its
/// [`Index`] and discarded wholesale with it on rebuild.
#[derive(Debug, Clone)]
pub struct Document {
    pub question: String,
    pub answer: String,
    pub tokens: Vec<String>,
    /// Sparse tf-idf map; every stored key occurs in this document.
    /// Sorted, so rebuilds of the same corpus score bit-identically.
    pub weights: BTreeMap<String, f32>,
}

/// A fully built search index: documents in corpus order plus the idf table
/// derived from exactly those documents.
#[derive(Debug, Clone, Default)]
pub struct Index {
    pub docs: Vec<Document>,
    pub idf: HashMap<String, f32>,
    /// Per-corpus similarity floor, applied by callers on top of ranking.
    pub threshold: Option<f32>,
}

impl Index {
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Build an index from a corpus. Each record is indexed over its question
/// and answer joined by a newline. Deterministic: the same records always
/// produce an index that ranks identically.
pub fn build_index(kb: &Knowledge) -> Index {
    let corpus_tokens: Vec<Vec<String>> = kb
        .items
        .iter()
        .map(|entry| tokenize(&format!("{}\n{}", entry.question, entry.answer)))
        .collect();
    let idf = inverse_document_frequency(&corpus_tokens);

    let docs = kb
        .items
        .iter()
        .zip(corpus_tokens)
        .map(|(entry, tokens)| {
            let tf = term_frequency(&tokens);
            let weights = tfidf_weights(&tf, &idf);
            Document {
                question: entry.question.clone(),
                answer: entry.answer.clone(),
                tokens,
                weights,
            }
        })
        .collect();

    Index { docs, idf, threshold: kb.threshold }
}
