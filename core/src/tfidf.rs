use std::collections::{BTreeMap, HashMap, HashSet};

/// Normalized term frequency: each term's count divided by the total token
/// count, so the values of a non-empty map sum to 1.0.
pub fn term_frequency(tokens: &[String]) -> HashMap<String, f32> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    let total = tokens.len() as f32;
    counts
        .into_iter()
        .map(|(term, count)| (term, count as f32 / total))
        .collect()
}

/// Smoothed inverse document frequency over per-document token sequences.
/// Document frequency counts membership, not occurrences, and the smoothing
/// `ln((N + 1) / (df + 1)) + 1` keeps every indexed term strictly positive.
pub fn inverse_document_frequency(corpus_tokens: &[Vec<String>]) -> HashMap<String, f32> {
    let mut df: HashMap<&str, u32> = HashMap::new();
    for tokens in corpus_tokens {
        let distinct: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        for term in distinct {
            *df.entry(term).or_insert(0) += 1;
        }
    }
    let n = corpus_tokens.len() as f32;
    df.into_iter()
        .map(|(term, count)| {
            (term.to_string(), ((n + 1.0) / (count as f32 + 1.0)).ln() + 1.0)
        })
        .collect()
}

/// Sparse tf-idf weights. Terms missing from the idf table weigh zero and
/// are omitted, which is how query terms unseen at build time drop out.
/// The map is sorted so downstream score sums have one canonical order;
/// f32 addition is not associative.
pub fn tfidf_weights(
    tf: &HashMap<String, f32>,
    idf: &HashMap<String, f32>,
) -> BTreeMap<String, f32> {
    tf.iter()
        .filter_map(|(term, freq)| {
            let weight = freq * idf.get(term).copied().unwrap_or(0.0);
            (weight > 0.0).then(|| (term.clone(), weight))
        })
        .collect()
}
