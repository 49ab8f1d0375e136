use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref TERM: Regex = Regex::new(r"[a-z0-9]+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","an","and","are","as","at","be","by","for","from",
            "has","he","in","is","it","its","of","on","that","the",
            "to","was","were","will","with","you","your","i","we","our","us",
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Tokenize text into lowercase alphanumeric terms with stopwords removed.
/// Anything outside `[a-z0-9]` acts as a separator, so punctuation never
/// survives into a term.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TERM.find_iter(&lowered)
        .map(|mat| mat.as_str())
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_splits_on_punctuation() {
        let t = tokenize("Reset my PASSWORD, please!");
        assert_eq!(t, vec!["reset", "my", "password", "please"]);
    }

    #[test]
    fn drops_stopwords() {
        let t = tokenize("What is the refund policy?");
        assert_eq!(t, vec!["what", "refund", "policy"]);
    }

    #[test]
    fn empty_and_whitespace_input_yield_nothing() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\n ").is_empty());
    }

    #[test]
    fn digits_count_as_term_characters() {
        let t = tokenize("Refunds within 30 days.");
        assert_eq!(t, vec!["refunds", "within", "30", "days"]);
    }

    #[test]
    fn non_ascii_acts_as_a_separator() {
        assert_eq!(tokenize("naïve café"), vec!["na", "ve", "caf"]);
    }
}
