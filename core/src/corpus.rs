use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One question/answer record from the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(rename = "q")]
    pub question: String,
    #[serde(rename = "a")]
    pub answer: String,
}

/// A corpus as loaded from its source: ordered records plus an optional
/// per-corpus similarity threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Knowledge {
    #[serde(default)]
    pub threshold: Option<f32>,
    pub items: Vec<KnowledgeEntry>,
}

/// Why a corpus load failed. Either kind aborts the rebuild that requested
/// it without touching a previously published index.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus source: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed corpus: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where corpus records come from. Implementations re-read the source in
/// full on every call; there is no incremental path.
pub trait CorpusSource: Send + Sync {
    fn load(&self) -> Result<Knowledge, CorpusError>;
}

/// Corpus stored as a single JSON file on disk.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl CorpusSource for JsonFileSource {
    fn load(&self) -> Result<Knowledge, CorpusError> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_items_and_optional_threshold() {
        let kb: Knowledge = serde_json::from_str(
            r#"{"items":[{"q":"What is your refund policy?","a":"Refunds within 30 days."}]}"#,
        )
        .unwrap();
        assert!(kb.threshold.is_none());
        assert_eq!(kb.items.len(), 1);
        assert_eq!(kb.items[0].question, "What is your refund policy?");

        let kb: Knowledge = serde_json::from_str(r#"{"threshold":0.2,"items":[]}"#).unwrap();
        assert_eq!(kb.threshold, Some(0.2));
        assert!(kb.items.is_empty());
    }

    #[test]
    fn rejects_entries_missing_fields() {
        let parsed = serde_json::from_str::<Knowledge>(r#"{"items":[{"q":"Only a question"}]}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let source = JsonFileSource::new("/definitely/not/here.json");
        match source.load() {
            Err(CorpusError::Io(_)) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn broken_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knowledge.json");
        fs::write(&path, "{ not json").unwrap();
        match JsonFileSource::new(&path).load() {
            Err(CorpusError::Parse(_)) => {}
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
