use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::corpus::{CorpusError, CorpusSource};
use crate::index::{build_index, Index};

/// Owner of the one published index.
///
/// Queries take a snapshot and never hold a lock while scoring. Rebuilds are
/// serialized and publish only a fully built index, so readers never observe
/// a partial one and a failed reload leaves the previous index in place.
pub struct SharedIndex {
    current: RwLock<Arc<Index>>,
    rebuild: Mutex<()>,
}

impl SharedIndex {
    pub fn new(index: Index) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
            rebuild: Mutex::new(()),
        }
    }

    /// The currently published index. The lock is held only for the clone.
    pub fn snapshot(&self) -> Arc<Index> {
        self.current.read().clone()
    }

    /// Atomically publish a fully built index, retiring the previous one.
    pub fn replace(&self, index: Index) {
        *self.current.write() = Arc::new(index);
    }

    /// Re-read the corpus source in full, rebuild, and publish. At most one
    /// rebuild runs at a time; on failure nothing is published.
    pub fn reload(&self, source: &dyn CorpusSource) -> Result<usize, CorpusError> {
        let _serialized = self.rebuild.lock();
        let kb = source.load()?;
        let index = build_index(&kb);
        let count = index.len();
        tracing::info!(documents = count, terms = index.idf.len(), "knowledge index rebuilt");
        self.replace(index);
        Ok(count)
    }
}
