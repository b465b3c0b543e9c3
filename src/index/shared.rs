use std::sync::Arc;
use parking_lot::RwLock;
use crate::core::error::{Error, Result};
use crate::index::posting::{DocList, WordEntry};
use crate::index::word_index::Index;

/// Thread-safe handle around any [`Index`].
///
/// Mutations take the write lock, queries the read lock; many readers may run
/// together while writers are exclusive. Clones share the same index.
pub struct SharedIndex<I> {
    inner: Arc<RwLock<I>>,
}

impl<I> Clone for SharedIndex<I> {
    fn clone(&self) -> Self {
        SharedIndex {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I: Index> SharedIndex<I> {
    pub fn new(index: I) -> Self {
        SharedIndex {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    pub fn add_occurrence(&self, word: &str, doc_id: &str, weight: u64) -> Result<()> {
        self.inner.write().add_occurrence(word, doc_id, weight)
    }

    pub fn add(&self, word: &str, doc_id: &str) -> Result<()> {
        self.inner.write().add(word, doc_id)
    }

    /// Apply `(word, doc_id, weight)` triples under a single write lock.
    ///
    /// Stops at the first failure; occurrences applied before it are kept and
    /// the error context reports how many there were.
    pub fn add_batch<'a, B>(&self, batch: B) -> Result<usize>
    where
        B: IntoIterator<Item = (&'a str, &'a str, u64)>,
    {
        let mut index = self.inner.write();
        let mut applied = 0;
        for (word, doc_id, weight) in batch {
            index.add_occurrence(word, doc_id, weight).map_err(|err| {
                Error::new(
                    err.kind,
                    format!("{} (batch stopped after {} occurrences)", err.context, applied),
                )
            })?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Snapshot of the document list; the lock is released on return
    pub fn lookup(&self, word: &str) -> Result<DocList> {
        self.inner.read().lookup(word).cloned()
    }

    pub fn remove(&self, word: &str) -> Result<WordEntry> {
        self.inner.write().remove(word)
    }

    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.inner.read().contains(word)
    }

    pub fn clear(&self) {
        self.inner.write().clear()
    }

    pub fn render(&self) -> String {
        self.inner.read().render()
    }

    pub fn data_type(&self) -> &'static str {
        self.inner.read().data_type()
    }

    pub fn frequent_words(&self, n: usize) -> Vec<WordEntry> {
        self.inner
            .read()
            .frequent_words(n)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Run `f` against the index while holding the read lock
    pub fn read<R>(&self, f: impl FnOnce(&I) -> R) -> R {
        let guard = self.inner.read();
        f(&*guard)
    }

    /// Run `f` against the index while holding the write lock
    pub fn write<R>(&self, f: impl FnOnce(&mut I) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut *guard)
    }
}
