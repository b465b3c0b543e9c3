use crate::core::config::{IndexConfig, IndexKind};
use crate::core::error::Result;
use crate::index::avl_index::AvlIndex;
use crate::index::hash_index::HashIndex;
use crate::index::posting::{DocList, WordEntry};

/// Capability set shared by every index implementation.
///
/// Ingestion and query code should depend on this trait only; the backing
/// structure is picked once, at construction.
pub trait Index {
    /// Record `weight` occurrences of `word` in `doc_id`
    fn add_occurrence(&mut self, word: &str, doc_id: &str, weight: u64) -> Result<()>;

    fn add(&mut self, word: &str, doc_id: &str) -> Result<()> {
        self.add_occurrence(word, doc_id, 1)
    }

    /// `NotFound` when the word was never recorded
    fn lookup(&self, word: &str) -> Result<&DocList>;

    fn remove(&mut self, word: &str) -> Result<WordEntry>;

    /// Number of distinct words
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_ok()
    }

    fn clear(&mut self);

    /// Human-readable dump of the backing structure
    fn render(&self) -> String;

    fn data_type(&self) -> &'static str;

    /// All entries, in whatever order the backing structure keeps them
    fn entries(&self) -> Box<dyn Iterator<Item = &WordEntry> + '_>;

    /// The `n` words with the largest total weight, ties by ascending word
    fn frequent_words(&self, n: usize) -> Vec<&WordEntry> {
        let mut entries: Vec<&WordEntry> = self.entries().collect();
        entries.sort_by(|a, b| {
            b.docs.total_weight()
                .cmp(&a.docs.total_weight())
                .then_with(|| a.word().cmp(b.word()))
        });
        entries.truncate(n);
        entries
    }
}

impl<I: Index + ?Sized> Index for Box<I> {
    fn add_occurrence(&mut self, word: &str, doc_id: &str, weight: u64) -> Result<()> {
        (**self).add_occurrence(word, doc_id, weight)
    }

    fn lookup(&self, word: &str) -> Result<&DocList> {
        (**self).lookup(word)
    }

    fn remove(&mut self, word: &str) -> Result<WordEntry> {
        (**self).remove(word)
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn render(&self) -> String {
        (**self).render()
    }

    fn data_type(&self) -> &'static str {
        (**self).data_type()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = &WordEntry> + '_> {
        (**self).entries()
    }
}

pub type DynIndex = Box<dyn Index + Send + Sync>;

/// Runtime selection of the backing structure from `config.kind`
pub fn build_index(config: &IndexConfig) -> Result<DynIndex> {
    Ok(match config.kind {
        IndexKind::Avl => Box::new(AvlIndex::with_config(config.clone())?),
        IndexKind::Hash => Box::new(HashIndex::with_config(config.clone())?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(index: &mut dyn Index) {
        index.add_occurrence("cat", "doc1", 1).unwrap();
        index.add_occurrence("dog", "doc2", 1).unwrap();
        index.add_occurrence("cat", "doc1", 2).unwrap();

        let cat = index.lookup("cat").unwrap();
        assert_eq!(cat.len(), 1);
        assert_eq!(cat.get("doc1").unwrap().weight, 3);
        assert_eq!(index.lookup("dog").unwrap().get("doc2").unwrap().weight, 1);
        assert_eq!(index.size(), 2);
        assert!(index.remove("bird").unwrap_err().is_not_found());
    }

    #[test]
    fn test_build_index_selects_backing_structure() {
        let mut avl = build_index(&IndexConfig::with_kind(IndexKind::Avl)).unwrap();
        let mut hash = build_index(&IndexConfig::with_kind(IndexKind::Hash)).unwrap();
        assert_eq!(avl.data_type(), "AVL tree");
        assert_eq!(hash.data_type(), "hash table");

        exercise(avl.as_mut());
        exercise(hash.as_mut());
    }

    #[test]
    fn test_frequent_words_orders_by_total_weight() {
        let mut index = build_index(&IndexConfig::default()).unwrap();
        index.add_occurrence("rare", "doc1", 1).unwrap();
        index.add_occurrence("common", "doc1", 5).unwrap();
        index.add_occurrence("common", "doc2", 5).unwrap();
        index.add_occurrence("tied_b", "doc1", 3).unwrap();
        index.add_occurrence("tied_a", "doc3", 3).unwrap();

        let top: Vec<&str> = index.frequent_words(3).into_iter().map(|e| e.word().as_str()).collect();
        assert_eq!(top, vec!["common", "tied_a", "tied_b"]);
        assert_eq!(index.frequent_words(10).len(), 4);
    }

    #[test]
    fn test_default_add_uses_weight_one() {
        let mut index = build_index(&IndexConfig::with_kind(IndexKind::Hash)).unwrap();
        index.add("word", "doc1").unwrap();
        index.add("word", "doc1").unwrap();
        assert_eq!(index.lookup("word").unwrap().get("doc1").unwrap().weight, 2);
        assert!(index.contains("word"));
        assert!(!index.contains("other"));
    }
}
