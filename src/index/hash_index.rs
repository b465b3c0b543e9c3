use log::debug;
use std::fmt;
use crate::core::config::IndexConfig;
use crate::core::error::Result;
use crate::core::types::DocDetails;
use crate::index::hash_table::HashTable;
use crate::index::posting::{DocList, WordEntry};
use crate::index::word_index::Index;

/// Word index backed by a separately chained hash table.
///
/// Expected O(1) lookups; enumeration order follows the buckets and carries
/// no meaning.
#[derive(Debug, Clone, Default)]
pub struct HashIndex {
    table: HashTable,
    config: IndexConfig,
}

impl HashIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        let table = HashTable::with_config(config.table_config())?;
        debug!(
            "hash index: buckets={}, hash_function={:?}, merge_policy={:?}",
            table.bucket_count(),
            table.config().hash_function,
            config.merge_policy
        );
        Ok(HashIndex { table, config })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn table(&self) -> &HashTable {
        &self.table
    }

    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    pub fn rehash_count(&self) -> usize {
        self.table.rehash_count()
    }

    pub fn validate(&self) -> Result<()> {
        self.table.validate()
    }
}

impl Index for HashIndex {
    fn add_occurrence(&mut self, word: &str, doc_id: &str, weight: u64) -> Result<()> {
        let details = DocDetails::new(doc_id, weight)?;
        self.table.insert(word, details, self.config.merge_policy)
    }

    fn lookup(&self, word: &str) -> Result<&DocList> {
        self.table.find(word).map(WordEntry::docs)
    }

    fn remove(&mut self, word: &str) -> Result<WordEntry> {
        let entry = self.table.remove(word)?;
        debug!("hash index: removed '{}' ({} documents)", word, entry.docs.len());
        Ok(entry)
    }

    fn size(&self) -> usize {
        self.table.len()
    }

    fn contains(&self, word: &str) -> bool {
        self.table.contains(word)
    }

    fn clear(&mut self) {
        self.table.clear();
    }

    fn render(&self) -> String {
        self.table.render()
    }

    fn data_type(&self) -> &'static str {
        "hash table"
    }

    fn entries(&self) -> Box<dyn Iterator<Item = &WordEntry> + '_> {
        Box::new(self.table.iter())
    }
}

impl fmt::Display for HashIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.table.render_to(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{HashFunction, HashTableConfig, MergePolicy};
    use crate::core::error::ErrorKind;

    fn small_table(buckets: usize) -> IndexConfig {
        IndexConfig {
            table: HashTableConfig {
                initial_buckets: buckets,
                ..HashTableConfig::default()
            },
            ..IndexConfig::default()
        }
    }

    #[test]
    fn test_add_and_lookup() {
        let mut index = HashIndex::new();
        index.add_occurrence("cat", "doc1", 1).unwrap();
        index.add_occurrence("dog", "doc2", 1).unwrap();
        index.add_occurrence("cat", "doc1", 2).unwrap();

        assert_eq!(index.lookup("cat").unwrap().get("doc1").unwrap().weight, 3);
        assert_eq!(index.lookup("dog").unwrap().len(), 1);
        assert_eq!(index.size(), 2);
        assert!(index.remove("bird").unwrap_err().is_not_found());
    }

    #[test]
    fn test_grows_past_load_factor() {
        let mut index = HashIndex::with_config(small_table(4)).unwrap();
        for i in 0..50 {
            index.add(&format!("word{}", i), "doc").unwrap();
        }
        assert!(index.rehash_count() > 0);
        assert!(index.load_factor() <= 0.75);
        assert_eq!(index.size(), 50);
        for i in 0..50 {
            assert!(index.contains(&format!("word{}", i)));
        }
        index.validate().unwrap();
    }

    #[test]
    fn test_crc32_and_replace_policy() {
        let config = IndexConfig {
            merge_policy: MergePolicy::Replace,
            table: HashTableConfig {
                hash_function: HashFunction::Crc32,
                ..HashTableConfig::default()
            },
            ..IndexConfig::default()
        };
        let mut index = HashIndex::with_config(config).unwrap();
        index.add_occurrence("cat", "doc1", 7).unwrap();
        index.add_occurrence("cat", "doc1", 3).unwrap();
        assert_eq!(index.lookup("cat").unwrap().get("doc1").unwrap().weight, 3);
        assert_eq!(index.lookup("cat").unwrap().total_weight(), 3);
    }

    #[test]
    fn test_index_max_entries_applies_to_table() {
        let config = IndexConfig {
            max_entries: Some(1),
            ..IndexConfig::default()
        };
        let mut index = HashIndex::with_config(config).unwrap();
        index.add("only", "doc").unwrap();
        let err = index.add("second", "doc").unwrap_err();
        assert_eq!(err.kind, ErrorKind::CapacityExceeded);
        assert_eq!(index.size(), 1);
    }

    #[test]
    fn test_clear_keeps_buckets() {
        let mut index = HashIndex::with_config(small_table(8)).unwrap();
        index.add("a", "doc").unwrap();
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.bucket_count(), 8);
        assert!(index.lookup("a").unwrap_err().is_not_found());
    }
}
