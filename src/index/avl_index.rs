use log::debug;
use std::fmt;
use crate::core::config::IndexConfig;
use crate::core::error::{Error, Result};
use crate::core::types::{DocDetails, Word};
use crate::index::avl_tree::{AvlTree, Iter};
use crate::index::posting::{DocList, WordEntry};
use crate::index::word_index::Index;

/// Word index backed by an AVL tree ordered by word.
///
/// Lookups and updates are O(log n) in the worst case, and `iter` yields
/// entries in ascending word order.
#[derive(Debug, Clone, Default)]
pub struct AvlIndex {
    tree: AvlTree<WordEntry>,
    config: IndexConfig,
}

impl AvlIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        debug!(
            "avl index: merge_policy={:?}, max_entries={:?}",
            config.merge_policy, config.entry_limit()
        );
        Ok(AvlIndex {
            tree: AvlTree::new(),
            config,
        })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn tree(&self) -> &AvlTree<WordEntry> {
        &self.tree
    }

    /// Entries in ascending word order
    pub fn iter(&self) -> Iter<'_, WordEntry> {
        self.tree.iter()
    }

    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Checks ordering, cached heights and balance of the whole tree
    pub fn validate(&self) -> Result<()> {
        self.tree.validate()
    }

    fn check_capacity(&self, word: &str) -> Result<()> {
        match self.config.entry_limit() {
            Some(max) if self.tree.len() >= max && !self.tree.contains(word) => {
                Err(Error::capacity_exceeded(format!(
                    "index is full ({} words), cannot add '{}'",
                    max, word
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Index for AvlIndex {
    fn add_occurrence(&mut self, word: &str, doc_id: &str, weight: u64) -> Result<()> {
        let details = DocDetails::new(doc_id, weight)?;
        self.check_capacity(word)?;

        let policy = self.config.merge_policy;
        let (merged, _created) = self.tree.upsert(
            word,
            || WordEntry::new(Word::new(word)),
            |entry| entry.docs_mut().merge(details, policy),
        );
        merged
    }

    fn lookup(&self, word: &str) -> Result<&DocList> {
        self.tree
            .get(word)
            .map(WordEntry::docs)
            .ok_or_else(|| Error::not_found(format!("word '{}'", word)))
    }

    fn remove(&mut self, word: &str) -> Result<WordEntry> {
        let entry = self
            .tree
            .remove(word)
            .map_err(|err| Error::new(err.kind, format!("word '{}'", word)))?;
        debug!("avl index: removed '{}' ({} documents)", word, entry.docs.len());
        Ok(entry)
    }

    fn size(&self) -> usize {
        self.tree.len()
    }

    fn contains(&self, word: &str) -> bool {
        self.tree.contains(word)
    }

    fn clear(&mut self) {
        self.tree.clear();
    }

    fn render(&self) -> String {
        self.tree.render()
    }

    fn data_type(&self) -> &'static str {
        "AVL tree"
    }

    fn entries(&self) -> Box<dyn Iterator<Item = &WordEntry> + '_> {
        Box::new(self.tree.iter())
    }
}

impl fmt::Display for AvlIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.tree.render_to(f)
    }
}
