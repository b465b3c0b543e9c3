use serde::{Serialize, Deserialize};
use std::fmt;
use crate::core::config::MergePolicy;
use crate::core::error::{Error, Result};
use crate::core::types::{DocDetails, Word};
use crate::index::avl_tree::Keyed;

/// Documents a word occurs in
/// Note: kept in first-insertion order, at most one entry per document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocList {
    docs: Vec<DocDetails>,
    total_weight: u64,
}

impl DocList {
    pub fn new() -> Self {
        DocList {
            docs: Vec::new(),
            total_weight: 0,
        }
    }

    pub fn merge(&mut self, details: DocDetails, policy: MergePolicy) -> Result<()> {
        match self.docs.iter().position(|d| d.doc_id == details.doc_id) {
            Some(pos) => {
                let existing = &mut self.docs[pos];
                match policy {
                    MergePolicy::Sum => {
                        existing.increment_weight(details.weight)?;
                        self.total_weight = self.total_weight.saturating_add(details.weight);
                    }
                    MergePolicy::Replace => {
                        self.total_weight = self.total_weight
                            .saturating_sub(existing.weight)
                            .saturating_add(details.weight);
                        existing.weight = details.weight;
                    }
                }
            }
            None => {
                self.total_weight = self.total_weight.saturating_add(details.weight);
                self.docs.push(details);
            }
        }
        Ok(())
    }

    pub fn remove(&mut self, doc_id: &str) -> Result<DocDetails> {
        let pos = self.docs.iter().position(|d| d.doc_id.as_str() == doc_id)
            .ok_or_else(|| Error::not_found(format!("document '{}'", doc_id)))?;
        let removed = self.docs.remove(pos);
        self.total_weight = self.total_weight.saturating_sub(removed.weight);
        Ok(removed)
    }

    pub fn get(&self, doc_id: &str) -> Option<&DocDetails> {
        self.docs.iter().find(|d| d.doc_id.as_str() == doc_id)
    }

    pub fn contains(&self, doc_id: &str) -> bool {
        self.get(doc_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Sum of all weights (saturating)
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DocDetails> {
        self.docs.iter()
    }

    pub fn as_slice(&self) -> &[DocDetails] {
        &self.docs
    }

    /// Documents of either list; shared documents add their weights
    pub fn union(&self, other: &DocList) -> DocList {
        let mut result = self.clone();
        for details in other.iter() {
            // Sum only fails on overflow, saturate instead
            if result.merge(details.clone(), MergePolicy::Sum).is_err() {
                if let Some(pos) = result.docs.iter().position(|d| d == details) {
                    result.docs[pos].weight = u64::MAX;
                }
                result.recount();
            }
        }
        result
    }

    /// Documents present in both lists with the smaller weight
    pub fn intersection(&self, other: &DocList) -> DocList {
        let docs: Vec<DocDetails> = self.docs.iter()
            .filter_map(|d| {
                other.get(d.doc_id.as_str())
                    .map(|o| DocDetails::from_id(d.doc_id.clone(), d.weight.min(o.weight)))
            })
            .collect();
        DocList::from_docs(docs)
    }

    /// Documents of this list absent from `other`
    pub fn difference(&self, other: &DocList) -> DocList {
        let docs: Vec<DocDetails> = self.docs.iter()
            .filter(|d| !other.contains(d.doc_id.as_str()))
            .cloned()
            .collect();
        DocList::from_docs(docs)
    }

    fn from_docs(docs: Vec<DocDetails>) -> DocList {
        let mut list = DocList { docs, total_weight: 0 };
        list.recount();
        list
    }

    fn recount(&mut self) {
        self.total_weight = self.docs.iter()
            .fold(0u64, |acc, d| acc.saturating_add(d.weight));
    }
}

impl<'a> IntoIterator for &'a DocList {
    type Item = &'a DocDetails;
    type IntoIter = std::slice::Iter<'a, DocDetails>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.iter()
    }
}

/// One word and every document it was recorded against.
///
/// The word is the lookup key of both backing structures and is fixed at
/// construction; only the document list can be changed in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    word: Word,
    pub docs: DocList,
}

impl WordEntry {
    pub fn new(word: Word) -> Self {
        WordEntry {
            word,
            docs: DocList::new(),
        }
    }

    pub fn word(&self) -> &Word {
        &self.word
    }

    pub fn docs(&self) -> &DocList {
        &self.docs
    }

    pub fn docs_mut(&mut self) -> &mut DocList {
        &mut self.docs
    }

    pub fn into_docs(self) -> DocList {
        self.docs
    }
}

impl Keyed for WordEntry {
    type Key = Word;

    fn key(&self) -> &Word {
        &self.word
    }
}

/// Example:
///
/// ```text
/// aircraft :: 2 documents :: 5 times
///     corpus/a.pdf    4
///     corpus/b.pdf    1
/// ```
impl fmt::Display for WordEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{} :: {} documents :: {} times",
            self.word,
            self.docs.len(),
            self.docs.total_weight()
        )?;
        for details in self.docs.iter() {
            writeln!(f, "\t{}", details)?;
        }
        Ok(())
    }
}
