use serde::{Serialize, Deserialize};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use crate::core::error::{Error, Result};

/// A single indexed token
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Word(String);

impl Word {
    pub fn new(token: impl Into<String>) -> Self {
        Word(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical textual form, identical to the token
    pub fn render(&self) -> String {
        self.0.clone()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for Word {
    fn from(token: &str) -> Self {
        Word(token.to_string())
    }
}

impl From<String> for Word {
    fn from(token: String) -> Self {
        Word(token)
    }
}

impl Borrow<str> for Word {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Word {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Word {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<String> for Word {
    fn eq(&self, other: &String) -> bool {
        &self.0 == other
    }
}

impl PartialOrd<str> for Word {
    fn partial_cmp(&self, other: &str) -> Option<Ordering> {
        Some(self.0.as_str().cmp(other))
    }
}

impl PartialOrd<&str> for Word {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        Some(self.0.as_str().cmp(*other))
    }
}

impl PartialOrd<String> for Word {
    fn partial_cmp(&self, other: &String) -> Option<Ordering> {
        Some(self.0.cmp(other))
    }
}

/// Opaque document identifier: non-empty, no control characters
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocId(String);

impl DocId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::invalid_argument("document id must not be empty"));
        }
        if id.chars().any(char::is_control) {
            return Err(Error::invalid_argument(format!(
                "document id {:?} contains control characters",
                id
            )));
        }
        Ok(DocId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DocId {
    type Error = Error;

    fn try_from(id: String) -> Result<Self> {
        DocId::new(id)
    }
}

impl TryFrom<&str> for DocId {
    type Error = Error;

    fn try_from(id: &str) -> Result<Self> {
        DocId::new(id)
    }
}

impl From<DocId> for String {
    fn from(id: DocId) -> Self {
        id.0
    }
}

impl Borrow<str> for DocId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Occurrence record of one word in one document.
///
/// Identity is the document id; the weight rides along and only takes part in
/// comparisons through [`DocDetails::same_occurrence`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocDetails {
    pub doc_id: DocId,
    pub weight: u64,
}

impl DocDetails {
    pub fn new(doc_id: impl Into<String>, weight: u64) -> Result<Self> {
        Ok(DocDetails {
            doc_id: DocId::new(doc_id)?,
            weight,
        })
    }

    /// Occurrence with the default weight of 1
    pub fn single(doc_id: impl Into<String>) -> Result<Self> {
        DocDetails::new(doc_id, 1)
    }

    pub fn from_id(doc_id: DocId, weight: u64) -> Self {
        DocDetails { doc_id, weight }
    }

    pub fn doc_id(&self) -> &DocId {
        &self.doc_id
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Weight is left untouched on overflow
    pub fn increment_weight(&mut self, delta: u64) -> Result<()> {
        self.weight = self.weight.checked_add(delta).ok_or_else(|| {
            Error::capacity_exceeded(format!(
                "weight of document {} overflows ({} + {})",
                self.doc_id, self.weight, delta
            ))
        })?;
        Ok(())
    }

    pub fn same_occurrence(&self, other: &DocDetails) -> bool {
        self.doc_id == other.doc_id && self.weight == other.weight
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DocDetails {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}", self.doc_id, self.weight)
    }
}

impl PartialEq for DocDetails {
    fn eq(&self, other: &Self) -> bool {
        self.doc_id == other.doc_id
    }
}

impl Eq for DocDetails {}

impl PartialOrd for DocDetails {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DocDetails {
    fn cmp(&self, other: &Self) -> Ordering {
        self.doc_id.cmp(&other.doc_id)
    }
}

impl Hash for DocDetails {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.doc_id.hash(state);
    }
}

impl PartialEq<DocId> for DocDetails {
    fn eq(&self, other: &DocId) -> bool {
        &self.doc_id == other
    }
}

impl PartialOrd<DocId> for DocDetails {
    fn partial_cmp(&self, other: &DocId) -> Option<Ordering> {
        Some(self.doc_id.cmp(other))
    }
}

impl PartialEq<str> for DocDetails {
    fn eq(&self, other: &str) -> bool {
        self.doc_id.as_str() == other
    }
}

impl PartialEq<&str> for DocDetails {
    fn eq(&self, other: &&str) -> bool {
        self.doc_id.as_str() == *other
    }
}

impl PartialOrd<str> for DocDetails {
    fn partial_cmp(&self, other: &str) -> Option<Ordering> {
        Some(self.doc_id.as_str().cmp(other))
    }
}

impl PartialOrd<&str> for DocDetails {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        Some(self.doc_id.as_str().cmp(*other))
    }
}
