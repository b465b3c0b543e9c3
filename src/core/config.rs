use serde::{Serialize, Deserialize};
use crate::core::error::{Error, Result};

/// Which backing structure an index uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    #[default]
    Avl,
    Hash,
}

/// What happens when a word is recorded again against the same document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Add the new weight to the stored one
    #[default]
    Sum,
    /// Overwrite the stored weight
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashFunction {
    #[default]
    Djb2,
    Crc32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashTableConfig {
    pub initial_buckets: usize,
    pub max_load_factor: f64,
    pub hash_function: HashFunction,
    pub max_entries: Option<usize>,
}

impl Default for HashTableConfig {
    fn default() -> Self {
        HashTableConfig {
            initial_buckets: 16,
            max_load_factor: 0.75,       // Double the bucket array past this
            hash_function: HashFunction::Djb2,
            max_entries: None,           // Grow without bound
        }
    }
}

/// Smallest accepted `max_load_factor`; below it the bucket array would grow
/// far faster than the entries
pub const MIN_LOAD_FACTOR: f64 = 0.1;

impl HashTableConfig {
    pub fn validate(&self) -> Result<()> {
        if self.initial_buckets == 0 {
            return Err(Error::invalid_argument("initial_buckets must be at least 1"));
        }
        if !self.max_load_factor.is_finite() || self.max_load_factor < MIN_LOAD_FACTOR {
            return Err(Error::invalid_argument(format!(
                "max_load_factor must be a finite number of at least {}, got {}",
                MIN_LOAD_FACTOR, self.max_load_factor
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub kind: IndexKind,
    pub merge_policy: MergePolicy,
    pub max_entries: Option<usize>,
    pub table: HashTableConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            kind: IndexKind::Avl,
            merge_policy: MergePolicy::Sum,
            max_entries: None,
            table: HashTableConfig::default(),
        }
    }
}

impl IndexConfig {
    pub fn with_kind(kind: IndexKind) -> Self {
        IndexConfig {
            kind,
            ..IndexConfig::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: IndexConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.table.validate()
    }

    /// Word limit shared by every backing structure; the index-wide value
    /// wins over the table one
    pub fn entry_limit(&self) -> Option<usize> {
        self.max_entries.or(self.table.max_entries)
    }

    /// Table settings with the index-wide entry limit applied
    pub fn table_config(&self) -> HashTableConfig {
        HashTableConfig {
            max_entries: self.entry_limit(),
            ..self.table.clone()
        }
    }
}
