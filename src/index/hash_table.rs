use log::debug;
use std::fmt;
use crate::core::config::{HashTableConfig, MergePolicy};
use crate::core::error::{Error, Result};
use crate::core::types::{DocDetails, Word};
use crate::index::posting::WordEntry;

/// Separately chained hash table from word to its documents.
///
/// A word always lives in bucket `hash(token) % bucket_count`. Entries within
/// a bucket keep insertion order. When `len / bucket_count` exceeds the
/// configured load factor the bucket array doubles and every entry is
/// redistributed.
#[derive(Debug, Clone)]
pub struct HashTable {
    buckets: Vec<Vec<WordEntry>>,
    len: usize,
    rehashes: usize,
    config: HashTableConfig,
}

impl Default for HashTable {
    fn default() -> Self {
        HashTable::new()
    }
}

impl HashTable {
    pub fn new() -> Self {
        let config = HashTableConfig::default();
        HashTable {
            buckets: empty_buckets(config.initial_buckets),
            len: 0,
            rehashes: 0,
            config,
        }
    }

    pub fn with_config(config: HashTableConfig) -> Result<Self> {
        config.validate()?;
        Ok(HashTable {
            buckets: empty_buckets(config.initial_buckets),
            len: 0,
            rehashes: 0,
            config,
        })
    }

    pub fn config(&self) -> &HashTableConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// How many times the bucket array has been grown
    pub fn rehash_count(&self) -> usize {
        self.rehashes
    }

    /// Entry for `token`, created empty if absent. Callers must add a
    /// document right away; an entry never stays without one.
    fn get_or_insert(&mut self, token: &str) -> Result<&mut WordEntry> {
        let (bucket, slot) = self.locate(token);
        if let Some(slot) = slot {
            return Ok(&mut self.buckets[bucket][slot]);
        }

        if let Some(max) = self.config.max_entries {
            if self.len >= max {
                return Err(Error::capacity_exceeded(format!(
                    "hash table is full ({} entries), cannot add '{}'",
                    max, token
                )));
            }
        }

        self.buckets[bucket].push(WordEntry::new(Word::new(token)));
        self.len += 1;

        let grown = match self.grow_if_needed() {
            Ok(grown) => grown,
            Err(err) => {
                // Growth leaves the buckets untouched on failure
                self.buckets[bucket].pop();
                self.len -= 1;
                return Err(err);
            }
        };
        let (bucket, slot) = if grown {
            self.locate(token)
        } else {
            (bucket, Some(self.buckets[bucket].len() - 1))
        };
        match slot {
            Some(slot) => Ok(&mut self.buckets[bucket][slot]),
            None => Err(Error::internal(format!("'{}' lost during rehash", token))),
        }
    }

    /// Record one occurrence, merging into an existing entry per `policy`
    pub fn insert(&mut self, token: &str, details: DocDetails, policy: MergePolicy) -> Result<()> {
        self.get_or_insert(token)?.docs_mut().merge(details, policy)
    }

    pub fn get(&self, token: &str) -> Option<&WordEntry> {
        let (bucket, slot) = self.locate(token);
        slot.map(|slot| &self.buckets[bucket][slot])
    }

    pub fn get_mut(&mut self, token: &str) -> Option<&mut WordEntry> {
        let (bucket, slot) = self.locate(token);
        match slot {
            Some(slot) => Some(&mut self.buckets[bucket][slot]),
            None => None,
        }
    }

    pub fn find(&self, token: &str) -> Result<&WordEntry> {
        self.get(token)
            .ok_or_else(|| Error::not_found(format!("word '{}'", token)))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.get(token).is_some()
    }

    pub fn remove(&mut self, token: &str) -> Result<WordEntry> {
        let (bucket, slot) = self.locate(token);
        let slot = slot.ok_or_else(|| Error::not_found(format!("word '{}'", token)))?;
        self.len -= 1;
        Ok(self.buckets[bucket].remove(slot))
    }

    /// Drop every entry, keeping the current bucket count
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Entries in bucket order; no ordering across buckets
    pub fn iter(&self) -> impl Iterator<Item = &WordEntry> + '_ {
        self.buckets.iter().flatten()
    }

    pub fn buckets(&self) -> &[Vec<WordEntry>] {
        &self.buckets
    }

    /// Check bucket placement, uniqueness, element count and load factor
    pub fn validate(&self) -> Result<()> {
        let mut count = 0;
        for (index, bucket) in self.buckets.iter().enumerate() {
            for (position, entry) in bucket.iter().enumerate() {
                let expected = self.bucket_index(entry.word().as_str());
                if expected != index {
                    return Err(Error::internal(format!(
                        "'{}' stored in bucket {} but hashes to {}",
                        entry.word(), index, expected
                    )));
                }
                if bucket[..position].iter().any(|other| other.word() == entry.word()) {
                    return Err(Error::internal(format!("'{}' stored twice", entry.word())));
                }
                count += 1;
            }
        }
        if count != self.len {
            return Err(Error::internal(format!(
                "table holds {} entries but records {}",
                count, self.len
            )));
        }
        if self.load_factor() > self.config.max_load_factor {
            return Err(Error::internal(format!(
                "load factor {:.2} above limit {:.2}",
                self.load_factor(),
                self.config.max_load_factor
            )));
        }
        Ok(())
    }

    pub fn render_to<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        for (index, bucket) in self.buckets.iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            writeln!(out, "bucket {} ({} entries)", index, bucket.len())?;
            for entry in bucket {
                write!(out, "{}", entry)?;
            }
        }
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.render_to(&mut out);
        out
    }

    fn bucket_index(&self, token: &str) -> usize {
        (self.config.hash_function.hash(token) % self.buckets.len() as u64) as usize
    }

    fn locate(&self, token: &str) -> (usize, Option<usize>) {
        let bucket = self.bucket_index(token);
        let slot = self.buckets[bucket].iter().position(|entry| entry.word() == token);
        (bucket, slot)
    }

    fn grow_if_needed(&mut self) -> Result<bool> {
        let mut target = self.buckets.len();
        while self.len as f64 > target as f64 * self.config.max_load_factor {
            target = target.checked_mul(2).ok_or_else(|| {
                Error::capacity_exceeded(format!(
                    "bucket count overflows while growing past {} buckets",
                    self.buckets.len()
                ))
            })?;
        }
        if target == self.buckets.len() {
            return Ok(false);
        }
        self.rehash(target)?;
        Ok(true)
    }

    /// Redistribute every entry over `bucket_count` buckets. On allocation
    /// failure the table is left as it was.
    fn rehash(&mut self, bucket_count: usize) -> Result<()> {
        let mut fresh: Vec<Vec<WordEntry>> = Vec::new();
        fresh.try_reserve_exact(bucket_count).map_err(|err| {
            Error::capacity_exceeded(format!(
                "cannot allocate {} buckets: {}",
                bucket_count, err
            ))
        })?;
        fresh.resize_with(bucket_count, Vec::new);

        let old_count = self.buckets.len();
        let old = std::mem::replace(&mut self.buckets, fresh);
        for entry in old.into_iter().flatten() {
            let index = self.bucket_index(entry.word().as_str());
            self.buckets[index].push(entry);
        }
        self.rehashes += 1;
        debug!(
            "hash table: rehashed {} entries from {} to {} buckets",
            self.len, old_count, bucket_count
        );
        Ok(())
    }
}

impl fmt::Display for HashTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.render_to(f)
    }
}

fn empty_buckets(count: usize) -> Vec<Vec<WordEntry>> {
    (0..count).map(|_| Vec::new()).collect()
}
