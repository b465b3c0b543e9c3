use crate::core::config::HashFunction;

/// Bernstein's djb2: h = h * 33 + byte, seeded with 5381
pub fn djb2(token: &str) -> u64 {
    token.bytes().fold(5381u64, |hash, byte| {
        (hash << 5).wrapping_add(hash).wrapping_add(byte as u64)
    })
}

pub fn crc32(token: &str) -> u64 {
    crc32fast::hash(token.as_bytes()) as u64
}

impl HashFunction {
    /// Deterministic across runs and platforms
    pub fn hash(&self, token: &str) -> u64 {
        match self {
            HashFunction::Djb2 => djb2(token),
            HashFunction::Crc32 => crc32(token),
        }
    }
}
