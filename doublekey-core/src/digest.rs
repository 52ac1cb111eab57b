//! Order-independent content digest
//!
//! Provides:
//! - BLAKE3 hash per entry, XOR-combined
//! - Equal digests for equal contents, whatever the slot layout or
//!   capacity history

use blake3::Hasher;

/// 32-byte BLAKE3 output
pub type DigestBytes = [u8; 32];

/// Digest of a collection of entries
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentDigest {
    root: DigestBytes,
    count: usize,
}

impl ContentDigest {
    /// Digest of no entries
    pub fn empty() -> Self {
        ContentDigest {
            root: [0u8; 32],
            count: 0,
        }
    }

    /// Combine per-entry hashes (order-independent)
    pub fn from_hashes<I>(hashes: I) -> Self
    where
        I: IntoIterator<Item = DigestBytes>,
    {
        let mut root = [0u8; 32];
        let mut count = 0;

        for hash in hashes {
            for (i, byte) in hash.iter().enumerate() {
                root[i] ^= byte;
            }
            count += 1;
        }

        ContentDigest { root, count }
    }

    /// Hash one entry from its parts, each length-prefixed so part
    /// boundaries cannot shift
    pub fn hash_entry(parts: &[&[u8]]) -> DigestBytes {
        let mut hasher = Hasher::new();
        for part in parts {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        *hasher.finalize().as_bytes()
    }

    pub fn root(&self) -> &DigestBytes {
        &self.root
    }

    /// Number of entries combined
    pub fn count(&self) -> usize {
        self.count
    }

    /// Lowercase hex of the root
    pub fn to_hex(&self) -> String {
        self.root.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl Default for ContentDigest {
    fn default() -> Self {
        Self::empty()
    }
}
