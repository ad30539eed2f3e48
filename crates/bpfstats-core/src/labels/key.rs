//! Label set identity keys.
//!
//! Hashing rules:
//! - The digest covers the name-sorted pairs, never the caller's insertion order.
//! - Pairs are encoded as a JSON array of `[name, value]` arrays before hashing,
//!   so no two distinct sets share an encoding.
//! - Failures are returned as `StatsError::Hash`; nothing here aborts.

use std::fmt;

use sha2::{Digest, Sha256};

use super::LabelSet;
use crate::error::{Result, StatsError};

/// Fixed-width (SHA-256) identity of a label set's content.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelKey([u8; 32]);

impl LabelKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LabelKey({self})")
    }
}

/// Derive the identity key of a label set.
pub fn hash_labels(labels: &LabelSet) -> Result<LabelKey> {
    let pairs: Vec<(&str, &str)> = labels.iter().collect();
    let canonical =
        serde_json::to_vec(&pairs).map_err(|e| StatsError::Hash(e.to_string()))?;

    let digest: [u8; 32] = Sha256::digest(&canonical).into();
    Ok(LabelKey(digest))
}
