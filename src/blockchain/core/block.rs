use crate::error::ChainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Payload carried by the genesis block. Never accepted through [`Block::next`].
pub const GENESIS_PAYLOAD: i64 = 0;

/// One entry in the ledger.
///
/// Field names and order on the wire follow the deployed JSON format:
/// `Index`, `Timestamp`, `BPM`, `Hash`, `PrevHash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "Index")]
    pub index: u64,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "BPM")]
    pub payload: i64,
    #[serde(rename = "Hash")]
    pub hash: String,
    #[serde(rename = "PrevHash")]
    pub prev_hash: String,
}

impl Block {
    /// Sentinel first block. Seeded directly: it never passes the hashing
    /// gate, so its hash stays empty.
    pub fn genesis(timestamp: impl Into<String>) -> Self {
        Block {
            index: 0,
            timestamp: timestamp.into(),
            payload: GENESIS_PAYLOAD,
            hash: String::new(),
            prev_hash: String::new(),
        }
    }

    /// Build the successor of `previous` carrying `payload`, stamped with the
    /// current wall-clock time.
    pub fn next(previous: &Block, payload: i64) -> Result<Self, ChainError> {
        Self::next_at(previous, payload, current_timestamp())
    }

    /// Same as [`Block::next`] with a caller-supplied timestamp.
    pub fn next_at(
        previous: &Block,
        payload: i64,
        timestamp: impl Into<String>,
    ) -> Result<Self, ChainError> {
        let mut block = Block {
            index: previous.index + 1,
            timestamp: timestamp.into(),
            payload,
            hash: String::new(),
            prev_hash: previous.hash.clone(),
        };
        block.hash = block.calculate_hash()?;
        Ok(block)
    }

    /// Recompute the hash from this block's content fields.
    ///
    /// The digest input is `index ++ timestamp ++ payload ++ prev_hash` with
    /// both integers rendered as decimal text and no separators. The stored
    /// `hash` field is neither read nor written.
    pub fn calculate_hash(&self) -> Result<String, ChainError> {
        if self.index == 0 || self.timestamp.is_empty() || self.payload <= 0 {
            return Err(ChainError::InvalidBlockData);
        }
        Ok(hash_record(
            self.index,
            &self.timestamp,
            self.payload,
            &self.prev_hash,
        ))
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}

fn hash_record(index: u64, timestamp: &str, payload: i64, prev_hash: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(index.to_string().as_bytes());
    hasher.update(timestamp.as_bytes());
    hasher.update(payload.to_string().as_bytes());
    hasher.update(prev_hash.as_bytes());
    hex::encode(hasher.finalize())
}

/// Human-readable creation time. Opaque to the ledger: it is hashed, never parsed.
pub fn current_timestamp() -> String {
    chrono::Utc::now().to_string()
}
