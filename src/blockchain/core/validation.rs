use crate::error::ChainError;

use super::block::{Block, GENESIS_PAYLOAD};

/// Check that `candidate` may follow `previous`.
///
/// The stored hash of `candidate` is never trusted; it is recomputed from the
/// block's content fields and compared.
pub fn validate_block(candidate: &Block, previous: &Block) -> Result<(), ChainError> {
    if previous.index + 1 != candidate.index {
        return Err(ChainError::InvalidBlock(format!(
            "Invalid block index. Expected {}, but got {}.",
            previous.index + 1,
            candidate.index
        )));
    }

    if previous.hash != candidate.prev_hash {
        return Err(ChainError::InvalidBlockLinkage);
    }

    let expected_hash = candidate.calculate_hash()?;
    if expected_hash != candidate.hash {
        return Err(ChainError::InvalidBlock(format!(
            "Hash mismatch at index {}. Expected {}, but got {}.",
            candidate.index, expected_hash, candidate.hash
        )));
    }

    Ok(())
}

/// Boolean form of [`validate_block`].
pub fn is_valid(candidate: &Block, previous: &Block) -> bool {
    validate_block(candidate, previous).is_ok()
}

/// Validate a whole sequence: it must open with a sentinel genesis block
/// (index 0, payload 0, empty hash and prev hash) and every adjacent pair
/// must pass [`validate_block`].
pub fn validate_chain(blocks: &[Block]) -> Result<(), ChainError> {
    let first = blocks
        .first()
        .ok_or_else(|| ChainError::InvalidChain("Chain is empty.".to_string()))?;

    if !first.is_genesis() || !first.prev_hash.is_empty() {
        return Err(ChainError::InvalidChain(format!(
            "First block must be a genesis block, but got index {}.",
            first.index
        )));
    }

    if first.payload != GENESIS_PAYLOAD || !first.hash.is_empty() {
        return Err(ChainError::InvalidChain(format!(
            "Genesis block must carry payload {} and an empty hash.",
            GENESIS_PAYLOAD
        )));
    }

    for pair in blocks.windows(2) {
        validate_block(&pair[1], &pair[0]).map_err(|e| {
            ChainError::InvalidChain(format!("Block {} rejected: {}", pair[1].index, e))
        })?;
    }

    Ok(())
}
