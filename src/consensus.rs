//! Fork resolution between the canonical chain and a competing sequence.

use crate::blockchain::{validate_chain, Block};
use crate::error::ChainError;
use serde::Serialize;

/// Outcome of presenting a candidate sequence to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainSelection {
    Adopted,
    KeptCurrent,
}

/// Longest-valid-chain rule.
pub struct Consensus;

impl Consensus {
    /// Decide whether `candidate` should replace a chain of `current_len` blocks.
    ///
    /// Only a strictly longer candidate is considered, and it must be
    /// internally consistent from genesis to tip. Ties keep the current chain.
    pub fn select(current_len: usize, candidate: &[Block]) -> Result<ChainSelection, ChainError> {
        if candidate.len() <= current_len {
            return Ok(ChainSelection::KeptCurrent);
        }

        validate_chain(candidate)?;
        Ok(ChainSelection::Adopted)
    }
}
