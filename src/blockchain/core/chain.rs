use crate::consensus::{ChainSelection, Consensus};
use crate::error::ChainError;

use super::block::{current_timestamp, Block};
use super::validation::validate_block;

/// Ordered, hash-linked sequence of blocks. Always holds at least the genesis block.
///
/// Not synchronized; see [`crate::ledger::Ledger`] for the shared handle.
#[derive(Debug, Clone)]
pub struct Blockchain {
    blocks: Vec<Block>,
}

impl Blockchain {
    /// Create a chain seeded with a genesis block stamped with the current time.
    pub fn new() -> Self {
        Self::with_genesis(Block::genesis(current_timestamp()))
    }

    pub fn with_genesis(genesis: Block) -> Self {
        Blockchain {
            blocks: vec![genesis],
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    /// The current tip.
    pub fn last(&self) -> &Block {
        // Constructors seed genesis and `replace` never adopts an empty sequence.
        &self.blocks[self.blocks.len() - 1]
    }

    /// Build a block carrying `payload` on top of the current tip without
    /// appending it.
    pub fn next_block(&self, payload: i64) -> Result<Block, ChainError> {
        Block::next(self.last(), payload)
    }

    /// Append `candidate` if it validly extends the tip. On rejection the
    /// chain is left unchanged and the reason is returned.
    pub fn append(&mut self, candidate: Block) -> Result<&Block, ChainError> {
        validate_block(&candidate, self.last())?;
        self.blocks.push(candidate);
        Ok(self.last())
    }

    /// Adopt `candidate` if it is strictly longer than this chain and valid
    /// from genesis to tip.
    pub fn replace(&mut self, candidate: Vec<Block>) -> Result<ChainSelection, ChainError> {
        let selection = Consensus::select(self.blocks.len(), &candidate)?;
        if selection == ChainSelection::Adopted {
            self.blocks = candidate;
        }
        Ok(selection)
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}
