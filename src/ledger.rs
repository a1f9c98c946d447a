//! Process-wide ledger handle.
//!
//! A [`Ledger`] is a cheap-to-clone handle over one [`Blockchain`] guarded by a
//! single-writer/multi-reader lock. Every mutation validates and applies under
//! the write lock, so two appends racing for the same tip cannot both land.
//! Readers clone out under the read lock and never observe a half-applied
//! append or replacement.

use crate::blockchain::{Block, Blockchain};
use crate::consensus::ChainSelection;
use crate::error::ChainError;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone, Default)]
pub struct Ledger {
    chain: Arc<RwLock<Blockchain>>,
}

impl Ledger {
    /// Seed a new ledger with a genesis block stamped with the current time.
    pub fn new() -> Self {
        Self::from_chain(Blockchain::new())
    }

    pub fn from_chain(chain: Blockchain) -> Self {
        debug!(genesis = ?chain.genesis(), "ledger.seeded");
        Self {
            chain: Arc::new(RwLock::new(chain)),
        }
    }

    /// Consistent copy of the full chain.
    pub fn snapshot(&self) -> Vec<Block> {
        self.chain.read().blocks().to_vec()
    }

    pub fn tip(&self) -> Block {
        self.chain.read().last().clone()
    }

    pub fn len(&self) -> usize {
        self.chain.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.read().is_empty()
    }

    /// Full write path: build a block carrying `payload` on the current tip,
    /// validate it and append it, all under one write lock.
    pub fn append_payload(&self, payload: i64) -> Result<Block, ChainError> {
        let mut chain = self.chain.write();
        let block = chain.next_block(payload).map_err(|e| {
            warn!(payload, error = %e, "ledger.block_rejected");
            e
        })?;
        Self::apply(&mut chain, block)
    }

    /// Append a block built elsewhere. It is validated against whatever the
    /// tip is once the write lock is held.
    pub fn append(&self, candidate: Block) -> Result<Block, ChainError> {
        let mut chain = self.chain.write();
        Self::apply(&mut chain, candidate)
    }

    /// Offer a competing sequence; see [`Blockchain::replace`]. Also returns
    /// the chain length observed under the same write lock as the decision.
    pub fn replace(&self, candidate: Vec<Block>) -> Result<(ChainSelection, usize), ChainError> {
        let candidate_len = candidate.len();
        let mut chain = self.chain.write();
        let current_len = chain.len();

        match chain.replace(candidate) {
            Ok(ChainSelection::Adopted) => {
                info!(from = current_len, to = candidate_len, "ledger.replaced");
                Ok((ChainSelection::Adopted, chain.len()))
            }
            Ok(ChainSelection::KeptCurrent) => {
                debug!(current_len, candidate_len, "ledger.replacement_not_longer");
                Ok((ChainSelection::KeptCurrent, chain.len()))
            }
            Err(e) => {
                warn!(current_len, candidate_len, error = %e, "ledger.replacement_rejected");
                Err(e)
            }
        }
    }

    fn apply(chain: &mut Blockchain, candidate: Block) -> Result<Block, ChainError> {
        let index = candidate.index;
        match chain.append(candidate) {
            Ok(block) => {
                info!(index = block.index, hash = %block.hash, "ledger.appended");
                Ok(block.clone())
            }
            Err(e) => {
                warn!(index, error = %e, "ledger.append_rejected");
                Err(e)
            }
        }
    }
}
