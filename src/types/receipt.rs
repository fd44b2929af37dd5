//! Block receipt produced at commit.
//!
//! The receipt summarizes one committed block of exchange transactions and
//! carries the state root replicas compare to detect divergence.

use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

/// Summary of a committed block.
///
/// ## State Root
///
/// The 32-byte state root is a SHA-256 digest over every key/value pair of the
/// committed store, in key order. Two replicas that applied the same
/// transactions in the same order produce the same root.
///
/// ## Example
///
/// ```
/// use token_exchange::types::BlockReceipt;
///
/// let receipt = BlockReceipt::new(
///     1,          // height
///     10,         // txs_accepted
///     2,          // txs_rejected
///     [0u8; 32],  // state_root
///     1_000,      // block_time
/// );
/// assert_eq!(receipt.tx_count(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct BlockReceipt {
    /// Block height
    pub height: u64,

    /// Transactions applied
    pub txs_accepted: u64,

    /// Transactions rejected with a user error (no state change)
    pub txs_rejected: u64,

    /// State root after commit (SHA-256, 32 bytes)
    pub state_root: [u8; 32],

    /// Logical block time
    pub block_time: u64,
}

impl BlockReceipt {
    pub fn new(
        height: u64,
        txs_accepted: u64,
        txs_rejected: u64,
        state_root: [u8; 32],
        block_time: u64,
    ) -> Self {
        Self {
            height,
            txs_accepted,
            txs_rejected,
            state_root,
            block_time,
        }
    }

    /// SHA-256 over the SSZ encoding of the receipt.
    pub fn receipt_hash(&self) -> Option<[u8; 32]> {
        let bytes = ssz_rs::serialize(self).ok()?;
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&Sha256::digest(&bytes));
        Some(hash)
    }

    /// Get the state root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root)
    }

    pub fn tx_count(&self) -> u64 {
        self.txs_accepted + self.txs_rejected
    }

    /// True if the block carried no transactions
    pub fn is_empty(&self) -> bool {
        self.tx_count() == 0
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
