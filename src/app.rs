//! Host harness driving the exchange block by block.
//!
//! ## Block flow
//!
//! ```text
//! begin_block(height, time)
//!   deliver_tx(msg) *      -- each in its own CacheStore overlay
//! commit() -> BlockReceipt -- invariants, snapshot, state root
//! ```
//!
//! Two stores are kept: `working` receives accepted transactions as they are
//! delivered, `committed` is the snapshot queries read. `commit` copies the
//! former into the latter.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::ExchangeError;
use crate::escrow::{BankKeeper, StoreBank};
use crate::keeper::{check_invariants, ExchangeParams, HandleResult, Keeper};
use crate::query::Querier;
use crate::store::{CacheStore, MemStore};
use crate::types::{Address, BlockReceipt, Coin, Context, Msg};

/// Outcome of one delivered transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TxOutcome {
    Accepted(HandleResult),
    Rejected { code: u32, log: String },
}

impl TxOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, TxOutcome::Accepted(_))
    }
}

/// Replicated exchange application.
pub struct ExchangeApp<B: BankKeeper = StoreBank> {
    keeper: Keeper<B>,
    working: MemStore,
    committed: MemStore,
    ctx: Context,
    txs_accepted: u64,
    txs_rejected: u64,
}

impl ExchangeApp<StoreBank> {
    pub fn new(params: ExchangeParams) -> Self {
        Self::with_bank(StoreBank::new(), params)
    }
}

impl<B: BankKeeper> ExchangeApp<B> {
    pub fn with_bank(bank: B, params: ExchangeParams) -> Self {
        Self {
            keeper: Keeper::new(bank, params),
            working: MemStore::new(),
            committed: MemStore::new(),
            ctx: Context::default(),
            txs_accepted: 0,
            txs_rejected: 0,
        }
    }

    pub fn keeper(&self) -> &Keeper<B> {
        &self.keeper
    }

    pub fn context(&self) -> Context {
        self.ctx
    }

    /// Last committed state.
    pub fn committed_store(&self) -> &MemStore {
        &self.committed
    }

    /// Credit an account outside of any transaction (genesis funding).
    ///
    /// Visible to queries after the next commit.
    pub fn fund(&mut self, owner: &Address, coin: &Coin) -> Result<(), ExchangeError> {
        owner.validate()?;
        coin.denom.validate()?;
        self.keeper.bank().add_coins(&mut self.working, owner, coin)
    }

    pub fn begin_block(&mut self, height: u64, block_time: u64) {
        self.ctx = Context::new(height, block_time);
        self.txs_accepted = 0;
        self.txs_rejected = 0;
    }

    /// Apply one message atomically.
    ///
    /// User errors come back as `Ok(TxOutcome::Rejected)` with no state
    /// change. An invariant violation is returned as `Err` and also leaves
    /// state untouched; the host decides whether to halt.
    pub fn deliver_tx(&mut self, msg: &Msg) -> Result<TxOutcome, ExchangeError> {
        let result = msg.validate_basic().and_then(|()| {
            let mut cache = CacheStore::new(&self.working);
            let result = self.keeper.handle(&mut cache, &self.ctx, msg)?;
            Ok((result, cache.into_writes()))
        });

        match result {
            Ok((result, writes)) => {
                self.working.apply(writes);
                self.txs_accepted += 1;
                Ok(TxOutcome::Accepted(result))
            }
            Err(err) if err.is_invariant_violation() => {
                error!(
                    height = self.ctx.height,
                    msg = msg.kind(),
                    sender = %msg.sender(),
                    error = %err,
                    "invariant violation"
                );
                Err(err)
            }
            Err(err) => {
                warn!(
                    height = self.ctx.height,
                    msg = msg.kind(),
                    sender = %msg.sender(),
                    code = err.code(),
                    error = %err,
                    "tx rejected"
                );
                self.txs_rejected += 1;
                Ok(TxOutcome::Rejected {
                    code: err.code(),
                    log: err.to_string(),
                })
            }
        }
    }

    /// Check invariants, publish the working state and produce a receipt.
    pub fn commit(&mut self) -> Result<BlockReceipt, ExchangeError> {
        if let Err(err) = check_invariants(&self.working) {
            error!(height = self.ctx.height, error = %err, "invariant check failed at commit");
            return Err(err);
        }

        self.committed = self.working.clone();
        let receipt = BlockReceipt::new(
            self.ctx.height,
            self.txs_accepted,
            self.txs_rejected,
            self.committed.state_root(),
            self.ctx.block_time,
        );

        info!(
            height = receipt.height,
            accepted = receipt.txs_accepted,
            rejected = receipt.txs_rejected,
            state_root = %receipt.state_root_hex(),
            "block committed"
        );
        Ok(receipt)
    }

    /// Queries over the last committed snapshot.
    pub fn querier(&self) -> Querier<'_> {
        Querier::new(&self.committed)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
