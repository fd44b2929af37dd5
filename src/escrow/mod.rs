//! Escrow ledger ("frozen funds").
//!
//! ## Accounting
//!
//! Value moves between two states:
//!
//! ```text
//!             freeze
//! spendable ---------> frozen(owner, denom)
//!           <---------
//!             unfreeze
//!
//! frozen(owner, denom) --transfer_spendable--> spendable(to)
//! ```
//!
//! The escrow never credits a frozen balance it did not first debit from a
//! spendable one, so it can never hold more than it received. A frozen balance
//! that would go negative is an invariant violation, not a user error.
//!
//! Frozen entries that reach zero are deleted from the store.

pub mod bank;

pub use bank::{BankKeeper, StoreBank};

use crate::error::ExchangeError;
use crate::store::codec::{decode_amount, encode_amount};
use crate::store::keys::{frozen_key, frozen_prefix, split_owner_denom, FROZEN_PREFIX};
use crate::store::KvStore;
use crate::types::{Address, Amount, Coin, Denom};

/// Escrow operations over a [`BankKeeper`].
pub struct Escrow<'a, B: BankKeeper> {
    bank: &'a B,
}

impl<'a, B: BankKeeper> Escrow<'a, B> {
    pub fn new(bank: &'a B) -> Self {
        Self { bank }
    }

    /// Move `coin` from `owner`'s spendable balance into escrow.
    ///
    /// # Errors
    ///
    /// * `InsufficientBalance` - spendable balance is below `coin.amount`
    pub fn freeze(
        &self,
        store: &mut dyn KvStore,
        owner: &Address,
        coin: &Coin,
    ) -> Result<(), ExchangeError> {
        self.bank.subtract_coins(store, owner, coin)?;

        let current = frozen(store, owner, &coin.denom)?;
        let updated = current.checked_add(coin.amount).ok_or_else(|| {
            ExchangeError::invariant(format!("frozen overflow for {} {}", owner, coin.denom))
        })?;
        write_frozen(store, owner, &coin.denom, updated)
    }

    /// Return `coin` from escrow to `owner`'s spendable balance.
    ///
    /// # Errors
    ///
    /// * `InvariantViolation` - escrow holds less than `coin.amount`
    pub fn unfreeze(
        &self,
        store: &mut dyn KvStore,
        owner: &Address,
        coin: &Coin,
    ) -> Result<(), ExchangeError> {
        debit_frozen(store, owner, coin)?;
        self.bank.add_coins(store, owner, coin)
    }

    /// Pay `coin` out of `from_escrow_owner`'s escrow straight to `to`.
    ///
    /// # Errors
    ///
    /// * `InvariantViolation` - escrow holds less than `coin.amount`
    pub fn transfer_spendable(
        &self,
        store: &mut dyn KvStore,
        from_escrow_owner: &Address,
        to: &Address,
        coin: &Coin,
    ) -> Result<(), ExchangeError> {
        debit_frozen(store, from_escrow_owner, coin)?;
        self.bank.add_coins(store, to, coin)
    }
}

// ===== Reads =====

/// Frozen amount of `denom` held for `owner`; zero if none.
pub fn frozen(store: &dyn KvStore, owner: &Address, denom: &Denom) -> Result<Amount, ExchangeError> {
    match store.get(&frozen_key(owner, denom)) {
        Some(bytes) => decode_amount(&bytes),
        None => Ok(0),
    }
}

/// All frozen funds of `owner`, ascending by denom.
pub fn frozen_by_owner(store: &dyn KvStore, owner: &Address) -> Result<Vec<Coin>, ExchangeError> {
    store
        .prefix_scan(&frozen_prefix(owner))
        .into_iter()
        .map(|(key, value)| {
            let (_, denom) = split_owner_denom(&key, FROZEN_PREFIX)
                .ok_or_else(|| ExchangeError::invariant("malformed frozen key"))?;
            Ok(Coin {
                denom,
                amount: decode_amount(&value)?,
            })
        })
        .collect()
}

/// Every frozen entry in the store, in key order.
pub fn all_frozen(store: &dyn KvStore) -> Result<Vec<(Address, Coin)>, ExchangeError> {
    store
        .prefix_scan(FROZEN_PREFIX)
        .into_iter()
        .map(|(key, value)| {
            let (owner, denom) = split_owner_denom(&key, FROZEN_PREFIX)
                .ok_or_else(|| ExchangeError::invariant("malformed frozen key"))?;
            Ok((
                owner,
                Coin {
                    denom,
                    amount: decode_amount(&value)?,
                },
            ))
        })
        .collect()
}

// ===== Writes =====

fn debit_frozen(store: &mut dyn KvStore, owner: &Address, coin: &Coin) -> Result<(), ExchangeError> {
    let current = frozen(store, owner, &coin.denom)?;
    let updated = current.checked_sub(coin.amount).ok_or_else(|| {
        ExchangeError::invariant(format!(
            "frozen {}{} of {} cannot cover {}",
            current, coin.denom, owner, coin.amount
        ))
    })?;
    write_frozen(store, owner, &coin.denom, updated)
}

fn write_frozen(
    store: &mut dyn KvStore,
    owner: &Address,
    denom: &Denom,
    amount: Amount,
) -> Result<(), ExchangeError> {
    let key = frozen_key(owner, denom);
    if amount == 0 {
        store.delete(&key);
    } else {
        store.set(&key, encode_amount(amount)?);
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
