//! Account ledger collaborator.
//!
//! The exchange never owns spendable balances; it asks a [`BankKeeper`] to
//! debit and credit them. [`StoreBank`] keeps balances in the same key-value
//! store as the exchange so that both share one transaction overlay.

use crate::error::ExchangeError;
use crate::store::codec::{decode_amount, encode_amount};
use crate::store::keys::{balance_key, split_owner_denom, BALANCE_PREFIX};
use crate::store::KvStore;
use crate::types::{Address, Amount, Coin, Denom};

/// Spendable-balance ledger consumed by the exchange.
pub trait BankKeeper {
    fn spendable(
        &self,
        store: &dyn KvStore,
        owner: &Address,
        denom: &Denom,
    ) -> Result<Amount, ExchangeError>;

    fn add_coins(
        &self,
        store: &mut dyn KvStore,
        owner: &Address,
        coin: &Coin,
    ) -> Result<(), ExchangeError>;

    /// Fails with `InsufficientBalance` if `owner` holds less than `coin`.
    fn subtract_coins(
        &self,
        store: &mut dyn KvStore,
        owner: &Address,
        coin: &Coin,
    ) -> Result<(), ExchangeError>;

    fn send_coins(
        &self,
        store: &mut dyn KvStore,
        from: &Address,
        to: &Address,
        coin: &Coin,
    ) -> Result<(), ExchangeError> {
        self.subtract_coins(store, from, coin)?;
        self.add_coins(store, to, coin)
    }
}

/// Balances stored under `balance/<owner>/<denom>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreBank;

impl StoreBank {
    pub fn new() -> Self {
        Self
    }

    /// Every non-zero balance of `owner`, ascending by denom.
    pub fn balances(&self, store: &dyn KvStore, owner: &Address) -> Result<Vec<Coin>, ExchangeError> {
        let mut prefix = BALANCE_PREFIX.to_vec();
        prefix.extend_from_slice(owner.as_str().as_bytes());
        prefix.push(b'/');

        store
            .prefix_scan(&prefix)
            .into_iter()
            .map(|(key, value)| {
                let (_, denom) = split_owner_denom(&key, BALANCE_PREFIX)
                    .ok_or_else(|| ExchangeError::invariant("malformed balance key"))?;
                Ok(Coin {
                    denom,
                    amount: decode_amount(&value)?,
                })
            })
            .collect()
    }

    /// Sum of all balances of `denom` across every account.
    pub fn total_supply(&self, store: &dyn KvStore, denom: &Denom) -> Result<Amount, ExchangeError> {
        let mut total: Amount = 0;
        for (key, value) in store.prefix_scan(BALANCE_PREFIX) {
            let (_, key_denom) = split_owner_denom(&key, BALANCE_PREFIX)
                .ok_or_else(|| ExchangeError::invariant("malformed balance key"))?;
            if &key_denom == denom {
                total = total
                    .checked_add(decode_amount(&value)?)
                    .ok_or_else(|| ExchangeError::invariant("balance supply overflow"))?;
            }
        }
        Ok(total)
    }

    fn write(
        &self,
        store: &mut dyn KvStore,
        owner: &Address,
        denom: &Denom,
        amount: Amount,
    ) -> Result<(), ExchangeError> {
        let key = balance_key(owner, denom);
        if amount == 0 {
            store.delete(&key);
        } else {
            store.set(&key, encode_amount(amount)?);
        }
        Ok(())
    }
}

impl BankKeeper for StoreBank {
    fn spendable(
        &self,
        store: &dyn KvStore,
        owner: &Address,
        denom: &Denom,
    ) -> Result<Amount, ExchangeError> {
        match store.get(&balance_key(owner, denom)) {
            Some(bytes) => decode_amount(&bytes),
            None => Ok(0),
        }
    }

    fn add_coins(
        &self,
        store: &mut dyn KvStore,
        owner: &Address,
        coin: &Coin,
    ) -> Result<(), ExchangeError> {
        if coin.is_zero() {
            return Ok(());
        }
        let current = self.spendable(store, owner, &coin.denom)?;
        let updated = current.checked_add(coin.amount).ok_or_else(|| {
            ExchangeError::invariant(format!("balance overflow for {} {}", owner, coin.denom))
        })?;
        self.write(store, owner, &coin.denom, updated)
    }

    fn subtract_coins(
        &self,
        store: &mut dyn KvStore,
        owner: &Address,
        coin: &Coin,
    ) -> Result<(), ExchangeError> {
        if coin.is_zero() {
            return Ok(());
        }
        let current = self.spendable(store, owner, &coin.denom)?;
        if current < coin.amount {
            return Err(ExchangeError::InsufficientBalance {
                owner: owner.clone(),
                denom: coin.denom.clone(),
                required: coin.amount,
                available: current,
            });
        }
        self.write(store, owner, &coin.denom, current - coin.amount)
    }
}
