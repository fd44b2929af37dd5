//! Key layout of the exchange namespace.
//!
//! ```text
//! order/<id:u64 BE>                 -> OrderRecord
//! order_by_owner/<owner>/<id:u64 BE> -> [1]
//! frozen/<owner>/<denom>            -> u128
//! order_seq                         -> u64 (next id)
//! balance/<owner>/<denom>           -> u128 (bundled account ledger)
//! ```
//!
//! Ids are big-endian so prefix scans come back in ascending id order.
//! Owners and denoms never contain `/`, which keeps `<owner>/` prefixes disjoint.

use crate::types::{Address, Denom};

pub const ORDER_PREFIX: &[u8] = b"order/";
pub const ORDER_BY_OWNER_PREFIX: &[u8] = b"order_by_owner/";
pub const FROZEN_PREFIX: &[u8] = b"frozen/";
pub const BALANCE_PREFIX: &[u8] = b"balance/";
pub const ORDER_SEQ_KEY: &[u8] = b"order_seq";

const SEP: u8 = b'/';

pub fn order_key(id: u64) -> Vec<u8> {
    let mut key = ORDER_PREFIX.to_vec();
    key.extend_from_slice(&id.to_be_bytes());
    key
}

pub fn owner_orders_prefix(owner: &Address) -> Vec<u8> {
    let mut key = ORDER_BY_OWNER_PREFIX.to_vec();
    key.extend_from_slice(owner.as_str().as_bytes());
    key.push(SEP);
    key
}

pub fn owner_order_key(owner: &Address, id: u64) -> Vec<u8> {
    let mut key = owner_orders_prefix(owner);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

/// Trailing big-endian id of an `order/` or `order_by_owner/` key.
pub fn id_from_key(key: &[u8]) -> Option<u64> {
    let tail = key.len().checked_sub(8).map(|start| &key[start..])?;
    let bytes: [u8; 8] = tail.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

pub fn frozen_prefix(owner: &Address) -> Vec<u8> {
    let mut key = FROZEN_PREFIX.to_vec();
    key.extend_from_slice(owner.as_str().as_bytes());
    key.push(SEP);
    key
}

pub fn frozen_key(owner: &Address, denom: &Denom) -> Vec<u8> {
    let mut key = frozen_prefix(owner);
    key.extend_from_slice(denom.as_str().as_bytes());
    key
}

pub fn balance_key(owner: &Address, denom: &Denom) -> Vec<u8> {
    let mut key = BALANCE_PREFIX.to_vec();
    key.extend_from_slice(owner.as_str().as_bytes());
    key.push(SEP);
    key.extend_from_slice(denom.as_str().as_bytes());
    key
}

/// Split `<prefix><owner>/<denom>` back into its parts.
pub fn split_owner_denom(key: &[u8], prefix: &[u8]) -> Option<(Address, Denom)> {
    let rest = key.strip_prefix(prefix)?;
    let sep = rest.iter().position(|b| *b == SEP)?;
    let owner = std::str::from_utf8(&rest[..sep]).ok()?;
    let denom = std::str::from_utf8(&rest[sep + 1..]).ok()?;
    Some((Address::from(owner), Denom::from(denom)))
}
