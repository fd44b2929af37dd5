//! SSZ encoding of persisted values.
//!
//! Orders are stored as [`OrderRecord`], a flat SSZ container. Scalars (frozen
//! balances, account balances, the order sequence) are stored as bare SSZ
//! uints, which are fixed-width little-endian.
//!
//! Anything that fails to decode was written by this crate, so a decode
//! failure means the store is corrupt and is reported as an invariant
//! violation.

use ssz_rs::prelude::*;

use crate::error::ExchangeError;
use crate::types::{Address, Amount, Coin, Denom, Order, MAX_ADDRESS_LEN, MAX_DENOM_LEN};

/// Persisted form of an [`Order`].
#[derive(Debug, Clone, PartialEq, Default, SimpleSerialize)]
pub struct OrderRecord {
    pub id: u64,
    pub owner: List<u8, MAX_ADDRESS_LEN>,
    pub supply_denom: List<u8, MAX_DENOM_LEN>,
    pub supply_amount: u128,
    pub target_denom: List<u8, MAX_DENOM_LEN>,
    pub target_amount: u128,
    pub created_at: u64,
}

impl OrderRecord {
    pub fn from_order(order: &Order) -> Result<Self, ExchangeError> {
        Ok(Self {
            id: order.id,
            owner: bytes_list(order.owner.as_str(), "owner")?,
            supply_denom: bytes_list(order.supply.denom.as_str(), "supply denom")?,
            supply_amount: order.supply.amount,
            target_denom: bytes_list(order.target.denom.as_str(), "target denom")?,
            target_amount: order.target.amount,
            created_at: order.created_at,
        })
    }

    pub fn into_order(self) -> Result<Order, ExchangeError> {
        let owner = Address::new(list_string(&self.owner)?);
        let supply = Coin {
            denom: Denom::new(list_string(&self.supply_denom)?),
            amount: self.supply_amount,
        };
        let target = Coin {
            denom: Denom::new(list_string(&self.target_denom)?),
            amount: self.target_amount,
        };
        Ok(Order::new(self.id, owner, supply, target, self.created_at))
    }
}

fn bytes_list<const N: usize>(s: &str, field: &str) -> Result<List<u8, N>, ExchangeError> {
    List::<u8, N>::try_from(s.as_bytes().to_vec())
        .map_err(|_| ExchangeError::invariant(format!("{} exceeds {} bytes", field, N)))
}

fn list_string<const N: usize>(list: &List<u8, N>) -> Result<String, ExchangeError> {
    let bytes: Vec<u8> = list.iter().copied().collect();
    String::from_utf8(bytes).map_err(|_| ExchangeError::invariant("stored string is not utf-8"))
}

// ============================================================================
// Encode / decode
// ============================================================================

pub fn encode_order(order: &Order) -> Result<Vec<u8>, ExchangeError> {
    let record = OrderRecord::from_order(order)?;
    ssz_rs::serialize(&record)
        .map_err(|e| ExchangeError::invariant(format!("encode order {}: {:?}", order.id, e)))
}

pub fn decode_order(bytes: &[u8]) -> Result<Order, ExchangeError> {
    let record: OrderRecord = ssz_rs::deserialize(bytes)
        .map_err(|e| ExchangeError::invariant(format!("decode order: {:?}", e)))?;
    record.into_order()
}

pub fn encode_amount(amount: Amount) -> Result<Vec<u8>, ExchangeError> {
    ssz_rs::serialize(&amount).map_err(|e| ExchangeError::invariant(format!("encode amount: {:?}", e)))
}

pub fn decode_amount(bytes: &[u8]) -> Result<Amount, ExchangeError> {
    ssz_rs::deserialize::<u128>(bytes)
        .map_err(|e| ExchangeError::invariant(format!("decode amount: {:?}", e)))
}

pub fn encode_u64(value: u64) -> Result<Vec<u8>, ExchangeError> {
    ssz_rs::serialize(&value).map_err(|e| ExchangeError::invariant(format!("encode u64: {:?}", e)))
}

pub fn decode_u64(bytes: &[u8]) -> Result<u64, ExchangeError> {
    ssz_rs::deserialize::<u64>(bytes)
        .map_err(|e| ExchangeError::invariant(format!("decode u64: {:?}", e)))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order::new(
            42,
            Address::from("alice"),
            Coin::new("gard", 1000),
            Coin::new("apple", 500),
            1703577600,
        )
    }

    #[test]
    fn test_order_record_preserves_fields() {
        let order = sample_order();
        let bytes = encode_order(&order).expect("Failed to encode");
        let decoded = decode_order(&bytes).expect("Failed to decode");
        assert_eq!(decoded, order);
    }

    #[test]
    fn test_order_encoding_deterministic() {
        let bytes1 = encode_order(&sample_order()).expect("Failed to encode");
        let bytes2 = encode_order(&sample_order()).expect("Failed to encode");
        assert_eq!(bytes1, bytes2);
    }

    #[test]
    fn test_amount_fixed_width() {
        let bytes = encode_amount(7).expect("Failed to encode");
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes[0], 7);
        assert_eq!(decode_amount(&bytes), Ok(7));
    }

    #[test]
    fn test_u64_fixed_width() {
        let bytes = encode_u64(u64::MAX).expect("Failed to encode");
        assert_eq!(bytes.len(), 8);
        assert_eq!(decode_u64(&bytes), Ok(u64::MAX));
    }

    #[test]
    fn test_corrupt_bytes_are_invariant_violations() {
        let err = decode_amount(&[1, 2, 3]).unwrap_err();
        assert!(err.is_invariant_violation());

        let err = decode_order(&[0xFF; 3]).unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn test_oversized_owner_rejected() {
        let mut order = sample_order();
        order.owner = Address::new("a".repeat(MAX_ADDRESS_LEN + 1));
        assert!(encode_order(&order).unwrap_err().is_invariant_violation());
    }
}
