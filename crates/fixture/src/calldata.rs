//! ABI call payloads recognised in fixtures.
use alloy_primitives::{Address, Bytes, U256};

use crate::FixtureTransaction;

/// `transfer(address,uint256)`
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// `mint()`
pub const MINT_SELECTOR: [u8; 4] = [0x12, 0x49, 0xc5, 0x8b];

/// Length of a `transfer(address,uint256)` payload: selector and two words.
const TRANSFER_LEN: usize = 4 + 32 + 32;

/// What a transaction does, as far as value flow is concerned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// Non-zero ether value sent to `to`.
    NativeTransfer {
        /// Recipient, `None` for contract creation.
        to: Option<Address>,
        /// Value in wei.
        value: U256,
    },
    /// ERC20 `transfer` call.
    TokenTransfer {
        /// Token recipient.
        to: Address,
        /// Amount in token base units.
        amount: U256,
    },
    /// Token `mint()` call.
    Mint,
    /// Anything else.
    Unrecognized,
}

impl Payload {
    /// Classifies a transaction. Ether value takes precedence over the payload.
    pub fn classify(tx: &FixtureTransaction) -> Self {
        if !tx.value.is_zero() {
            return Self::NativeTransfer {
                to: tx.to,
                value: tx.value,
            };
        }
        match tx.selector() {
            Some(TRANSFER_SELECTOR) => decode_transfer(&tx.data).unwrap_or(Self::Unrecognized),
            Some(MINT_SELECTOR) => Self::Mint,
            _ => Self::Unrecognized,
        }
    }
}

/// Decodes `transfer(to, amount)`. Everything after the recipient word is read
/// as one big-endian amount, so trailing bytes beyond the second word are part
/// of it. Amounts wider than 256 bits are not recognised.
fn decode_transfer(data: &[u8]) -> Option<Payload> {
    if data.len() < TRANSFER_LEN {
        return None;
    }
    let to = Address::from_slice(&data[16..36]);
    let tail = &data[36..];
    let start = tail.iter().position(|b| *b != 0).unwrap_or(tail.len());
    let amount = U256::try_from_be_slice(&tail[start..])?;
    Some(Payload::TokenTransfer { to, amount })
}

/// Encodes `transfer(to, amount)`.
pub fn encode_transfer(to: Address, amount: U256) -> Bytes {
    let mut data = Vec::with_capacity(TRANSFER_LEN);
    data.extend_from_slice(&TRANSFER_SELECTOR);
    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(to.as_slice());
    data.extend_from_slice(&amount.to_be_bytes::<32>());
    data.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::ONE_ETHER;
    use alloy_primitives::{address, hex};

    const RECEIVER: Address = address!("1f9090aae28b8a3dceadf281b0f12828e676c326");

    fn tx(value: u128, data: Bytes) -> FixtureTransaction {
        FixtureTransaction {
            sender: address!("a94f5374fce5edbc8e2a8697c15331677e6ebf0b"),
            to: Some(address!("b30df92bb107e6f1e46f7df4fd31a316ceb4e7d9")),
            value: U256::from(value),
            data,
            ..Default::default()
        }
    }

    #[test]
    fn transfer_layout() {
        let data = encode_transfer(RECEIVER, U256::from(ONE_ETHER));
        assert_eq!(
            hex::encode(&data),
            "a9059cbb\
             0000000000000000000000001f9090aae28b8a3dceadf281b0f12828e676c326\
             0000000000000000000000000000000000000000000000000de0b6b3a7640000"
        );
    }

    #[test]
    fn classify_token_transfer() {
        let data = encode_transfer(RECEIVER, U256::from(ONE_ETHER));
        assert_eq!(
            Payload::classify(&tx(0, data)),
            Payload::TokenTransfer {
                to: RECEIVER,
                amount: U256::from(ONE_ETHER)
            }
        );
    }

    #[test]
    fn value_wins_over_payload() {
        let data = encode_transfer(RECEIVER, U256::from(1));
        assert!(matches!(
            Payload::classify(&tx(ONE_ETHER, data)),
            Payload::NativeTransfer { value, .. } if value == U256::from(ONE_ETHER)
        ));
    }

    #[test]
    fn classify_mint_and_others() {
        assert_eq!(
            Payload::classify(&tx(0, MINT_SELECTOR.to_vec().into())),
            Payload::Mint
        );
        assert_eq!(
            Payload::classify(&tx(0, Bytes::new())),
            Payload::Unrecognized
        );
        assert_eq!(
            Payload::classify(&tx(0, hex!("095ea7b3").to_vec().into())),
            Payload::Unrecognized
        );
    }

    #[test]
    fn truncated_transfer_is_unrecognized() {
        let data = encode_transfer(RECEIVER, U256::from(1));
        let short: Bytes = data[..40].to_vec().into();
        assert_eq!(Payload::classify(&tx(0, short)), Payload::Unrecognized);
    }

    #[test]
    fn trailing_bytes_extend_the_amount() {
        let mut data = encode_transfer(RECEIVER, U256::ZERO).to_vec();
        data[67] = 0x01;
        data.push(0x00);
        assert_eq!(
            Payload::classify(&tx(0, data.into())),
            Payload::TokenTransfer {
                to: RECEIVER,
                amount: U256::from(0x0100)
            }
        );
    }

    #[test]
    fn oversized_amount_is_unrecognized() {
        let mut data = encode_transfer(RECEIVER, U256::MAX).to_vec();
        data.push(0xff);
        assert_eq!(Payload::classify(&tx(0, data.into())), Payload::Unrecognized);
    }
}
