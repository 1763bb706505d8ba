use alloy_primitives::{Address, B256};
use k256::ecdsa::SigningKey;
use rand::Rng;

/// A secp256k1 key pair and the address it controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wallet {
    /// secp256k1 secret scalar.
    pub secret_key: B256,
    /// Address derived from the public key.
    pub address: Address,
}

impl Wallet {
    /// Draws a fresh key from `rng`.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        loop {
            let mut secret = [0u8; 32];
            rng.fill(&mut secret);
            // Zero and keys above the curve order are rejected; retry.
            if let Some(wallet) = Self::from_secret(B256::from(secret)) {
                return wallet;
            }
        }
    }

    /// Derives the address of `secret_key`, `None` if it is not a valid scalar.
    pub fn from_secret(secret_key: B256) -> Option<Self> {
        let key = SigningKey::from_slice(secret_key.as_slice()).ok()?;
        let public_key = key.verifying_key().to_encoded_point(false);
        Some(Self {
            secret_key,
            address: Address::from_raw_public_key(&public_key.as_bytes()[1..]),
        })
    }
}
