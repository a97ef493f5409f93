//! Building, signing and redeeming hash-locked P2WSH outputs.
//!
//! Lock funds and later redeem them:
//!
//! ```no_run
//! use hashlock::network::Network;
//! use hashlock::transaction::hashlock::HashLock;
//! use hashlock::transaction::redeem::{RedeemRequest, redeem};
//! use hashlock::transaction::builder::{PriorOutput, SendAmount};
//! use hashlock::tx::OutPoint;
//! use hashlock::wallet::KeyPair;
//! # fn main() -> hashlock::util::Result<()> {
//! let (key, network) = KeyPair::from_wif("cTShDrKtShxhLiERY8kBD5cdFrLW3XmkysVPRH9QhkhkLFoehVTY")?;
//! let secret = b"preimage".to_vec();
//! let lock = HashLock::from_secret(&secret, &key.pubkey())?;
//! println!("fund {}", lock.address(network)?);
//!
//! let request = RedeemRequest::new(
//!     lock.witness_script().0,
//!     secret,
//!     key,
//!     PriorOutput { outpoint: OutPoint::from_txid(&"00".repeat(32), 0)?, satoshis: 10_000 },
//!     hashlock::address::decode_address("tb1qswn95gn7h3zmcawkrhz22srak2tt29zj7c3sgm", network)?,
//!     SendAmount::AllLessFee(500),
//! );
//! println!("{}", redeem(&request)?.tx.to_hex());
//! # Ok(())
//! # }
//! ```
pub mod builder;
pub mod hashlock;
pub mod p2wsh;
pub mod redeem;
pub mod sighash;
pub mod template;

use crate::util::{Error, Hash256, Result};
use secp256k1::{Message, Secp256k1, SecretKey};

/// Generates a low-S DER-encoded ECDSA signature followed by the sighash type byte.
///
/// Signing is deterministic (RFC6979).
///
/// # Errors
/// `Error::SigningFailure` if the private key is not a valid secp256k1 scalar.
pub fn generate_signature(private_key: &[u8; 32], sighash: &Hash256, sighash_type: u8) -> Result<Vec<u8>> {
    let secp = Secp256k1::signing_only();
    let secret_key = SecretKey::from_byte_array(*private_key)
        .map_err(|_| Error::SigningFailure("Private key is not a valid scalar".to_string()))?;
    let message = Message::from_digest(sighash.0);
    let mut signature = secp.sign_ecdsa(message, &secret_key);
    signature.normalize_s();
    let mut der = signature.serialize_der().to_vec();
    der.push(sighash_type);
    Ok(der)
}
