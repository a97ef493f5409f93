//! secp256k1 key pair with Wallet Import Format (WIF) support.

use crate::address::encode_segwit_address;
use crate::network::Network;
use crate::util::{Error, Result, sha256d};
use base58::{FromBase58, ToBase58};
use bitcoin_hashes::hash160;
use rand::RngCore;
use rand::rngs::OsRng;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use std::fmt;

/// Suffix marking a WIF key whose public key is compressed.
const COMPRESSED_FLAG: u8 = 0x01;
/// Version byte, 32-byte key, compressed flag, 4-byte checksum.
const WIF_LEN: usize = 38;

/// Private key and its compressed public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KeyPair {
    secret: SecretKey,
    public: PublicKey,
}

impl KeyPair {
    /// Creates a key pair from a 32-byte private scalar.
    ///
    /// # Errors
    /// `Error::BadArgument` if the scalar is zero or not below the curve order.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Result<KeyPair> {
        let secret = SecretKey::from_byte_array(*bytes)
            .map_err(|_| Error::BadArgument("Private key is not a valid scalar".to_string()))?;
        let public = PublicKey::from_secret_key(&Secp256k1::signing_only(), &secret);
        Ok(KeyPair { secret, public })
    }

    /// Generates a fresh key pair from the operating system's RNG.
    pub fn generate() -> KeyPair {
        let mut rng = OsRng;
        loop {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            // Out-of-range scalars occur with probability ~2^-128.
            if let Ok(key) = KeyPair::from_secret_bytes(&bytes) {
                return key;
            }
        }
    }

    /// Decodes a compressed-key WIF string, returning the key and the network it names.
    ///
    /// Testnet and regtest share a version byte; both decode as `Network::Testnet`.
    pub fn from_wif(wif: &str) -> Result<(KeyPair, Network)> {
        let bytes = wif.trim().from_base58()?;
        if bytes.len() == WIF_LEN - 1 {
            return Err(Error::Unsupported("Uncompressed WIF keys".to_string()));
        }
        if bytes.len() != WIF_LEN {
            return Err(Error::BadData(format!("Invalid WIF length: {}", bytes.len())));
        }
        let checksum = sha256d(&bytes[..WIF_LEN - 4]);
        if checksum.0[..4] != bytes[WIF_LEN - 4..] {
            return Err(Error::BadData("Invalid WIF checksum".to_string()));
        }
        if bytes[33] != COMPRESSED_FLAG {
            return Err(Error::BadData(format!("Invalid WIF compression flag: {}", bytes[33])));
        }
        let network = if bytes[0] == Network::Mainnet.wif_version() {
            Network::Mainnet
        } else if bytes[0] == Network::Testnet.wif_version() {
            Network::Testnet
        } else {
            return Err(Error::BadData(format!("Unknown WIF version: 0x{:02x}", bytes[0])));
        };
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&bytes[1..33]);
        Ok((KeyPair::from_secret_bytes(&secret)?, network))
    }

    /// Encodes the private key as compressed-key WIF for `network`.
    #[must_use]
    pub fn to_wif(&self, network: Network) -> String {
        let mut v = Vec::with_capacity(WIF_LEN);
        v.push(network.wif_version());
        v.extend_from_slice(&self.secret.secret_bytes());
        v.push(COMPRESSED_FLAG);
        let checksum = sha256d(&v);
        v.extend_from_slice(&checksum.0[..4]);
        v.to_base58()
    }

    /// Compressed public key.
    #[must_use]
    #[inline]
    pub fn pubkey(&self) -> [u8; 33] {
        self.public.serialize()
    }

    /// Raw private scalar, for signing.
    #[must_use]
    #[inline]
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.secret_bytes()
    }

    /// P2WPKH address of the public key, handy as a redeem destination.
    pub fn p2wpkh_address(&self, network: Network) -> Result<String> {
        let hash = hash160::Hash::hash(&self.pubkey()).to_byte_array();
        encode_segwit_address(network, 0, &hash)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("pubkey", &hex::encode(self.pubkey()))
            .finish_non_exhaustive()
    }
}
