//! TOML job files for locking and redeeming.
//!
//! Secrets, keys and the prior output have no defaults; only the transaction
//! version, sequence and lock time fall back to the builder's values.

use crate::address::decode_address;
use crate::network::Network;
use crate::transaction::builder::{DEFAULT_SEQUENCE, DEFAULT_VERSION, PriorOutput, SendAmount};
use crate::transaction::hashlock::HashLock;
use crate::transaction::redeem::RedeemRequest;
use crate::tx::OutPoint;
use crate::util::{Error, Result, decode_hex_array, sha256};
use crate::wallet::KeyPair;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("reading {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

/// Decodes the WIF and checks it was made for `network`.
fn key_for_network(wif: &str, network: Network) -> Result<KeyPair> {
    let (key, wif_network) = KeyPair::from_wif(wif)?;
    let compatible = match network {
        Network::Mainnet => wif_network == Network::Mainnet,
        Network::Testnet | Network::Regtest => wif_network == Network::Testnet,
    };
    if !compatible {
        return Err(Error::BadArgument(format!("WIF key is for {}, job is for {}", wif_network, network)));
    }
    Ok(key)
}

/// Parameters for deriving a lock script and its address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LockConfig {
    /// Network the address is for.
    pub network: Network,
    /// Secret in hex; the commitment is its SHA-256.
    #[serde(default)]
    pub secret: Option<String>,
    /// Commitment in hex, when the secret is held elsewhere.
    #[serde(default)]
    pub hash: Option<String>,
    /// Compressed public key in hex.
    #[serde(default)]
    pub pubkey: Option<String>,
    /// Private key in WIF; its public key is used.
    #[serde(default)]
    pub wif: Option<String>,
}

impl LockConfig {
    /// Reads a lock job from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<LockConfig> {
        load(path.as_ref())
    }

    /// Builds the lock from exactly one commitment source and one key source.
    pub fn to_hash_lock(&self) -> Result<HashLock> {
        let commitment = match (&self.secret, &self.hash) {
            (Some(secret), None) => sha256(&hex::decode(secret.trim())?),
            (None, Some(hash)) => decode_hex_array(hash, "hash")?,
            _ => return Err(Error::BadArgument("Give exactly one of secret or hash".to_string())),
        };
        let pubkey = match (&self.pubkey, &self.wif) {
            (Some(pubkey), None) => hex::decode(pubkey.trim())?,
            (None, Some(wif)) => key_for_network(wif, self.network)?.pubkey().to_vec(),
            _ => return Err(Error::BadArgument("Give exactly one of pubkey or wif".to_string())),
        };
        HashLock::new(commitment, &pubkey)
    }
}

impl FromStr for LockConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<LockConfig> {
        Ok(toml::from_str(s)?)
    }
}

/// The output being redeemed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrevoutConfig {
    /// Funding transaction id, as shown by explorers and RPC.
    pub txid: String,
    /// Output index in the funding transaction.
    pub vout: u32,
    /// Output value in satoshis.
    pub amount: u64,
}

/// Parameters for redeeming a hash-locked output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedeemConfig {
    /// Network of the destination and key.
    pub network: Network,
    /// Witness script in hex.
    pub witness_script: String,
    /// Secret in hex.
    pub secret: String,
    /// Signing key in WIF.
    pub wif: String,
    /// Destination address.
    pub destination: String,
    /// Fee in satoshis; the rest of the prior output is sent.
    #[serde(default)]
    pub fee: Option<u64>,
    /// Exact amount to send in satoshis; the remainder is the fee.
    #[serde(default)]
    pub amount: Option<u64>,
    /// Output being spent.
    pub prevout: PrevoutConfig,
    /// Transaction version.
    #[serde(default = "default_values::version")]
    pub version: u32,
    /// Input sequence number.
    #[serde(default = "default_values::sequence")]
    pub sequence: u32,
    /// Transaction lock time.
    #[serde(default)]
    pub lock_time: u32,
}

impl RedeemConfig {
    /// Reads a redeem job from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<RedeemConfig> {
        load(path.as_ref())
    }

    /// Resolves hex, WIF and address fields into a redeem request.
    pub fn to_request(&self) -> Result<RedeemRequest> {
        let amount = match (self.fee, self.amount) {
            (Some(fee), None) => SendAmount::AllLessFee(fee),
            (None, Some(amount)) => SendAmount::Exact(amount),
            _ => return Err(Error::BadArgument("Give exactly one of fee or amount".to_string())),
        };
        let prior = PriorOutput {
            outpoint: OutPoint::from_txid(self.prevout.txid.trim(), self.prevout.vout)?,
            satoshis: self.prevout.amount,
        };
        let mut request = RedeemRequest::new(
            hex::decode(self.witness_script.trim())?,
            hex::decode(self.secret.trim())?,
            key_for_network(&self.wif, self.network)?,
            prior,
            decode_address(&self.destination, self.network)?,
            amount,
        );
        request.version = self.version;
        request.sequence = self.sequence;
        request.lock_time = self.lock_time;
        Ok(request)
    }
}

impl FromStr for RedeemConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<RedeemConfig> {
        Ok(toml::from_str(s)?)
    }
}

mod default_values {
    pub(super) fn version() -> u32 {
        super::DEFAULT_VERSION
    }

    pub(super) fn sequence() -> u32 {
        super::DEFAULT_SEQUENCE
    }
}
