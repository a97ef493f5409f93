//! Hash-preimage lock with a designated signer.
//!
//! The witness script is
//!
//! ```text
//! OP_SHA256 <32-byte commitment> OP_EQUALVERIFY <33-byte pubkey> OP_CHECKSIG
//! ```
//!
//! and is spent by the witness `[signature, secret, witness script]`. Every
//! opcode sits at a fixed offset, so the script is handled as a fixed-layout
//! record rather than by general script parsing.
use crate::address;
use crate::network::Network;
use crate::script::Script;
use crate::script::op_codes::{OP_CHECKSIG, OP_EQUALVERIFY, OP_PUSH, OP_SHA256};
use crate::transaction::p2wsh;
use crate::util::{Error, Result, decode_hex_array, sha256};
use secp256k1::PublicKey;
use std::fmt;

/// Length of a commitment (SHA-256 digest).
pub const COMMITMENT_LEN: usize = 32;
/// Length of a compressed public key.
pub const PUBKEY_LEN: usize = 33;

/// Offset of the commitment push opcode.
pub const COMMITMENT_PUSH_OFFSET: usize = 1;
/// Offset of the commitment bytes.
pub const COMMITMENT_OFFSET: usize = 2;
/// Offset of OP_EQUALVERIFY.
pub const EQUALVERIFY_OFFSET: usize = COMMITMENT_OFFSET + COMMITMENT_LEN;
/// Offset of the public key push opcode.
pub const PUBKEY_PUSH_OFFSET: usize = EQUALVERIFY_OFFSET + 1;
/// Offset of the public key bytes.
pub const PUBKEY_OFFSET: usize = PUBKEY_PUSH_OFFSET + 1;
/// Offset of OP_CHECKSIG.
pub const CHECKSIG_OFFSET: usize = PUBKEY_OFFSET + PUBKEY_LEN;
/// Total witness script length.
pub const SCRIPT_LEN: usize = CHECKSIG_OFFSET + 1;

/// Commitment and signer behind a hash-locked output.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashLock {
    /// SHA-256 digest the secret must hash to.
    pub commitment: [u8; COMMITMENT_LEN],
    /// Compressed public key that must sign the spend.
    pub pubkey: [u8; PUBKEY_LEN],
}

impl HashLock {
    /// Creates a lock from a commitment and a compressed public key.
    ///
    /// # Errors
    /// `Error::InvalidKeyLength` unless the key is 33 bytes, and
    /// `Error::Secp256k1Error` if it is not a point on the curve.
    pub fn new(commitment: [u8; COMMITMENT_LEN], pubkey: &[u8]) -> Result<HashLock> {
        let pubkey: [u8; PUBKEY_LEN] = pubkey.try_into().map_err(|_| Error::InvalidKeyLength(pubkey.len()))?;
        PublicKey::from_slice(&pubkey)?;
        Ok(HashLock { commitment, pubkey })
    }

    /// Creates a lock committing to `sha256(secret)`.
    pub fn from_secret(secret: &[u8], pubkey: &[u8]) -> Result<HashLock> {
        HashLock::new(sha256(secret), pubkey)
    }

    /// Serializes the witness script.
    #[must_use]
    pub fn witness_script(&self) -> Script {
        let mut script = Script(Vec::with_capacity(SCRIPT_LEN));
        script.append(OP_SHA256);
        script.append(OP_PUSH + COMMITMENT_LEN as u8);
        script.append_slice(&self.commitment);
        script.append(OP_EQUALVERIFY);
        script.append(OP_PUSH + PUBKEY_LEN as u8);
        script.append_slice(&self.pubkey);
        script.append(OP_CHECKSIG);
        script
    }

    /// P2WSH output script paying to this lock.
    #[must_use]
    #[inline]
    pub fn output_script(&self) -> Script {
        p2wsh::create_lock_script(&self.witness_script().0)
    }

    /// Bech32 address of the output script on `network`.
    pub fn address(&self, network: Network) -> Result<String> {
        address::encode_p2wsh_address(&sha256(&self.witness_script().0), network)
    }

    /// Parses a witness script, checking its length and every opcode position.
    ///
    /// # Errors
    /// `Error::MalformedScript` if any byte outside the commitment and key differs.
    pub fn parse(script: &[u8]) -> Result<HashLock> {
        if script.len() != SCRIPT_LEN {
            return Err(Error::MalformedScript(format!(
                "expected {} bytes, got {}",
                SCRIPT_LEN,
                script.len()
            )));
        }
        if script[CHECKSIG_OFFSET] != OP_CHECKSIG {
            return Err(Error::MalformedScript(format!(
                "expected OP_CHECKSIG at offset {}",
                CHECKSIG_OFFSET
            )));
        }
        let commitment = extract_commitment(script)?;
        let pubkey = extract_pubkey(script)?;
        HashLock::new(commitment, &pubkey)
    }

    /// Parses a hex-encoded witness script.
    pub fn from_hex(s: &str) -> Result<HashLock> {
        HashLock::parse(&hex::decode(s.trim())?)
    }
}

impl fmt::Debug for HashLock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HashLock")
            .field("commitment", &hex::encode(self.commitment))
            .field("pubkey", &hex::encode(self.pubkey))
            .finish()
    }
}

/// Returns the 32-byte commitment of a hash-lock witness script.
///
/// # Errors
/// `Error::MalformedScript` unless the script starts `a8 20` followed by 32 bytes.
pub fn extract_commitment(script: &[u8]) -> Result<[u8; COMMITMENT_LEN]> {
    if script.len() < EQUALVERIFY_OFFSET
        || script[0] != OP_SHA256
        || script[COMMITMENT_PUSH_OFFSET] != OP_PUSH + COMMITMENT_LEN as u8
    {
        return Err(Error::MalformedScript("expected OP_SHA256 <32 bytes>".to_string()));
    }
    let mut commitment = [0; COMMITMENT_LEN];
    commitment.copy_from_slice(&script[COMMITMENT_OFFSET..EQUALVERIFY_OFFSET]);
    Ok(commitment)
}

/// Returns the 33-byte public key of a hash-lock witness script.
///
/// # Errors
/// `Error::MalformedScript` unless `88 21` follows the commitment and 33 key bytes are present.
pub fn extract_pubkey(script: &[u8]) -> Result<[u8; PUBKEY_LEN]> {
    if script.len() < CHECKSIG_OFFSET
        || script[EQUALVERIFY_OFFSET] != OP_EQUALVERIFY
        || script[PUBKEY_PUSH_OFFSET] != OP_PUSH + PUBKEY_LEN as u8
    {
        return Err(Error::MalformedScript(
            "expected OP_EQUALVERIFY <33-byte pubkey> after the commitment".to_string(),
        ));
    }
    let mut pubkey = [0; PUBKEY_LEN];
    pubkey.copy_from_slice(&script[PUBKEY_OFFSET..CHECKSIG_OFFSET]);
    Ok(pubkey)
}

/// Checks that `sha256(secret)` equals the commitment.
///
/// # Errors
/// `Error::SecretMismatch` carrying both digests in hex.
pub fn verify_secret(secret: &[u8], commitment: &[u8; COMMITMENT_LEN]) -> Result<()> {
    let actual = sha256(secret);
    if actual != *commitment {
        return Err(Error::SecretMismatch {
            expected: hex::encode(commitment),
            actual: hex::encode(actual),
        });
    }
    Ok(())
}

/// Hex form of [`verify_secret`]. Digits of either case are accepted.
pub fn verify_secret_hex(secret: &str, commitment: &str) -> Result<()> {
    let secret = hex::decode(secret.trim())?;
    let commitment: [u8; COMMITMENT_LEN] = decode_hex_array(commitment, "commitment")?;
    verify_secret(&secret, &commitment)
}

/// Checks that the signing key is the key embedded in the script.
///
/// # Errors
/// `Error::KeyMismatch` carrying both keys in hex.
pub fn verify_key_ownership(pubkey: &[u8], script_pubkey: &[u8]) -> Result<()> {
    if pubkey != script_pubkey {
        return Err(Error::KeyMismatch {
            in_script: hex::encode(script_pubkey),
            provided: hex::encode(pubkey),
        });
    }
    Ok(())
}
