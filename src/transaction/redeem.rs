//! End-to-end redemption of a hash-locked output.
//!
//! [`redeem`] validates the secret and key against the witness script, builds
//! the spend, signs its BIP143 digest, packs the witness and finally runs the
//! witness through the script checker. Nothing is returned unless every step
//! succeeds.
use crate::script::{Script, verify_p2wsh_input};
use crate::transaction::builder::{DEFAULT_SEQUENCE, DEFAULT_VERSION, PriorOutput, SendAmount, TxBuilder};
use crate::transaction::generate_signature;
use crate::transaction::hashlock::{self, HashLock};
use crate::transaction::p2wsh;
use crate::transaction::sighash::{SIGHASH_ALL, SigHashCache, sighash};
use crate::transaction::template::ScriptTemplate;
use crate::tx::{Tx, TxOut};
use crate::util::Result;
use crate::wallet::KeyPair;
use log::{debug, info};

/// Everything needed to spend one hash-locked output.
#[derive(Debug, Clone)]
pub struct RedeemRequest {
    /// Witness script the output commits to.
    pub witness_script: Vec<u8>,
    /// Preimage of the commitment.
    pub secret: Vec<u8>,
    /// Key matching the public key in the script.
    pub key: KeyPair,
    /// Output being spent.
    pub prior: PriorOutput,
    /// Output script receiving the funds.
    pub destination: Script,
    /// Amount rule.
    pub amount: SendAmount,
    /// Transaction version.
    pub version: u32,
    /// Input sequence number.
    pub sequence: u32,
    /// Transaction lock time.
    pub lock_time: u32,
}

impl RedeemRequest {
    /// Creates a request with the builder's default version, sequence and lock time.
    pub fn new(
        witness_script: Vec<u8>,
        secret: Vec<u8>,
        key: KeyPair,
        prior: PriorOutput,
        destination: Script,
        amount: SendAmount,
    ) -> Self {
        Self {
            witness_script,
            secret,
            key,
            prior,
            destination,
            amount,
            version: DEFAULT_VERSION,
            sequence: DEFAULT_SEQUENCE,
            lock_time: 0,
        }
    }
}

/// Signed spend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redeemed {
    /// Fully signed transaction.
    pub tx: Tx,
    /// Fee paid, in satoshis.
    pub fee: u64,
}

/// Checks the secret and key against the witness script without building anything.
///
/// # Errors
/// `MalformedScript`, `SecretMismatch` or `KeyMismatch`.
pub fn validate(witness_script: &[u8], secret: &[u8], key: &KeyPair) -> Result<HashLock> {
    let lock = HashLock::parse(witness_script)?;
    hashlock::verify_secret(secret, &lock.commitment)?;
    hashlock::verify_key_ownership(&key.pubkey(), &lock.pubkey)?;
    Ok(lock)
}

/// Builds, signs and self-checks the spending transaction.
pub fn redeem(request: &RedeemRequest) -> Result<Redeemed> {
    validate(&request.witness_script, &request.secret, &request.key)?;
    let template = ScriptTemplate::detect(&request.witness_script)?;
    debug!("secret and key match the witness script");

    let unsigned = TxBuilder::new(request.prior, request.destination.clone(), request.amount)
        .with_version(request.version)
        .with_sequence(request.sequence)
        .with_lock_time(request.lock_time)
        .build()?;
    let mut tx = unsigned.tx;

    let mut cache = SigHashCache::new();
    let digest = sighash(
        &tx,
        0,
        &request.witness_script,
        request.prior.satoshis,
        SIGHASH_ALL,
        &mut cache,
    )?;
    let signature = generate_signature(&request.key.secret_bytes(), &digest, SIGHASH_ALL)?;
    tx.inputs[0].witness = template.witness(signature, &request.secret, &request.witness_script);

    let prev_out = TxOut {
        satoshis: request.prior.satoshis,
        lock_script: p2wsh::create_lock_script(&request.witness_script),
    };
    verify_p2wsh_input(&tx, 0, &prev_out, &mut cache)?;

    info!(
        "redeemed {} paying {} sats (fee {} sats, vsize {})",
        request.prior.outpoint,
        tx.outputs[0].satoshis,
        unsigned.fee,
        tx.vsize()
    );
    Ok(Redeemed { tx, fee: unsigned.fee })
}
