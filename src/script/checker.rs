//! Signature checkers and segwit v0 input verification.
use crate::script::interpreter::decode_bool;
use crate::script::eval;
use crate::transaction::p2wsh;
use crate::transaction::sighash::{SIGHASH_ALL, SigHashCache, sighash};
use crate::tx::{Tx, TxOut};
use crate::util::{Error, Result, sha256};
use log::debug;
use secp256k1::{Message, PublicKey, Secp256k1, ecdsa::Signature};

/// Callback used by the interpreter for OP_CHECKSIG.
pub trait Checker {
    /// Verifies `sig` (DER plus sighash byte) against `pubkey`, signing `script`.
    ///
    /// # Errors
    /// `Error::ScriptError` for undecodable signatures or keys.
    fn check_sig(&mut self, sig: &[u8], pubkey: &[u8], script: &[u8]) -> Result<bool>;
}

/// Checker for evaluation outside any transaction.
///
/// Always errors to prevent invalid ops.
#[derive(Default, Clone, Debug)]
pub struct TransactionlessChecker;

impl Checker for TransactionlessChecker {
    fn check_sig(&mut self, _sig: &[u8], _pubkey: &[u8], _script: &[u8]) -> Result<bool> {
        Err(Error::IllegalState("No transaction context".to_string()))
    }
}

/// Checker that verifies signatures over the BIP143 digest of one input.
#[derive(Debug)]
pub struct TransactionChecker<'a> {
    /// The transaction being validated.
    pub tx: &'a Tx,
    /// Cache for sighash computations.
    pub sig_hash_cache: &'a mut SigHashCache,
    /// Input index being checked.
    pub input: usize,
    /// Value of the output being spent, in satoshis.
    pub satoshis: u64,
}

impl<'a> TransactionChecker<'a> {
    /// Creates a new transaction checker.
    #[must_use]
    pub fn new(tx: &'a Tx, cache: &'a mut SigHashCache, input: usize, satoshis: u64) -> Self {
        Self {
            tx,
            sig_hash_cache: cache,
            input,
            satoshis,
        }
    }
}

impl Checker for TransactionChecker<'_> {
    fn check_sig(&mut self, sig: &[u8], pubkey: &[u8], script: &[u8]) -> Result<bool> {
        let (&sighash_type, der_sig) = sig
            .split_last()
            .ok_or_else(|| Error::ScriptError("Empty signature".to_string()))?;
        if sighash_type != SIGHASH_ALL {
            return Err(Error::ScriptError(format!("Unsupported sighash type 0x{:02x}", sighash_type)));
        }
        let sig_hash = sighash(self.tx, self.input, script, self.satoshis, sighash_type, self.sig_hash_cache)?;

        let secp = Secp256k1::verification_only();
        let signature = Signature::from_der(der_sig).map_err(|_| Error::ScriptError("Invalid DER".to_string()))?;
        let public_key = PublicKey::from_slice(pubkey).map_err(|_| Error::ScriptError("Invalid pubkey".to_string()))?;
        let message = Message::from_digest(sig_hash.0);
        Ok(secp.verify_ecdsa(message, &signature, &public_key).is_ok())
    }
}

/// Verifies that input `input` of `tx` satisfies the P2WSH output `prev_out`.
///
/// Checks the witness program commitment to the witness script, then runs the
/// remaining witness items through the script with the BIP143 checker and
/// requires a single true item to be left (segwit clean-stack rule).
pub fn verify_p2wsh_input(tx: &Tx, input: usize, prev_out: &TxOut, cache: &mut SigHashCache) -> Result<()> {
    let tx_in = tx
        .inputs
        .get(input)
        .ok_or_else(|| Error::BadArgument(format!("Input index {} out of range", input)))?;
    if !tx_in.unlock_script.is_empty() {
        return Err(Error::ScriptError("Witness input must have an empty scriptSig".to_string()));
    }
    let program = p2wsh::extract_script_hash(&prev_out.lock_script.0)?;
    let (witness_script, items) = tx_in
        .witness
        .0
        .split_last()
        .ok_or_else(|| Error::ScriptError("Witness is empty".to_string()))?;
    if sha256(witness_script) != program {
        return Err(Error::ScriptError("Witness script does not match program".to_string()));
    }
    debug!("evaluating witness script {}", hex::encode(witness_script));

    let mut checker = TransactionChecker::new(tx, cache, input, prev_out.satoshis);
    let stack = eval(witness_script, items, &mut checker)?;
    match stack.as_slice() {
        [top] if decode_bool(top) => Ok(()),
        [_] => Err(Error::ScriptError("Script evaluated to false".to_string())),
        _ => Err(Error::ScriptError(format!("Stack must end with one item, has {}", stack.len()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Script;
    use crate::script::op_codes::{OP_CHECKSIG, OP_PUSH};
    use crate::transaction::generate_signature;
    use crate::tx::{OutPoint, TxIn, Witness};
    use crate::util::Hash256;
    use pretty_assertions::assert_eq;
    use secp256k1::SecretKey;

    const PRIVATE_KEY: [u8; 32] = [0x11; 32];

    fn pay_to_pubkey_script() -> Script {
        let secp = Secp256k1::new();
        let sk = SecretKey::from_byte_array(PRIVATE_KEY).unwrap();
        let pk = PublicKey::from_secret_key(&secp, &sk);
        let mut s = Script::new();
        s.append(OP_PUSH + 33);
        s.append_slice(&pk.serialize());
        s.append(OP_CHECKSIG);
        s
    }

    fn spend(witness_script: &Script) -> (Tx, TxOut) {
        let prev_out = TxOut {
            satoshis: 50_000,
            lock_script: p2wsh::create_lock_script(&witness_script.0),
        };
        let tx = Tx {
            version: 2,
            inputs: vec![TxIn {
                prev_output: OutPoint {
                    hash: Hash256([3; 32]),
                    index: 0,
                },
                unlock_script: Script::new(),
                sequence: 0xffffffff,
                witness: Witness::default(),
            }],
            outputs: vec![TxOut {
                satoshis: 49_000,
                lock_script: Script(vec![0x00, 0x14, 0x55, 0x55]),
            }],
            lock_time: 0,
        };
        (tx, prev_out)
    }

    fn signed(witness_script: &Script) -> (Tx, TxOut) {
        let (mut tx, prev_out) = spend(witness_script);
        let mut cache = SigHashCache::new();
        let digest = sighash(&tx, 0, &witness_script.0, prev_out.satoshis, SIGHASH_ALL, &mut cache).unwrap();
        let sig = generate_signature(&PRIVATE_KEY, &digest, SIGHASH_ALL).unwrap();
        tx.inputs[0].witness = Witness(vec![sig, witness_script.0.clone()]);
        (tx, prev_out)
    }

    #[test]
    fn valid_signature_passes() {
        let ws = pay_to_pubkey_script();
        let (tx, prev_out) = signed(&ws);
        verify_p2wsh_input(&tx, 0, &prev_out, &mut SigHashCache::new()).unwrap();
    }

    #[test]
    fn signature_commits_to_amount() {
        let ws = pay_to_pubkey_script();
        let (tx, mut prev_out) = signed(&ws);
        prev_out.satoshis += 1;
        let err = verify_p2wsh_input(&tx, 0, &prev_out, &mut SigHashCache::new()).unwrap_err();
        assert_eq!(err.to_string(), "Script error: Script evaluated to false");
    }

    #[test]
    fn program_must_match_witness_script() {
        let ws = pay_to_pubkey_script();
        let (tx, mut prev_out) = signed(&ws);
        prev_out.lock_script = p2wsh::create_lock_script(&[OP_CHECKSIG]);
        let err = verify_p2wsh_input(&tx, 0, &prev_out, &mut SigHashCache::new()).unwrap_err();
        assert_eq!(err.to_string(), "Script error: Witness script does not match program");
    }

    #[test]
    fn other_sighash_types_rejected() {
        let ws = pay_to_pubkey_script();
        let (mut tx, prev_out) = signed(&ws);
        let sig = &mut tx.inputs[0].witness.0[0];
        let last = sig.len() - 1;
        sig[last] = 0x41;
        let err = verify_p2wsh_input(&tx, 0, &prev_out, &mut SigHashCache::new()).unwrap_err();
        assert_eq!(err.to_string(), "Script error: Unsupported sighash type 0x41");
    }

    #[test]
    fn empty_witness_and_bad_index() {
        let ws = pay_to_pubkey_script();
        let (tx, prev_out) = spend(&ws);
        let err = verify_p2wsh_input(&tx, 0, &prev_out, &mut SigHashCache::new()).unwrap_err();
        assert_eq!(err.to_string(), "Script error: Witness is empty");
        let err = verify_p2wsh_input(&tx, 1, &prev_out, &mut SigHashCache::new()).unwrap_err();
        assert_eq!(err.to_string(), "Bad argument: Input index 1 out of range");
    }
}
