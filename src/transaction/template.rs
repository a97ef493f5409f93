//! Spending templates: how a witness stack is laid out for each script kind.
use crate::transaction::hashlock::HashLock;
use crate::tx::Witness;
use crate::util::{Error, Result};

/// Witness script kinds this crate knows how to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptTemplate {
    /// `OP_SHA256 <H> OP_EQUALVERIFY <pubkey> OP_CHECKSIG`, spent by `[sig, secret, script]`.
    HashLockWithPubkey,
}

impl ScriptTemplate {
    /// Identifies the template a witness script follows.
    pub fn detect(witness_script: &[u8]) -> Result<ScriptTemplate> {
        HashLock::parse(witness_script)
            .map(|_| ScriptTemplate::HashLockWithPubkey)
            .map_err(|e| Error::Unsupported(format!("Unknown witness script template ({})", e)))
    }

    /// Orders the witness items for a spend. The witness script always goes last.
    pub fn witness(&self, signature: Vec<u8>, secret: &[u8], witness_script: &[u8]) -> Witness {
        match self {
            ScriptTemplate::HashLockWithPubkey => {
                Witness(vec![signature, secret.to_vec(), witness_script.to_vec()])
            }
        }
    }

    /// Number of witness items a spend carries.
    #[must_use]
    pub fn witness_items(&self) -> usize {
        match self {
            ScriptTemplate::HashLockWithPubkey => 3,
        }
    }
}
