//! Pay-to-Witness-Script-Hash (P2WSH) output scripts.
use crate::script::Script;
use crate::script::op_codes::{OP_0, OP_PUSH};
use crate::util::{Error, Result, sha256};

/// Length of a P2WSH output script: version byte, push, 32-byte program.
pub const LOCK_SCRIPT_LEN: usize = 34;

/// Creates the output script `0 <sha256(witness_script)>`.
#[must_use]
#[inline]
pub fn create_lock_script(witness_script: &[u8]) -> Script {
    let mut script = Script::new();
    script.append(OP_0);
    script.append(OP_PUSH + 32);
    script.append_slice(&sha256(witness_script));
    script
}

/// Checks if the script is a segwit v0 output with a 32-byte program.
#[must_use]
#[inline]
pub fn check_lock_script(lock_script: &[u8]) -> bool {
    lock_script.len() == LOCK_SCRIPT_LEN && lock_script[0] == OP_0 && lock_script[1] == OP_PUSH + 32
}

/// Extracts the witness script hash from a P2WSH output script.
pub fn extract_script_hash(lock_script: &[u8]) -> Result<[u8; 32]> {
    if !check_lock_script(lock_script) {
        return Err(Error::BadData("Not P2WSH lock".to_string()));
    }
    let mut hash = [0; 32];
    hash.copy_from_slice(&lock_script[2..]);
    Ok(hash)
}
