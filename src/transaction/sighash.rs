//! Witness v0 signature hash (BIP143).
//!
//! The three transaction-wide sub-hashes (prevouts, sequences, outputs) are
//! computed once and kept in a [`SigHashCache`], so signing or checking every
//! input costs one pass over the transaction instead of one per input.
use crate::tx::{OutPoint, Tx};
use crate::util::{Error, Hash256, Result, Serializable, sha256d, var_int};
use byteorder::{LittleEndian, WriteBytesExt};
use log::debug;

/// Signs all inputs and all outputs.
pub const SIGHASH_ALL: u8 = 0x01;
/// Signs no outputs.
pub const SIGHASH_NONE: u8 = 0x02;
/// Signs only the output at the same index.
pub const SIGHASH_SINGLE: u8 = 0x03;
/// Signs only the current input.
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;

/// Computes the BIP143 digest that input `n_input` signs.
///
/// `script_code` is the witness script being satisfied and `satoshis` the
/// value of the output it spends.
///
/// # Errors
/// `Error::BadArgument` for an out-of-range input and `Error::Unsupported`
/// for any sighash type other than `SIGHASH_ALL`.
pub fn sighash(
    tx: &Tx,
    n_input: usize,
    script_code: &[u8],
    satoshis: u64,
    sighash_type: u8,
    cache: &mut SigHashCache,
) -> Result<Hash256> {
    if sighash_type != SIGHASH_ALL {
        return Err(Error::Unsupported(format!("Sighash type 0x{:02x}", sighash_type)));
    }
    let tx_in = tx
        .inputs
        .get(n_input)
        .ok_or_else(|| Error::BadArgument(format!("Input index {} out of range", n_input)))?;

    let mut s = Vec::with_capacity(156 + script_code.len());
    s.write_u32::<LittleEndian>(tx.version)?;
    s.extend_from_slice(&cache.hash_prevouts(tx).0);
    s.extend_from_slice(&cache.hash_sequence(tx).0);
    tx_in.prev_output.write(&mut s)?;
    var_int::write(script_code.len() as u64, &mut s)?;
    s.extend_from_slice(script_code);
    s.write_u64::<LittleEndian>(satoshis)?;
    s.write_u32::<LittleEndian>(tx_in.sequence)?;
    s.extend_from_slice(&cache.hash_outputs(tx).0);
    s.write_u32::<LittleEndian>(tx.lock_time)?;
    s.write_u32::<LittleEndian>(u32::from(sighash_type))?;

    let digest = sha256d(&s);
    debug!("sighash for input {}: {}", n_input, hex::encode(digest.0));
    Ok(digest)
}

/// Transaction-wide BIP143 intermediates.
///
/// A cache belongs to one transaction; reusing it after the inputs, sequences
/// or outputs change yields stale digests.
#[derive(Default, Debug, Clone)]
pub struct SigHashCache {
    hash_prevouts: Option<Hash256>,
    hash_sequence: Option<Hash256>,
    hash_outputs: Option<Hash256>,
}

impl SigHashCache {
    /// Creates a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Double SHA-256 of every input's outpoint.
    pub fn hash_prevouts(&mut self, tx: &Tx) -> Hash256 {
        *self.hash_prevouts.get_or_insert_with(|| {
            let mut prevouts = Vec::with_capacity(OutPoint::SIZE * tx.inputs.len());
            for input in &tx.inputs {
                prevouts.extend_from_slice(&input.prev_output.to_bytes());
            }
            sha256d(&prevouts)
        })
    }

    /// Double SHA-256 of every input's sequence number.
    pub fn hash_sequence(&mut self, tx: &Tx) -> Hash256 {
        *self.hash_sequence.get_or_insert_with(|| {
            let sequences: Vec<u8> = tx.inputs.iter().flat_map(|input| input.sequence.to_le_bytes()).collect();
            sha256d(&sequences)
        })
    }

    /// Double SHA-256 of every serialized output.
    pub fn hash_outputs(&mut self, tx: &Tx) -> Hash256 {
        *self.hash_outputs.get_or_insert_with(|| {
            let mut outputs = Vec::with_capacity(tx.outputs.iter().map(|out| out.size()).sum());
            for out in &tx.outputs {
                outputs.extend_from_slice(&out.to_bytes());
            }
            sha256d(&outputs)
        })
    }
}
