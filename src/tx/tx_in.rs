//! Transaction input.
use crate::script::Script;
use crate::tx::{OutPoint, Witness};
use crate::util::{Error, Result, Serializable, var_int};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;
use std::io::{Read, Write};

/// Maximum unlock script length accepted when reading.
const MAX_UNLOCK_SCRIPT_LEN: usize = 10_000;

/// Sequence number that marks the input final (no replace-by-fee, no relative lock).
pub const SEQUENCE_FINAL: u32 = 0xffffffff;
/// Highest sequence number that signals replace-by-fee (BIP125).
pub const SEQUENCE_RBF: u32 = 0xfffffffd;

/// Transaction input.
///
/// The witness is not part of the input's own serialization; [`crate::tx::Tx`]
/// writes all witnesses after the outputs.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct TxIn {
    /// The previous output transaction reference.
    pub prev_output: OutPoint,
    /// Signature script; empty for native segwit spends.
    pub unlock_script: Script,
    /// Sequence number, used for replace-by-fee signalling and relative locks.
    pub sequence: u32,
    /// Witness stack satisfying the previous output.
    pub witness: Witness,
}

impl TxIn {
    /// Creates a segwit input with an empty scriptSig and no witness yet.
    #[must_use]
    pub fn new(prev_output: OutPoint, sequence: u32) -> TxIn {
        TxIn {
            prev_output,
            unlock_script: Script::new(),
            sequence,
            witness: Witness::default(),
        }
    }

    /// Returns the size of the input in bytes, excluding the witness.
    #[must_use]
    #[inline]
    pub fn size(&self) -> usize {
        OutPoint::SIZE + var_int::size(self.unlock_script.len() as u64) + self.unlock_script.len() + 4
    }

    /// Whether the sequence number opts into replace-by-fee.
    #[must_use]
    #[inline]
    pub fn signals_rbf(&self) -> bool {
        self.sequence <= SEQUENCE_RBF
    }
}

impl Serializable<TxIn> for TxIn {
    fn read(reader: &mut dyn Read) -> Result<TxIn> {
        let prev_output = OutPoint::read(reader)?;
        let script_len = var_int::read(reader)? as usize;
        if script_len > MAX_UNLOCK_SCRIPT_LEN {
            return Err(Error::BadData(format!("Unlock script too long: {}", script_len)));
        }
        let mut unlock_script = vec![0; script_len];
        reader.read_exact(&mut unlock_script)?;
        let sequence = reader.read_u32::<LittleEndian>()?;
        Ok(TxIn {
            prev_output,
            unlock_script: Script(unlock_script),
            sequence,
            witness: Witness::default(),
        })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        self.prev_output.write(writer)?;
        var_int::write(self.unlock_script.len() as u64, writer)?;
        writer.write_all(&self.unlock_script.0)?;
        writer.write_u32::<LittleEndian>(self.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Hash256;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn segwit_input_is_41_bytes() {
        let t = TxIn::new(
            OutPoint {
                hash: Hash256([6; 32]),
                index: 1,
            },
            SEQUENCE_RBF,
        );
        let v = t.to_bytes();
        assert_eq!(v.len(), 41);
        assert_eq!(t.size(), 41);
        assert_eq!(v[36], 0x00);
        assert_eq!(&v[37..], &[0xfd, 0xff, 0xff, 0xff]);
        assert_eq!(TxIn::read(&mut Cursor::new(&v)).unwrap(), t);
    }

    #[test]
    fn rbf_signalling() {
        let mut t = TxIn::new(OutPoint::default(), SEQUENCE_FINAL);
        assert!(!t.signals_rbf());
        t.sequence = SEQUENCE_FINAL - 1;
        assert!(!t.signals_rbf());
        t.sequence = SEQUENCE_RBF;
        assert!(t.signals_rbf());
        t.sequence = 0;
        assert!(t.signals_rbf());
    }

    #[test]
    fn too_long_unlock_script() {
        let mut v = OutPoint::default().to_bytes();
        var_int::write(MAX_UNLOCK_SCRIPT_LEN as u64 + 1, &mut v).unwrap();
        assert_eq!(
            TxIn::read(&mut Cursor::new(v)).unwrap_err().to_string(),
            format!("Bad data: Unlock script too long: {}", MAX_UNLOCK_SCRIPT_LEN + 1)
        );
    }
}
