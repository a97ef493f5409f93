//! Transaction output.

use crate::script::Script;
use crate::util::{Error, Result, Serializable, var_int};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;
use std::io::{Read, Write};

/// Maximum lock script length (consensus rule for scripts being executed).
const MAX_LOCK_SCRIPT_LEN: usize = 10_000;
/// Maximum satoshis (21M BTC).
pub const MAX_SATOSHIS: u64 = 21_000_000 * 100_000_000;

/// Transaction output.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct TxOut {
    /// Number of satoshis to spend.
    pub satoshis: u64,
    /// Public key script to claim the output.
    pub lock_script: Script,
}

impl TxOut {
    /// Returns the size of the transaction output in bytes.
    #[must_use]
    #[inline]
    pub fn size(&self) -> usize {
        8 + var_int::size(self.lock_script.len() as u64) + self.lock_script.len()
    }

    /// Validates the transaction output.
    ///
    /// # Errors
    /// `Error::BadData` if satoshis exceed MAX_SATOSHIS or the lock script is too long.
    pub fn validate(&self) -> Result<()> {
        if self.satoshis > MAX_SATOSHIS {
            return Err(Error::BadData("Satoshis exceeds max".to_string()));
        }
        if self.lock_script.len() > MAX_LOCK_SCRIPT_LEN {
            return Err(Error::BadData(format!("Lock script too long: {}", self.lock_script.len())));
        }
        Ok(())
    }
}

impl Serializable<TxOut> for TxOut {
    fn read(reader: &mut dyn Read) -> Result<TxOut> {
        let satoshis = reader.read_u64::<LittleEndian>()?;
        let script_len = var_int::read(reader)? as usize;
        if script_len > MAX_LOCK_SCRIPT_LEN {
            return Err(Error::BadData(format!("Lock script too long: {}", script_len)));
        }
        let mut lock_script = vec![0; script_len];
        reader.read_exact(&mut lock_script)?;
        let tx_out = TxOut {
            satoshis,
            lock_script: Script(lock_script),
        };
        tx_out.validate()?;
        Ok(tx_out)
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_u64::<LittleEndian>(self.satoshis)?;
        var_int::write(self.lock_script.len() as u64, writer)?;
        writer.write_all(&self.lock_script.0)
    }
}
