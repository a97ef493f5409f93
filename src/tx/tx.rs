//! Bitcoin transaction with optional segregated witness (BIP144).

use crate::tx::{TxIn, TxOut, Witness};
use crate::util::{Error, Hash256, Result, Serializable, sha256d, var_int};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io;
use std::io::{Read, Write};

/// Maximum number of inputs/outputs accepted when reading.
const MAX_INPUTS: u64 = 100_000;
const MAX_OUTPUTS: u64 = 100_000;

/// Segwit marker and flag bytes following the version.
const SEGWIT_MARKER: u8 = 0x00;
const SEGWIT_FLAG: u8 = 0x01;

/// Weight units per non-witness byte.
pub const WITNESS_SCALE_FACTOR: usize = 4;

/// Bitcoin transaction.
#[derive(Default, PartialEq, Eq, Hash, Clone)]
pub struct Tx {
    /// Transaction version.
    pub version: u32,
    /// Transaction inputs.
    pub inputs: Vec<TxIn>,
    /// Transaction outputs.
    pub outputs: Vec<TxOut>,
    /// The block number or timestamp at which this transaction is unlocked.
    pub lock_time: u32,
}

impl Tx {
    /// Whether any input carries witness data.
    #[must_use]
    #[inline]
    pub fn has_witness(&self) -> bool {
        self.inputs.iter().any(|tx_in| !tx_in.witness.is_empty())
    }

    /// Transaction id: double SHA-256 of the serialization without witnesses.
    #[must_use]
    pub fn hash(&self) -> Hash256 {
        let mut b = Vec::with_capacity(self.base_size());
        let _ = self.write_base(&mut b);
        sha256d(&b)
    }

    /// Witness transaction id: double SHA-256 of the full serialization.
    ///
    /// Equal to [`Tx::hash`] when there is no witness.
    #[must_use]
    pub fn witness_hash(&self) -> Hash256 {
        sha256d(&self.to_bytes())
    }

    /// Size in bytes without witness data.
    #[must_use]
    pub fn base_size(&self) -> usize {
        8 + var_int::size(self.inputs.len() as u64)
            + self.inputs.iter().map(TxIn::size).sum::<usize>()
            + var_int::size(self.outputs.len() as u64)
            + self.outputs.iter().map(TxOut::size).sum::<usize>()
    }

    /// Size in bytes of the full serialization, as written by [`Serializable::write`].
    #[must_use]
    pub fn size(&self) -> usize {
        if self.has_witness() {
            self.base_size() + 2 + self.inputs.iter().map(|tx_in| tx_in.witness.size()).sum::<usize>()
        } else {
            self.base_size()
        }
    }

    /// Weight in weight units (BIP141).
    #[must_use]
    #[inline]
    pub fn weight(&self) -> usize {
        self.base_size() * (WITNESS_SCALE_FACTOR - 1) + self.size()
    }

    /// Virtual size: weight divided by four, rounded up.
    #[must_use]
    #[inline]
    pub fn vsize(&self) -> usize {
        self.weight().div_ceil(WITNESS_SCALE_FACTOR)
    }

    /// Sum of output values, failing on overflow.
    pub fn total_out(&self) -> Result<u64> {
        self.outputs.iter().try_fold(0u64, |acc, tx_out| {
            acc.checked_add(tx_out.satoshis)
                .ok_or_else(|| Error::BadData("Total out overflow".to_string()))
        })
    }

    /// Hex of the full serialization, ready for `sendrawtransaction`.
    #[must_use]
    #[inline]
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parses a hex-encoded transaction in witness or legacy form.
    pub fn from_hex(s: &str) -> Result<Tx> {
        let bytes = hex::decode(s.trim())?;
        let mut cursor = io::Cursor::new(&bytes);
        let tx = Tx::read(&mut cursor)?;
        if cursor.position() as usize != bytes.len() {
            return Err(Error::BadData(format!(
                "{} trailing bytes after transaction",
                bytes.len() - cursor.position() as usize
            )));
        }
        Ok(tx)
    }

    fn write_base(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.version)?;
        self.write_body(writer)?;
        writer.write_u32::<LittleEndian>(self.lock_time)
    }

    fn write_body(&self, writer: &mut dyn Write) -> io::Result<()> {
        var_int::write(self.inputs.len() as u64, writer)?;
        for tx_in in &self.inputs {
            tx_in.write(writer)?;
        }
        var_int::write(self.outputs.len() as u64, writer)?;
        for tx_out in &self.outputs {
            tx_out.write(writer)?;
        }
        Ok(())
    }
}

fn read_inputs(reader: &mut dyn Read, n_inputs: u64) -> Result<Vec<TxIn>> {
    if n_inputs > MAX_INPUTS {
        return Err(Error::BadData(format!("Too many inputs: {}", n_inputs)));
    }
    let mut inputs = Vec::with_capacity(n_inputs as usize);
    for _ in 0..n_inputs {
        inputs.push(TxIn::read(reader)?);
    }
    Ok(inputs)
}

fn read_outputs(reader: &mut dyn Read) -> Result<Vec<TxOut>> {
    let n_outputs = var_int::read(reader)?;
    if n_outputs > MAX_OUTPUTS {
        return Err(Error::BadData(format!("Too many outputs: {}", n_outputs)));
    }
    let mut outputs = Vec::with_capacity(n_outputs as usize);
    for _ in 0..n_outputs {
        outputs.push(TxOut::read(reader)?);
    }
    Ok(outputs)
}

impl Serializable<Tx> for Tx {
    fn read(reader: &mut dyn Read) -> Result<Tx> {
        let version = reader.read_u32::<LittleEndian>()?;
        // A zero input count is the segwit marker.
        let count = var_int::read(reader)?;
        let segwit = count == u64::from(SEGWIT_MARKER);
        let mut inputs = if segwit {
            let flag = reader.read_u8()?;
            if flag != SEGWIT_FLAG {
                return Err(Error::BadData(format!("Unknown segwit flag: {}", flag)));
            }
            let n_inputs = var_int::read(reader)?;
            read_inputs(reader, n_inputs)?
        } else {
            read_inputs(reader, count)?
        };
        let outputs = read_outputs(reader)?;
        if segwit {
            for tx_in in inputs.iter_mut() {
                tx_in.witness = Witness::read(reader)?;
            }
            if inputs.iter().all(|tx_in| tx_in.witness.is_empty()) {
                return Err(Error::BadData("Segwit marker without witness data".to_string()));
            }
        }
        let lock_time = reader.read_u32::<LittleEndian>()?;
        Ok(Tx {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        if !self.has_witness() {
            return self.write_base(writer);
        }
        writer.write_u32::<LittleEndian>(self.version)?;
        writer.write_u8(SEGWIT_MARKER)?;
        writer.write_u8(SEGWIT_FLAG)?;
        self.write_body(writer)?;
        for tx_in in &self.inputs {
            tx_in.witness.write(writer)?;
        }
        writer.write_u32::<LittleEndian>(self.lock_time)
    }
}

impl fmt::Debug for Tx {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let inputs_str = format!("[<{} inputs>]", self.inputs.len());
        let outputs_str = format!("[<{} outputs>]", self.outputs.len());
        f.debug_struct("Tx")
            .field("version", &self.version)
            .field("inputs", if self.inputs.len() <= 3 { &self.inputs } else { &inputs_str })
            .field("outputs", if self.outputs.len() <= 3 { &self.outputs } else { &outputs_str })
            .field("lock_time", &self.lock_time)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Script;
    use crate::tx::{OutPoint, SEQUENCE_RBF};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    const SIGNED_TX: &str = "02000000000101836aeac8d7af3309e758ff2a687ef79ef16e18e272c6220a83c82a1b24e7cb320100000000fdffffff01880d06000000000016001483a65a227ebc45bc75d61dc4a5407db296b514520347304402204f88017ad2660385d4782eb60a996a82ec75b2f0c4bb60c3b34f99d958b8e86702200d46bbaeeadcbf141a7d7ffc1488992bef3a2ce148ad57485eca99da4b720c8e0120f56c1a8ef50e1fc0feaa27c7d927f2bd03a9a4d040944e72e58b2aaeb20e896b46a820a9674085e84fcc06fe764ff6f4f2c1e6a34c102e317898c4468fe679029886428821032fb23d2b944cc1986dda6047f092aac987d0b1d1f2bd9f7af1fc08d464539d14ac00000000";

    fn sample() -> Tx {
        Tx {
            version: 1,
            inputs: vec![
                TxIn {
                    prev_output: OutPoint {
                        hash: Hash256([9; 32]),
                        index: 9,
                    },
                    unlock_script: Script(vec![1, 3, 5, 7, 9]),
                    sequence: 100,
                    witness: Witness::default(),
                },
                TxIn {
                    prev_output: OutPoint {
                        hash: Hash256([0; 32]),
                        index: 8,
                    },
                    unlock_script: Script(vec![3; 333]),
                    sequence: 22,
                    witness: Witness::default(),
                },
            ],
            outputs: vec![
                TxOut {
                    satoshis: 99,
                    lock_script: Script(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 100, 99, 98, 97, 96]),
                },
                TxOut {
                    satoshis: 199,
                    lock_script: Script(vec![56, 78, 90, 90, 78, 56]),
                },
            ],
            lock_time: 1000,
        }
    }

    #[test]
    fn legacy_write_read() {
        let t = sample();
        let v = t.to_bytes();
        assert!(!t.has_witness());
        assert_eq!(v.len(), t.size());
        assert_eq!(t.size(), t.base_size());
        assert_eq!(Tx::read(&mut Cursor::new(&v)).unwrap(), t);
        assert_eq!(t.hash(), t.witness_hash());
        assert_eq!(t.weight(), 4 * t.size());
    }

    #[test]
    fn witness_write_read() {
        let mut t = sample();
        t.inputs[1].witness = Witness(vec![vec![7; 72], vec![]]);
        let v = t.to_bytes();
        assert_eq!(&v[4..6], &[0x00, 0x01]);
        assert_eq!(v.len(), t.size());
        assert_eq!(Tx::read(&mut Cursor::new(&v)).unwrap(), t);
        assert!(t.hash() != t.witness_hash());
    }

    #[test]
    fn decode_signed_hash_lock_spend() {
        let tx = Tx::from_hex(SIGNED_TX).unwrap();
        assert_eq!(tx.version, 2);
        assert_eq!(tx.lock_time, 0);
        assert_eq!(tx.inputs.len(), 1);
        assert_eq!(tx.inputs[0].sequence, SEQUENCE_RBF);
        assert_eq!(
            tx.inputs[0].prev_output,
            OutPoint::from_txid("32cbe7241b2ac8830a22c672e2186ef19ef77e682aff58e70933afd7c8ea6a83", 1).unwrap()
        );
        assert_eq!(tx.inputs[0].witness.0.len(), 3);
        assert_eq!(tx.inputs[0].witness.0[2].len(), 70);
        assert_eq!(tx.outputs[0].satoshis, 396680);
        assert_eq!(tx.to_hex(), SIGNED_TX);

        assert_eq!(
            tx.hash().encode(),
            "a7ca2f9f68bf71c80cedffaeda668027d2230692b710c5673374b6ad0bcb0594"
        );
        assert_eq!(
            tx.witness_hash().encode(),
            "ad8638172ba28020b425b2294d8daab8664d8057ae6808c1a561d04d048522f9"
        );
        assert_eq!(tx.size(), 261);
        assert_eq!(tx.base_size(), 82);
        assert_eq!(tx.weight(), 507);
        assert_eq!(tx.vsize(), 127);
    }

    #[test]
    fn serialized_length_formula() {
        let tx = Tx::from_hex(SIGNED_TX).unwrap();
        let witness_bytes: usize = tx.inputs.iter().map(|i| i.witness.size()).sum();
        let outputs: usize = tx
            .outputs
            .iter()
            .map(|o| 8 + var_int::size(o.lock_script.len() as u64) + o.lock_script.len())
            .sum();
        let expected = 4 + 2 + 1 + 41 * tx.inputs.len() + 1 + outputs + witness_bytes + 4;
        assert_eq!(tx.to_bytes().len(), expected);
    }

    #[test]
    fn rejects_bad_input() {
        let err = Tx::from_hex(&format!("{}00", SIGNED_TX)).unwrap_err();
        assert_eq!(err.to_string(), "Bad data: 1 trailing bytes after transaction");

        let mut flagged = hex::decode(SIGNED_TX).unwrap();
        flagged[5] = 0x02;
        let err = Tx::read(&mut Cursor::new(flagged)).unwrap_err();
        assert_eq!(err.to_string(), "Bad data: Unknown segwit flag: 2");
    }

    #[test]
    fn total_out() {
        let t = sample();
        assert_eq!(t.total_out().unwrap(), 298);
        let mut t = sample();
        t.outputs[0].satoshis = u64::MAX;
        assert!(t.total_out().is_err());
    }
}
