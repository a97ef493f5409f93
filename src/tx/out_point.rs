//! Reference to a previous transaction output.

use crate::util::{Error, Hash256, Result, Serializable};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io;
use std::io::{Read, Write};

/// Reference to a transaction output.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub struct OutPoint {
    /// Hash of the referenced transaction, in serialized order.
    pub hash: Hash256,
    /// Index of the output in the transaction, zero-indexed.
    pub index: u32,
}

impl OutPoint {
    /// Size of the out point in bytes (32 + 4 = 36).
    pub const SIZE: usize = 36;

    /// Builds an out point from a txid in display order, as printed by
    /// block explorers and node RPCs.
    pub fn from_txid(txid: &str, index: u32) -> Result<OutPoint> {
        Ok(OutPoint {
            hash: Hash256::decode(txid)?,
            index,
        })
    }

    /// Returns the size of the out point in bytes.
    #[must_use]
    #[inline]
    pub fn size(&self) -> usize {
        Self::SIZE
    }
}

impl Serializable<OutPoint> for OutPoint {
    fn read(reader: &mut dyn Read) -> Result<OutPoint> {
        let hash = Hash256::read(reader)?;
        let index = reader.read_u32::<LittleEndian>().map_err(Error::IOError)?;
        Ok(OutPoint { hash, index })
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        self.hash.write(writer)?;
        writer.write_u32::<LittleEndian>(self.index)
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.hash.encode(), self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    const FUNDING_TXID: &str = "32cbe7241b2ac8830a22c672e2186ef19ef77e682aff58e70933afd7c8ea6a83";

    #[test]
    fn txid_is_reversed_on_the_wire() {
        let p = OutPoint::from_txid(FUNDING_TXID, 1).unwrap();
        assert_eq!(
            hex::encode(p.to_bytes()),
            "836aeac8d7af3309e758ff2a687ef79ef16e18e272c6220a83c82a1b24e7cb3201000000"
        );
        assert_eq!(p.to_string(), format!("{}:1", FUNDING_TXID));
    }

    #[test]
    fn write_read() {
        let p = OutPoint {
            hash: Hash256([9; 32]),
            index: 0xfffffffe,
        };
        let v = p.to_bytes();
        assert_eq!(v.len(), p.size());
        assert_eq!(OutPoint::read(&mut Cursor::new(&v)).unwrap(), p);
    }
}
