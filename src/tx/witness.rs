//! Segregated-witness stack attached to a transaction input.

use crate::util::{Error, Result, Serializable, var_int};
use std::fmt;
use std::io;
use std::io::{Read, Write};

/// Upper bound on witness items accepted when reading.
const MAX_WITNESS_ITEMS: u64 = 500;
/// Upper bound on a single witness item accepted when reading.
const MAX_WITNESS_ITEM_LEN: u64 = 4_000_000;

/// Ordered witness items, bottom of the stack first.
#[derive(Default, PartialEq, Eq, Hash, Clone)]
pub struct Witness(pub Vec<Vec<u8>>);

impl Witness {
    /// Whether the witness carries no items.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialized size: item count plus each length-prefixed item.
    #[must_use]
    pub fn size(&self) -> usize {
        var_int::size(self.0.len() as u64)
            + self
                .0
                .iter()
                .map(|item| var_int::size(item.len() as u64) + item.len())
                .sum::<usize>()
    }
}

impl Serializable<Witness> for Witness {
    fn read(reader: &mut dyn Read) -> Result<Witness> {
        let n_items = var_int::read(reader)?;
        if n_items > MAX_WITNESS_ITEMS {
            return Err(Error::BadData(format!("Too many witness items: {}", n_items)));
        }
        let mut items = Vec::with_capacity(n_items as usize);
        for _ in 0..n_items {
            let len = var_int::read(reader)?;
            if len > MAX_WITNESS_ITEM_LEN {
                return Err(Error::BadData(format!("Witness item too long: {}", len)));
            }
            let mut item = vec![0; len as usize];
            reader.read_exact(&mut item)?;
            items.push(item);
        }
        Ok(Witness(items))
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        var_int::write(self.0.len() as u64, writer)?;
        for item in &self.0 {
            var_int::write(item.len() as u64, writer)?;
            writer.write_all(item)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Witness {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.0.iter().map(hex::encode)).finish()
    }
}
