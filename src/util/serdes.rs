//! Binary serialization trait shared by the transaction types.
use crate::util::Result;
use std::io;
use std::io::{Read, Write};

/// An object that may be serialized and deserialized.
pub trait Serializable<T> {
    /// Reads the object from serialized form.
    ///
    /// # Errors
    /// Propagates IO errors or invalid data.
    fn read(reader: &mut dyn Read) -> Result<T>
    where
        Self: Sized;

    /// Writes the object to serialized form.
    ///
    /// # Errors
    /// IO errors.
    fn write(&self, writer: &mut dyn Write) -> io::Result<()>;

    /// Serializes into a fresh buffer.
    fn to_bytes(&self) -> Vec<u8> {
        let mut v = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write(&mut v);
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Error;
    use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    struct Sequence(u32);

    impl Serializable<Sequence> for Sequence {
        fn read(reader: &mut dyn Read) -> Result<Sequence> {
            Ok(Sequence(reader.read_u32::<LittleEndian>().map_err(Error::IOError)?))
        }
        fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
            writer.write_u32::<LittleEndian>(self.0)
        }
    }

    #[test]
    fn to_bytes_matches_write() {
        assert_eq!(Sequence(0xfffffffd).to_bytes(), vec![0xfd, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn short_read() {
        let err = Sequence::read(&mut Cursor::new(vec![0u8; 3])).err().unwrap();
        assert_eq!(err.to_string(), "IO error: failed to fill whole buffer");
    }
}
