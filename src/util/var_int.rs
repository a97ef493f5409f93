//! Compact-size integers used as length and count prefixes.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;
use std::io::{Read, Write};

/// Returns the number of bytes required to encode `n`.
#[must_use]
#[inline]
pub fn size(n: u64) -> usize {
    match n {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Writes `n` as a compact-size integer.
#[inline]
pub fn write(n: u64, writer: &mut dyn Write) -> io::Result<()> {
    match n {
        0..=0xfc => writer.write_u8(n as u8),
        0xfd..=0xffff => {
            writer.write_u8(0xfd)?;
            writer.write_u16::<LittleEndian>(n as u16)
        }
        0x1_0000..=0xffff_ffff => {
            writer.write_u8(0xfe)?;
            writer.write_u32::<LittleEndian>(n as u32)
        }
        _ => {
            writer.write_u8(0xff)?;
            writer.write_u64::<LittleEndian>(n)
        }
    }
}

/// Reads a compact-size integer.
#[inline]
pub fn read(reader: &mut dyn Read) -> io::Result<u64> {
    match reader.read_u8()? {
        0xff => reader.read_u64::<LittleEndian>(),
        0xfe => reader.read_u32::<LittleEndian>().map(u64::from),
        0xfd => reader.read_u16::<LittleEndian>().map(u64::from),
        n => Ok(u64::from(n)),
    }
}
