//! 256-bit hashes for transactions and signature digests.
//!
//! Transaction ids are displayed as a little-endian number, so `encode`/`decode`
//! reverse the bytes relative to their serialized order.

use crate::util::{Error, Result, Serializable};
use bitcoin_hashes::{sha256 as bh_sha256, sha256d as bh_sha256d};
use std::fmt;
use std::io;
use std::io::{Read, Write};

/// 256-bit hash in serialized (internal) byte order.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// Converts the hash into a hex string in display (reversed) order.
    #[must_use]
    #[inline]
    pub fn encode(&self) -> String {
        let mut r = self.0;
        r.reverse();
        hex::encode(r)
    }

    /// Parses 64 hex characters in display order, as printed by node RPCs.
    pub fn decode(s: &str) -> Result<Hash256> {
        let decoded_bytes = hex::decode(s)?;
        let mut hash_bytes: [u8; 32] = decoded_bytes
            .as_slice()
            .try_into()
            .map_err(|_| Error::BadArgument(format!("Length {} of decoded bytes", decoded_bytes.len())))?;
        hash_bytes.reverse();
        Ok(Hash256(hash_bytes))
    }
}

impl Serializable<Hash256> for Hash256 {
    fn read(reader: &mut dyn Read) -> Result<Hash256> {
        let mut bytes = [0; 32];
        reader.read_exact(&mut bytes)?;
        Ok(Hash256(bytes))
    }

    fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_all(&self.0)
    }
}

/// Hashes a data array once using SHA256.
#[must_use]
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    bh_sha256::Hash::hash(data).to_byte_array()
}

/// Hashes a data array twice using SHA256.
#[must_use]
#[inline]
pub fn sha256d(data: &[u8]) -> Hash256 {
    Hash256(bh_sha256d::Hash::hash(data).to_byte_array())
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn sha256_of_secret() {
        let secret = hex!("f56c1a8ef50e1fc0feaa27c7d927f2bd03a9a4d040944e72e58b2aaeb20e896b");
        assert_eq!(
            sha256(&secret),
            hex!("a9674085e84fcc06fe764ff6f4f2c1e6a34c102e317898c4468fe67902988642")
        );
    }

    #[test]
    fn sha256d_test() {
        let x = hex!("0123456789abcdef");
        assert_eq!(
            hex::encode(sha256d(&x).0),
            "137ad663f79da06e282ed0abbec4d70523ced5ff8e39d5c2e5641d978c5925aa"
        );
    }

    #[test]
    fn txid_display_order() {
        let txid = "32cbe7241b2ac8830a22c672e2186ef19ef77e682aff58e70933afd7c8ea6a83";
        let h = Hash256::decode(txid).unwrap();
        assert_eq!(h.0[0], 0x83);
        assert_eq!(h.0[31], 0x32);
        assert_eq!(h.encode(), txid);
        assert_eq!(h.to_string(), txid);
    }

    #[test]
    fn decode_rejects_bad_input() {
        assert!(Hash256::decode(&"0".repeat(63)).is_err());
        assert!(Hash256::decode(&"0".repeat(66)).is_err());
        assert!(Hash256::decode(&format!("{}g", "0".repeat(63))).is_err());
    }

    #[test]
    fn write_read() {
        let h = Hash256([7; 32]);
        let mut v = Vec::new();
        h.write(&mut v).unwrap();
        assert_eq!(Hash256::read(&mut Cursor::new(v)).unwrap(), h);
    }
}
