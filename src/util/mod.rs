//! Miscellaneous helpers: errors, hashes and wire encoding.

mod hash256;
mod result;
mod serdes;
pub mod var_int;

pub use self::hash256::{Hash256, sha256, sha256d};
pub use self::result::{Error, Result};
pub use self::serdes::Serializable;

/// Decodes a hex string that must be exactly `N` bytes long.
///
/// Upper- and lower-case digits are accepted alike.
pub fn decode_hex_array<const N: usize>(s: &str, what: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(s.trim())?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| Error::BadArgument(format!("{} must be {} bytes, got {}", what, N, bytes.len())))
}
