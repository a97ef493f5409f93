//! Script construction and evaluation for segwit v0 spends.
//!
//! [`Script`] is a plain byte buffer with helpers for appending opcodes and
//! minimal data pushes. [`interpreter`] evaluates a witness stack against a
//! witness script, with signature checks delegated to a [`Checker`].

mod checker;
mod interpreter;
pub mod op_codes;

pub use self::checker::{Checker, TransactionChecker, TransactionlessChecker, verify_p2wsh_input};
pub use self::interpreter::{eval, next_op};

use crate::util::{Error, Result};
use op_codes::{OP_PUSH, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4};
use std::fmt;

/// Transaction script bytes.
#[derive(Default, Clone, PartialEq, Eq, Hash)]
pub struct Script(pub Vec<u8>);

impl Script {
    /// Creates an empty script.
    #[must_use]
    #[inline]
    pub fn new() -> Script {
        Script(Vec::new())
    }

    /// Appends a single opcode or data byte.
    #[inline]
    pub fn append(&mut self, byte: u8) {
        self.0.push(byte);
    }

    /// Appends raw bytes without a length prefix.
    #[inline]
    pub fn append_slice(&mut self, slice: &[u8]) {
        self.0.extend_from_slice(slice);
    }

    /// Appends `data` preceded by the smallest push opcode that fits it.
    pub fn append_data(&mut self, data: &[u8]) -> Result<()> {
        let len = data.len();
        match len {
            0..=75 => self.0.push(OP_PUSH + len as u8),
            76..=0xff => {
                self.0.push(OP_PUSHDATA1);
                self.0.push(len as u8);
            }
            0x100..=0xffff => {
                self.0.push(OP_PUSHDATA2);
                self.0.extend_from_slice(&(len as u16).to_le_bytes());
            }
            _ => {
                let len = u32::try_from(len)
                    .map_err(|_| Error::BadArgument(format!("Push too large: {} bytes", len)))?;
                self.0.push(OP_PUSHDATA4);
                self.0.extend_from_slice(&len.to_le_bytes());
            }
        }
        self.0.extend_from_slice(data);
        Ok(())
    }

    /// Number of bytes in the script.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the script has no bytes.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lower-case hex of the script bytes.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parses a script from hex.
    pub fn from_hex(s: &str) -> Result<Script> {
        Ok(Script(hex::decode(s.trim())?))
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}
