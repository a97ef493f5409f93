//! Standard error and result types for the library.
use base58::FromBase58Error;
use bech32::segwit::{DecodeError as SegwitDecodeError, EncodeError as SegwitEncodeError};
use hex::FromHexError;
use secp256k1::Error as Secp256k1Error;
use std::io;

/// Standard error type used in the library
#[derive(Debug)]
pub enum Error {
    /// An argument provided is invalid
    BadArgument(String),
    /// The data given is not valid
    BadData(String),
    /// Configuration file could not be parsed
    ConfigError(toml::de::Error),
    /// Base58 string could not be decoded
    FromBase58Error(FromBase58Error),
    /// Hex string could not be decoded
    FromHexError(FromHexError),
    /// Spend amount is zero or the outputs exceed the prior output
    InsufficientFunds {
        /// Satoshis held by the prior output
        available: u64,
        /// Satoshis the transaction tried to consume (send amount or fee)
        requested: u64,
    },
    /// Public key is not a 33-byte compressed key
    InvalidKeyLength(usize),
    /// The state is not valid
    IllegalState(String),
    /// Standard library IO error
    IOError(io::Error),
    /// The public key embedded in the script is not the signing key's
    KeyMismatch {
        /// Public key found in the witness script, hex
        in_script: String,
        /// Public key derived from the supplied private key, hex
        provided: String,
    },
    /// Script bytes violate the fixed hash-lock layout
    MalformedScript(String),
    /// Error evaluating the script
    ScriptError(String),
    /// Error in the Secp256k1 library
    Secp256k1Error(Secp256k1Error),
    /// SHA-256 of the secret does not match the committed hash
    SecretMismatch {
        /// Commitment found in the script, hex
        expected: String,
        /// SHA-256 of the supplied secret, hex
        actual: String,
    },
    /// Bech32 segwit address could not be decoded
    SegwitDecodeError(SegwitDecodeError),
    /// Bech32 segwit address could not be encoded
    SegwitEncodeError(SegwitEncodeError),
    /// The private key could not produce a signature
    SigningFailure(String),
    /// The data or functionality is not supported by this library
    Unsupported(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::BadArgument(s) => write!(f, "Bad argument: {}", s),
            Error::BadData(s) => write!(f, "Bad data: {}", s),
            Error::ConfigError(e) => write!(f, "Config error: {}", e),
            Error::FromBase58Error(e) => write!(f, "Base58 decoding error: {:?}", e),
            Error::FromHexError(e) => write!(f, "Hex decoding error: {}", e),
            Error::InsufficientFunds { available, requested } => write!(
                f,
                "Insufficient funds: prior output holds {} sats, {} sats requested",
                available, requested
            ),
            Error::InvalidKeyLength(len) => {
                write!(f, "Invalid key length: expected 33-byte compressed key, got {} bytes", len)
            }
            Error::IllegalState(s) => write!(f, "Illegal state: {}", s),
            Error::IOError(e) => write!(f, "IO error: {}", e),
            Error::KeyMismatch { in_script, provided } => write!(
                f,
                "Key mismatch: script commits to {}, signing key is {}",
                in_script, provided
            ),
            Error::MalformedScript(s) => write!(f, "Malformed script: {}", s),
            Error::ScriptError(s) => write!(f, "Script error: {}", s),
            Error::Secp256k1Error(e) => write!(f, "Secp256k1 error: {}", e),
            Error::SecretMismatch { expected, actual } => write!(
                f,
                "Secret mismatch: script commits to {}, sha256(secret) is {}",
                expected, actual
            ),
            Error::SegwitDecodeError(e) => write!(f, "Segwit address decoding error: {}", e),
            Error::SegwitEncodeError(e) => write!(f, "Segwit address encoding error: {}", e),
            Error::SigningFailure(s) => write!(f, "Signing failure: {}", s),
            Error::Unsupported(s) => write!(f, "Unsupported: {}", s),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ConfigError(e) => Some(e),
            Error::FromHexError(e) => Some(e),
            Error::IOError(e) => Some(e),
            Error::Secp256k1Error(e) => Some(e),
            Error::SegwitDecodeError(e) => Some(e),
            Error::SegwitEncodeError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FromBase58Error> for Error {
    fn from(e: FromBase58Error) -> Self {
        Error::FromBase58Error(e)
    }
}

impl From<FromHexError> for Error {
    fn from(e: FromHexError) -> Self {
        Error::FromHexError(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IOError(e)
    }
}

impl From<Secp256k1Error> for Error {
    fn from(e: Secp256k1Error) -> Self {
        Error::Secp256k1Error(e)
    }
}

impl From<SegwitDecodeError> for Error {
    fn from(e: SegwitDecodeError) -> Self {
        Error::SegwitDecodeError(e)
    }
}

impl From<SegwitEncodeError> for Error {
    fn from(e: SegwitEncodeError) -> Self {
        Error::SegwitEncodeError(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::ConfigError(e)
    }
}

/// Standard Result used in the library
pub type Result<T> = std::result::Result<T, Error>;
