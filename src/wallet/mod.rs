//! Key material for signing spends: secp256k1 key pairs and WIF encoding.

mod key_pair;

pub use self::key_pair::KeyPair;
