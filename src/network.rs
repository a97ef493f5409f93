//! Bitcoin networks and their address/key prefixes.

use crate::util::{Error, Result};
use bech32::Hrp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Network a script or key is used on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network
    Mainnet,
    /// Public test networks (testnet3, testnet4, signet share prefixes)
    Testnet,
    /// Local regression-test network
    Regtest,
}

impl Network {
    /// Human-readable part of bech32 segwit addresses.
    #[must_use]
    pub fn hrp(&self) -> Hrp {
        match self {
            Network::Mainnet => bech32::hrp::BC,
            Network::Testnet => bech32::hrp::TB,
            Network::Regtest => bech32::hrp::BCRT,
        }
    }

    /// Version byte for base58check P2PKH addresses.
    #[must_use]
    pub fn p2pkh_version(&self) -> u8 {
        match self {
            Network::Mainnet => 0x00,
            Network::Testnet | Network::Regtest => 0x6f,
        }
    }

    /// Version byte for base58check P2SH addresses.
    #[must_use]
    pub fn p2sh_version(&self) -> u8 {
        match self {
            Network::Mainnet => 0x05,
            Network::Testnet | Network::Regtest => 0xc4,
        }
    }

    /// Version byte for WIF-encoded private keys.
    #[must_use]
    pub fn wif_version(&self) -> u8 {
        match self {
            Network::Mainnet => 0x80,
            Network::Testnet | Network::Regtest => 0xef,
        }
    }

    /// Whether `hrp` belongs to this network.
    #[must_use]
    pub fn matches_hrp(&self, hrp: &Hrp) -> bool {
        *hrp == self.hrp()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Network> {
        match s.to_ascii_lowercase().as_str() {
            "main" | "mainnet" | "bitcoin" => Ok(Network::Mainnet),
            "test" | "testnet" | "testnet3" | "testnet4" | "signet" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            other => Err(Error::BadArgument(format!("Unknown network: {}", other))),
        }
    }
}
