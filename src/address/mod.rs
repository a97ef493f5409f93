//! Address encoding and decoding.
//!
//! Segwit outputs use bech32 (version 0) or bech32m (version 1 and up);
//! legacy P2PKH and P2SH outputs use base58check. Destinations are turned
//! into output scripts so the transaction builder never sees address strings.

use crate::network::Network;
use crate::script::Script;
use crate::script::op_codes::{OP_0, OP_1, OP_CHECKSIG, OP_DUP, OP_EQUAL, OP_EQUALVERIFY, OP_HASH160, OP_PUSH};
use crate::util::{Error, Result, sha256d};
use base58::{FromBase58, ToBase58};
use bech32::{Fe32, segwit};

/// Encodes a base58check address from a version byte and a 20-byte payload.
#[must_use]
pub fn encode_address(version: u8, payload: &[u8; 20]) -> String {
    let mut v = [0u8; 25];
    v[0] = version;
    v[1..21].copy_from_slice(payload);
    let checksum = sha256d(&v[..21]);
    v[21..25].copy_from_slice(&checksum.0[..4]);
    v.to_base58()
}

/// Decodes a base58check address into its version byte and 20-byte payload.
///
/// # Errors
/// `Error::FromBase58Error` on bad characters, `Error::BadData` on invalid length or checksum.
pub fn decode_base58_address(input: &str) -> Result<(u8, [u8; 20])> {
    let bytes = input.from_base58()?;
    if bytes.len() != 25 {
        return Err(Error::BadData("Invalid address length".to_string()));
    }
    let checksum = sha256d(&bytes[..21]);
    if checksum.0[..4] != bytes[21..] {
        return Err(Error::BadData("Invalid checksum".to_string()));
    }
    let mut payload = [0u8; 20];
    payload.copy_from_slice(&bytes[1..21]);
    Ok((bytes[0], payload))
}

/// Encodes a P2PKH address from a 20-byte public key hash.
#[must_use]
#[inline]
pub fn encode_p2pkh_address(network: Network, pubkey_hash: &[u8; 20]) -> String {
    encode_address(network.p2pkh_version(), pubkey_hash)
}

/// Encodes a P2SH address from a 20-byte script hash.
#[must_use]
#[inline]
pub fn encode_p2sh_address(network: Network, script_hash: &[u8; 20]) -> String {
    encode_address(network.p2sh_version(), script_hash)
}

/// Encodes a segwit address. Version 0 uses bech32, later versions bech32m.
///
/// # Errors
/// `Error::SegwitEncodeError` if the program length is invalid for the version.
pub fn encode_segwit_address(network: Network, version: u8, program: &[u8]) -> Result<String> {
    let version = Fe32::try_from(version)
        .map_err(|_| Error::BadArgument(format!("Invalid witness version: {}", version)))?;
    Ok(segwit::encode(network.hrp(), version, program)?)
}

/// Encodes the P2WSH address for a witness script hash.
pub fn encode_p2wsh_address(script_hash: &[u8; 32], network: Network) -> Result<String> {
    encode_segwit_address(network, 0, script_hash)
}

/// Decodes a segwit address into its witness version and program.
///
/// # Errors
/// `Error::SegwitDecodeError` for bad checksums or encodings, and
/// `Error::BadArgument` if the address belongs to another network.
pub fn decode_segwit_address(address: &str, network: Network) -> Result<(u8, Vec<u8>)> {
    let (hrp, version, program) = segwit::decode(address)?;
    if !network.matches_hrp(&hrp) {
        return Err(Error::BadArgument(format!(
            "Address prefix {} is not valid on {}",
            hrp, network
        )));
    }
    Ok((version.to_u8(), program))
}

fn is_segwit_address(address: &str) -> bool {
    let lower = address.to_ascii_lowercase();
    ["bc1", "tb1", "bcrt1"].iter().any(|prefix| lower.starts_with(prefix))
}

/// Output script for a witness program: `<version opcode> <program>`.
pub fn witness_program_script(version: u8, program: &[u8]) -> Result<Script> {
    let mut script = Script::new();
    match version {
        0 => script.append(OP_0),
        1..=16 => script.append(OP_1 + version - 1),
        _ => return Err(Error::BadArgument(format!("Invalid witness version: {}", version))),
    }
    script.append_data(program)?;
    Ok(script)
}

/// P2PKH output script: `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`.
#[must_use]
pub fn p2pkh_script(pubkey_hash: &[u8; 20]) -> Script {
    let mut script = Script::new();
    script.append(OP_DUP);
    script.append(OP_HASH160);
    script.append(OP_PUSH + 20);
    script.append_slice(pubkey_hash);
    script.append(OP_EQUALVERIFY);
    script.append(OP_CHECKSIG);
    script
}

/// P2SH output script: `OP_HASH160 <hash> OP_EQUAL`.
#[must_use]
pub fn p2sh_script(script_hash: &[u8; 20]) -> Script {
    let mut script = Script::new();
    script.append(OP_HASH160);
    script.append(OP_PUSH + 20);
    script.append_slice(script_hash);
    script.append(OP_EQUAL);
    script
}

/// Turns a destination address into the output script paying it.
///
/// Accepts bech32/bech32m segwit addresses and base58check P2PKH/P2SH
/// addresses, and rejects addresses for another network.
pub fn decode_address(address: &str, network: Network) -> Result<Script> {
    let address = address.trim();
    if is_segwit_address(address) {
        let (version, program) = decode_segwit_address(address, network)?;
        return witness_program_script(version, &program);
    }
    let (version, hash) = decode_base58_address(address)?;
    if version == network.p2pkh_version() {
        Ok(p2pkh_script(&hash))
    } else if version == network.p2sh_version() {
        Ok(p2sh_script(&hash))
    } else {
        Err(Error::BadArgument(format!(
            "Address version 0x{:02x} is not valid on {}",
            version, network
        )))
    }
}

/// Renders an output script as an address, when it has a standard form.
///
/// # Errors
/// `Error::Unsupported` for non-standard scripts.
pub fn script_to_address(script: &[u8], network: Network) -> Result<String> {
    match script {
        [OP_DUP, OP_HASH160, push, hash @ .., OP_EQUALVERIFY, OP_CHECKSIG] if *push == OP_PUSH + 20 && hash.len() == 20 => {
            let mut h = [0u8; 20];
            h.copy_from_slice(hash);
            Ok(encode_p2pkh_address(network, &h))
        }
        [OP_HASH160, push, hash @ .., OP_EQUAL] if *push == OP_PUSH + 20 && hash.len() == 20 => {
            let mut h = [0u8; 20];
            h.copy_from_slice(hash);
            Ok(encode_p2sh_address(network, &h))
        }
        [version_op, push, program @ ..]
            if (*version_op == OP_0 || (OP_1..=OP_1 + 15).contains(version_op))
                && (2..=40).contains(&program.len())
                && usize::from(*push) == program.len() =>
        {
            let version = if *version_op == OP_0 { 0 } else { version_op - OP_1 + 1 };
            encode_segwit_address(network, version, program)
        }
        _ => Err(Error::Unsupported(format!("No address form for script {}", hex::encode(script)))),
    }
}
