use std::path::PathBuf;

use clap::Args;
use hashlock::address::script_to_address;
use hashlock::config::{LockConfig, RedeemConfig};
use hashlock::network::Network;
use hashlock::transaction::hashlock::{HashLock, extract_commitment, verify_secret};
use hashlock::transaction::redeem;
use hashlock::tx::Tx;
use hashlock::util::Result;
use hashlock::wallet::KeyPair;
use log::info;

#[derive(Args)]
pub struct KeygenArgs {
    /// Network: mainnet, testnet, regtest
    #[arg(long, default_value = "testnet")]
    network: Network,
}

#[derive(Args)]
pub struct LockArgs {
    /// Secret in hex; the commitment is its SHA-256
    #[arg(long, conflicts_with = "hash")]
    secret: Option<String>,

    /// Commitment (SHA-256 of the secret) in hex
    #[arg(long)]
    hash: Option<String>,

    /// Compressed public key of the redeemer, in hex
    #[arg(long, conflicts_with = "wif")]
    pubkey: Option<String>,

    /// Private key of the redeemer, in WIF
    #[arg(long)]
    wif: Option<String>,

    /// Network: mainnet, testnet, regtest
    #[arg(long, default_value = "testnet")]
    network: Network,

    /// Read the lock parameters from a TOML file instead
    #[arg(long, conflicts_with_all = ["secret", "hash", "pubkey", "wif"])]
    config: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckSecretArgs {
    /// Witness script in hex
    #[arg(long)]
    script: String,

    /// Candidate secret in hex
    #[arg(long)]
    secret: String,
}

#[derive(Args)]
pub struct RedeemArgs {
    /// Redeem job (TOML)
    #[arg(long)]
    config: PathBuf,
}

#[derive(Args)]
pub struct DecodeArgs {
    /// Raw transaction in hex
    hex: String,

    /// Network used to render output addresses
    #[arg(long, default_value = "testnet")]
    network: Network,
}

fn cli_flag(network: Network) -> &'static str {
    match network {
        Network::Mainnet => "",
        Network::Testnet => " -testnet",
        Network::Regtest => " -regtest",
    }
}

pub fn keygen(args: KeygenArgs) -> Result<()> {
    let key = KeyPair::generate();
    println!("wif:     {}", key.to_wif(args.network));
    println!("pubkey:  {}", hex::encode(key.pubkey()));
    println!("p2wpkh:  {}", key.p2wpkh_address(args.network)?);
    Ok(())
}

pub fn lock(args: LockArgs) -> Result<()> {
    let config = match args.config {
        Some(path) => LockConfig::from_file(path)?,
        None => LockConfig {
            network: args.network,
            secret: args.secret,
            hash: args.hash,
            pubkey: args.pubkey,
            wif: args.wif,
        },
    };
    let lock = config.to_hash_lock()?;
    println!("commitment:     {}", hex::encode(lock.commitment));
    println!("witness script: {}", lock.witness_script().to_hex());
    println!("output script:  {}", lock.output_script().to_hex());
    println!("address:        {}", lock.address(config.network)?);
    Ok(())
}

pub fn check_secret(args: CheckSecretArgs) -> Result<()> {
    let script = hex::decode(args.script.trim())?;
    let secret = hex::decode(args.secret.trim())?;
    let commitment = extract_commitment(&script)?;
    verify_secret(&secret, &commitment)?;
    println!("secret matches commitment {}", hex::encode(commitment));
    Ok(())
}

pub fn redeem(args: RedeemArgs) -> Result<()> {
    let config = RedeemConfig::from_file(&args.config)?;
    let request = config.to_request()?;
    let redeemed = redeem::redeem(&request)?;
    let tx_hex = redeemed.tx.to_hex();
    info!("signed {} bytes", tx_hex.len() / 2);
    println!("txid:  {}", redeemed.tx.hash().encode());
    println!("vsize: {} vB", redeemed.tx.vsize());
    println!("fee:   {} sats", redeemed.fee);
    println!("hex:   {}", tx_hex);
    println!();
    println!("broadcast with: bitcoin-cli{} sendrawtransaction {}", cli_flag(config.network), tx_hex);
    Ok(())
}

pub fn decode(args: DecodeArgs) -> Result<()> {
    let tx = Tx::from_hex(&args.hex)?;
    println!("txid:      {}", tx.hash().encode());
    println!("wtxid:     {}", tx.witness_hash().encode());
    println!("version:   {}", tx.version);
    println!("lock time: {}", tx.lock_time);
    println!("size:      {} bytes, weight {}, vsize {}", tx.size(), tx.weight(), tx.vsize());
    for (i, input) in tx.inputs.iter().enumerate() {
        println!("input {}: {} sequence 0x{:08x}", i, input.prev_output, input.sequence);
        if !input.unlock_script.is_empty() {
            println!("  scriptSig: {}", input.unlock_script.to_hex());
        }
        for (j, item) in input.witness.0.iter().enumerate() {
            println!("  witness {}: {}", j, hex::encode(item));
        }
        if let Some(Ok(lock)) = input.witness.0.last().map(|ws| HashLock::parse(ws)) {
            println!("  hash lock: commitment {}", hex::encode(lock.commitment));
            println!("             pubkey     {}", hex::encode(lock.pubkey));
        }
    }
    for (i, output) in tx.outputs.iter().enumerate() {
        println!("output {}: {} sats {}", i, output.satoshis, output.lock_script.to_hex());
        if let Ok(address) = script_to_address(&output.lock_script.0, args.network) {
            println!("  address: {}", address);
        }
    }
    Ok(())
}
