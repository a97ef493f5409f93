//! End-to-end redemption of the testnet fixture.

use hashlock::address::decode_address;
use hashlock::network::Network;
use hashlock::script::verify_p2wsh_input;
use hashlock::transaction::builder::{PriorOutput, SendAmount};
use hashlock::transaction::hashlock::HashLock;
use hashlock::transaction::p2wsh;
use hashlock::transaction::redeem::{RedeemRequest, redeem};
use hashlock::transaction::sighash::SigHashCache;
use hashlock::tx::{OutPoint, Tx, TxOut};
use hashlock::util::Error;
use hashlock::wallet::KeyPair;
use hex_literal::hex;
use pretty_assertions::assert_eq;

const WIF: &str = "cTShDrKtShxhLiERY8kBD5cdFrLW3XmkysVPRH9QhkhkLFoehVTY";
const SECRET: [u8; 32] = hex!("f56c1a8ef50e1fc0feaa27c7d927f2bd03a9a4d040944e72e58b2aaeb20e896b");
const FUNDING_TXID: &str = "32cbe7241b2ac8830a22c672e2186ef19ef77e682aff58e70933afd7c8ea6a83";
const DESTINATION: &str = "tb1qswn95gn7h3zmcawkrhz22srak2tt29zj7c3sgm";
const SIGNED_TX: &str = "02000000000101836aeac8d7af3309e758ff2a687ef79ef16e18e272c6220a83c82a1b24e7cb320100000000fdffffff01880d06000000000016001483a65a227ebc45bc75d61dc4a5407db296b514520347304402204f88017ad2660385d4782eb60a996a82ec75b2f0c4bb60c3b34f99d958b8e86702200d46bbaeeadcbf141a7d7ffc1488992bef3a2ce148ad57485eca99da4b720c8e0120f56c1a8ef50e1fc0feaa27c7d927f2bd03a9a4d040944e72e58b2aaeb20e896b46a820a9674085e84fcc06fe764ff6f4f2c1e6a34c102e317898c4468fe679029886428821032fb23d2b944cc1986dda6047f092aac987d0b1d1f2bd9f7af1fc08d464539d14ac00000000";

fn lock() -> (KeyPair, HashLock) {
    let (key, network) = KeyPair::from_wif(WIF).unwrap();
    assert_eq!(network, Network::Testnet);
    let lock = HashLock::from_secret(&SECRET, &key.pubkey()).unwrap();
    (key, lock)
}

fn prev_out(lock: &HashLock) -> TxOut {
    TxOut {
        satoshis: 397680,
        lock_script: lock.output_script(),
    }
}

fn request() -> RedeemRequest {
    let (key, lock) = lock();
    RedeemRequest::new(
        lock.witness_script().0,
        SECRET.to_vec(),
        key,
        PriorOutput {
            outpoint: OutPoint::from_txid(FUNDING_TXID, 1).unwrap(),
            satoshis: 397680,
        },
        decode_address(DESTINATION, Network::Testnet).unwrap(),
        SendAmount::AllLessFee(1000),
    )
}

#[test]
fn lock_address() {
    let (_, lock) = lock();
    assert_eq!(
        lock.address(Network::Testnet).unwrap(),
        "tb1qu94e3jp8d3yd74djtmlzek7h88hr62whz88zdk0w3uzvj4j07u5q7mtv3s"
    );
}

#[test]
fn signs_byte_exact_transaction() {
    let redeemed = redeem(&request()).unwrap();
    assert_eq!(redeemed.tx.to_hex(), SIGNED_TX);
    assert_eq!(redeemed.fee, 1000);
    assert_eq!(
        redeemed.tx.hash().encode(),
        "a7ca2f9f68bf71c80cedffaeda668027d2230692b710c5673374b6ad0bcb0594"
    );
    assert_eq!(
        redeemed.tx.witness_hash().encode(),
        "ad8638172ba28020b425b2294d8daab8664d8057ae6808c1a561d04d048522f9"
    );
    assert_eq!(redeemed.tx.vsize(), 127);
}

#[test]
fn checker_accepts_fixture() {
    let (_, lock) = lock();
    let tx = Tx::from_hex(SIGNED_TX).unwrap();
    verify_p2wsh_input(&tx, 0, &prev_out(&lock), &mut SigHashCache::new()).unwrap();
}

#[test]
fn checker_rejects_tampered_secret() {
    let (_, lock) = lock();
    let mut tx = Tx::from_hex(SIGNED_TX).unwrap();
    tx.inputs[0].witness.0[1][0] ^= 0x01;
    let err = verify_p2wsh_input(&tx, 0, &prev_out(&lock), &mut SigHashCache::new()).unwrap_err();
    assert!(matches!(err, Error::ScriptError(_)));
}

#[test]
fn checker_rejects_tampered_signature() {
    let (_, lock) = lock();
    let mut tx = Tx::from_hex(SIGNED_TX).unwrap();
    // Flip a bit inside r; the DER structure stays intact.
    tx.inputs[0].witness.0[0][10] ^= 0x01;
    let err = verify_p2wsh_input(&tx, 0, &prev_out(&lock), &mut SigHashCache::new()).unwrap_err();
    assert_eq!(err.to_string(), "Script error: Script evaluated to false");
}

#[test]
fn checker_rejects_changed_output() {
    let (_, lock) = lock();
    let mut tx = Tx::from_hex(SIGNED_TX).unwrap();
    tx.outputs[0].satoshis += 1;
    let err = verify_p2wsh_input(&tx, 0, &prev_out(&lock), &mut SigHashCache::new()).unwrap_err();
    assert_eq!(err.to_string(), "Script error: Script evaluated to false");
}

#[test]
fn checker_rejects_other_witness_script() {
    let (_, lock) = lock();
    let other = HashLock::from_secret(b"other", &lock.pubkey).unwrap();
    let mut tx = Tx::from_hex(SIGNED_TX).unwrap();
    tx.inputs[0].witness.0[2] = other.witness_script().0;
    let err = verify_p2wsh_input(&tx, 0, &prev_out(&lock), &mut SigHashCache::new()).unwrap_err();
    assert_eq!(err.to_string(), "Script error: Witness script does not match program");
}

#[test]
fn insufficient_funds() {
    let mut r = request();
    r.amount = SendAmount::AllLessFee(400000);
    let err = redeem(&r).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Insufficient funds: prior output holds 397680 sats, 400000 sats requested"
    );
}

#[test]
fn regtest_round_trip() {
    let key = KeyPair::generate();
    let secret = b"regtest preimage".to_vec();
    let lock = HashLock::from_secret(&secret, &key.pubkey()).unwrap();
    assert!(lock.address(Network::Regtest).unwrap().starts_with("bcrt1q"));

    let destination = decode_address(&key.p2wpkh_address(Network::Regtest).unwrap(), Network::Regtest).unwrap();
    let mut request = RedeemRequest::new(
        lock.witness_script().0,
        secret,
        key,
        PriorOutput {
            outpoint: OutPoint::from_txid(&"11".repeat(32), 0).unwrap(),
            satoshis: 100_000,
        },
        destination,
        SendAmount::Exact(99_000),
    );
    request.lock_time = 200;
    let redeemed = redeem(&request).unwrap();
    assert_eq!(redeemed.fee, 1000);
    assert_eq!(redeemed.tx.lock_time, 200);

    let decoded = Tx::from_hex(&redeemed.tx.to_hex()).unwrap();
    assert_eq!(decoded, redeemed.tx);
    let prev = TxOut {
        satoshis: 100_000,
        lock_script: p2wsh::create_lock_script(&lock.witness_script().0),
    };
    verify_p2wsh_input(&decoded, 0, &prev, &mut SigHashCache::new()).unwrap();
}
