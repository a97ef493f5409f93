#![deny(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*! # hashlock

Build and redeem SHA-256 preimage-locked Pay-to-Witness-Script-Hash outputs.

An output locked with
`OP_SHA256 <H> OP_EQUALVERIFY <pubkey> OP_CHECKSIG` can be spent by whoever
knows a secret hashing to `H` and holds the private key for `pubkey`. This
crate derives the witness script, output script and bech32 address for such a
lock, and assembles, signs (BIP143, `SIGHASH_ALL`) and serializes (BIP144) the
transaction spending it.

## Usage
```
use hashlock::network::Network;
use hashlock::transaction::hashlock::HashLock;
use hashlock::wallet::KeyPair;

let key = KeyPair::from_secret_bytes(&[0x11; 32]).unwrap();
let lock = HashLock::from_secret(b"hello", &key.pubkey()).unwrap();
assert_eq!(lock.witness_script().len(), 70);
assert_eq!(
    lock.address(Network::Mainnet).unwrap(),
    "bc1qldrak20cj92pf9y3fxrjzyg3m5hv370rgjdx3susm64kjtw4p6jqc3r0x6"
);
```

## Security
- Secrets and private keys are never logged.
- Every signed transaction is run through the script checker before it is
  returned; broadcast is left to a node.
*/

pub mod address;
pub mod config;
pub mod network;
pub mod script;
pub mod transaction;
pub mod tx;
pub mod util;
pub mod wallet;
