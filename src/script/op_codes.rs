//! Script opcodes used by segwit v0 templates.
//!
//! Only the opcodes this crate builds or evaluates are listed.

/// Pushes an empty array (0/false). Also the segwit v0 version opcode.
pub const OP_0: u8 = 0;
/// Offset for direct pushes of 1 to 75 bytes (`OP_PUSH + n`).
pub const OP_PUSH: u8 = 0;
/// Next byte is push length (up to 255 bytes).
pub const OP_PUSHDATA1: u8 = 76;
/// Next two bytes are push length (up to 65535 bytes).
pub const OP_PUSHDATA2: u8 = 77;
/// Next four bytes are push length.
pub const OP_PUSHDATA4: u8 = 78;
/// Pushes 1 onto the stack. Witness versions 1-16 are `OP_1 + v - 1`.
pub const OP_1: u8 = 81;
/// Pushes 16 onto the stack.
pub const OP_16: u8 = 96;

/// Fails if top stack item is false (pops it).
pub const OP_VERIFY: u8 = 105;
/// Drops the top item.
pub const OP_DROP: u8 = 117;
/// Duplicates the top item.
pub const OP_DUP: u8 = 118;
/// Pushes 1 if the top two items are byte-equal, 0 otherwise.
pub const OP_EQUAL: u8 = 135;
/// Same as OP_EQUAL then OP_VERIFY.
pub const OP_EQUALVERIFY: u8 = 136;

/// Replaces the top item with its SHA-256 digest.
pub const OP_SHA256: u8 = 168;
/// Replaces the top item with RIPEMD160(SHA256(x)).
pub const OP_HASH160: u8 = 169;
/// Verifies a signature against a public key and the transaction digest.
pub const OP_CHECKSIG: u8 = 172;
/// Same as OP_CHECKSIG then OP_VERIFY.
pub const OP_CHECKSIGVERIFY: u8 = 173;
