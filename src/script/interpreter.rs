//! Script interpreter for the opcodes used by hash-lock witness scripts.

use crate::script::Checker;
use crate::script::op_codes::*;
use crate::util::{Error, Result, sha256};
use bitcoin_hashes::hash160 as bh_hash160;
use std::borrow::Cow;
use std::collections::VecDeque;

/// Largest item that may be pushed or supplied on the witness stack.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;

const STACK_CAPACITY: usize = 8;

/// Executes `script` starting from `initial` (bottom item first) and returns
/// the final stack, bottom item first.
///
/// `OP_CHECKSIG` hands the whole script to the checker as the script code,
/// which is what segwit v0 signs. Opcodes outside the supported set fail with
/// `Error::Unsupported`.
pub fn eval<T: Checker>(script: &[u8], initial: &[Vec<u8>], checker: &mut T) -> Result<Vec<Vec<u8>>> {
    let mut stack: VecDeque<Cow<[u8]>> = VecDeque::with_capacity(STACK_CAPACITY.max(initial.len()));
    for item in initial {
        if item.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(Error::ScriptError(format!("Stack item too large: {} bytes", item.len())));
        }
        stack.push_back(Cow::Borrowed(item.as_slice()));
    }
    let mut i = 0;
    while i < script.len() {
        match script[i] {
            OP_0 => stack.push_back(Cow::Owned(vec![])),
            len @ 1..=75 => {
                remains(i + 1, len as usize, script)?;
                stack.push_back(Cow::Borrowed(&script[i + 1..i + 1 + len as usize]));
                i += len as usize;
            }
            OP_PUSHDATA1 => {
                remains(i + 1, 1, script)?;
                let len = script[i + 1] as usize;
                remains(i + 2, len, script)?;
                stack.push_back(Cow::Borrowed(&script[i + 2..i + 2 + len]));
                i += len + 1;
            }
            OP_PUSHDATA2 => {
                remains(i + 1, 2, script)?;
                let len = u16::from_le_bytes([script[i + 1], script[i + 2]]) as usize;
                remains(i + 3, len, script)?;
                stack.push_back(Cow::Borrowed(&script[i + 3..i + 3 + len]));
                i += len + 2;
            }
            OP_PUSHDATA4 => {
                remains(i + 1, 4, script)?;
                let len = u32::from_le_bytes([script[i + 1], script[i + 2], script[i + 3], script[i + 4]]) as usize;
                remains(i + 5, len, script)?;
                stack.push_back(Cow::Borrowed(&script[i + 5..i + 5 + len]));
                i += len + 4;
            }
            op @ OP_1..=OP_16 => stack.push_back(Cow::Owned(vec![op - OP_1 + 1])),
            OP_VERIFY => {
                if !pop_bool(&mut stack)? {
                    return Err(Error::ScriptError("OP_VERIFY failed".to_string()));
                }
            }
            OP_DROP => {
                pop(&mut stack)?;
            }
            OP_DUP => {
                let top = peek(&stack)?.clone();
                stack.push_back(top);
            }
            OP_EQUAL => {
                let a = pop(&mut stack)?;
                let b = pop(&mut stack)?;
                stack.push_back(encode_bool(a == b));
            }
            OP_EQUALVERIFY => {
                let a = pop(&mut stack)?;
                let b = pop(&mut stack)?;
                if a != b {
                    return Err(Error::ScriptError("Operands are not equal".to_string()));
                }
            }
            OP_SHA256 => {
                let v = pop(&mut stack)?;
                stack.push_back(Cow::Owned(sha256(&v).to_vec()));
            }
            OP_HASH160 => {
                let v = pop(&mut stack)?;
                stack.push_back(Cow::Owned(bh_hash160::Hash::hash(&v).to_byte_array().to_vec()));
            }
            OP_CHECKSIG | OP_CHECKSIGVERIFY => {
                let pubkey = pop(&mut stack)?;
                let sig = pop(&mut stack)?;
                let success = !sig.is_empty() && checker.check_sig(&sig, &pubkey, script)?;
                if script[i] == OP_CHECKSIGVERIFY {
                    if !success {
                        return Err(Error::ScriptError("OP_CHECKSIGVERIFY failed".to_string()));
                    }
                } else {
                    stack.push_back(encode_bool(success));
                }
            }
            op => {
                return Err(Error::Unsupported(format!("Opcode 0x{:02x} at offset {}", op, i)));
            }
        }
        i += 1;
    }
    Ok(stack.into_iter().map(Cow::into_owned).collect())
}

/// Gets the index of the next operation after the one at `i`.
///
/// Truncated pushes return the script length.
#[must_use]
pub fn next_op(i: usize, script: &[u8]) -> usize {
    if i >= script.len() {
        return script.len();
    }
    let next = match script[i] {
        len @ 1..=75 => i + 1 + len as usize,
        OP_PUSHDATA1 => match script.get(i + 1) {
            Some(&len) => i + 2 + len as usize,
            None => script.len(),
        },
        OP_PUSHDATA2 => match script.get(i + 1..i + 3) {
            Some(b) => i + 3 + u16::from_le_bytes([b[0], b[1]]) as usize,
            None => script.len(),
        },
        OP_PUSHDATA4 => match script.get(i + 1..i + 5) {
            Some(b) => i + 5 + u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize,
            None => script.len(),
        },
        _ => i + 1,
    };
    next.min(script.len())
}

/// Decodes a stack item as a boolean (any non-zero byte except a lone sign bit).
#[must_use]
pub(crate) fn decode_bool(item: &[u8]) -> bool {
    match item.split_last() {
        None => false,
        Some((&last, rest)) => rest.iter().any(|&b| b != 0) || (last != 0 && last != 0x80),
    }
}

fn encode_bool(b: bool) -> Cow<'static, [u8]> {
    if b { Cow::Owned(vec![1]) } else { Cow::Owned(vec![]) }
}

#[inline]
fn pop<'a>(stack: &mut VecDeque<Cow<'a, [u8]>>) -> Result<Cow<'a, [u8]>> {
    stack
        .pop_back()
        .ok_or_else(|| Error::ScriptError("Stack too small".to_string()))
}

#[inline]
fn peek<'a, 'b>(stack: &'b VecDeque<Cow<'a, [u8]>>) -> Result<&'b Cow<'a, [u8]>> {
    stack
        .back()
        .ok_or_else(|| Error::ScriptError("Stack too small".to_string()))
}

#[inline]
fn pop_bool(stack: &mut VecDeque<Cow<[u8]>>) -> Result<bool> {
    Ok(decode_bool(&pop(stack)?))
}

#[inline]
fn remains(i: usize, len: usize, script: &[u8]) -> Result<()> {
    if i + len > script.len() {
        Err(Error::ScriptError("Not enough data remaining".to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{Script, TransactionlessChecker};
    use pretty_assertions::assert_eq;

    /// Accepts any signature whose first byte equals the first pubkey byte.
    struct FirstByteChecker;

    impl Checker for FirstByteChecker {
        fn check_sig(&mut self, sig: &[u8], pubkey: &[u8], _script: &[u8]) -> Result<bool> {
            Ok(sig[0] == pubkey[0])
        }
    }

    fn hashlock_script(commitment: &[u8; 32], pubkey: &[u8]) -> Vec<u8> {
        let mut s = Script::new();
        s.append(OP_SHA256);
        s.append_data(commitment).unwrap();
        s.append(OP_EQUALVERIFY);
        s.append_data(pubkey).unwrap();
        s.append(OP_CHECKSIG);
        s.0
    }

    #[test]
    fn pushes_and_equal() {
        let script = [OP_PUSH + 2, 1, 2, OP_PUSH + 2, 1, 2, OP_EQUAL];
        let stack = eval(&script, &[], &mut TransactionlessChecker).unwrap();
        assert_eq!(stack, vec![vec![1]]);
    }

    #[test]
    fn sha256_preimage_then_checksig() {
        let secret = b"opensesame".to_vec();
        let pubkey = [2u8; 33];
        let script = hashlock_script(&sha256(&secret), &pubkey);
        let stack = eval(&script, &[vec![2, 9], secret.clone()], &mut FirstByteChecker).unwrap();
        assert_eq!(stack, vec![vec![1]]);
        let stack = eval(&script, &[vec![3, 9], secret], &mut FirstByteChecker).unwrap();
        assert_eq!(stack, vec![Vec::<u8>::new()]);
    }

    #[test]
    fn wrong_preimage_fails_equalverify() {
        let script = hashlock_script(&sha256(b"right"), &[2u8; 33]);
        let err = eval(&script, &[vec![2], b"wrong".to_vec()], &mut FirstByteChecker).unwrap_err();
        assert_eq!(err.to_string(), "Script error: Operands are not equal");
    }

    #[test]
    fn empty_signature_is_false_without_checker() {
        let script = [OP_CHECKSIG];
        let stack = eval(&script, &[vec![], vec![2; 33]], &mut TransactionlessChecker).unwrap();
        assert_eq!(stack, vec![Vec::<u8>::new()]);
    }

    #[test]
    fn truncated_and_unknown() {
        let err = eval(&[OP_PUSH + 5, 1], &[], &mut TransactionlessChecker).unwrap_err();
        assert_eq!(err.to_string(), "Script error: Not enough data remaining");
        let err = eval(&[0x63], &[], &mut TransactionlessChecker).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported: Opcode 0x63 at offset 0");
        let err = eval(&[OP_DROP], &[], &mut TransactionlessChecker).unwrap_err();
        assert_eq!(err.to_string(), "Script error: Stack too small");
    }

    #[test]
    fn oversized_witness_item() {
        let err = eval(&[], &[vec![0; MAX_SCRIPT_ELEMENT_SIZE + 1]], &mut TransactionlessChecker).unwrap_err();
        assert_eq!(err.to_string(), "Script error: Stack item too large: 521 bytes");
    }

    #[test]
    fn next_op_walks_pushes() {
        let script = hashlock_script(&[0; 32], &[2; 33]);
        assert_eq!(next_op(0, &script), 1);
        assert_eq!(next_op(1, &script), 34);
        assert_eq!(next_op(34, &script), 35);
        assert_eq!(next_op(35, &script), 69);
        assert_eq!(next_op(69, &script), 70);
        assert_eq!(next_op(0, &[OP_PUSHDATA1]), 1);
    }

    #[test]
    fn bools() {
        assert!(!decode_bool(&[]));
        assert!(!decode_bool(&[0, 0]));
        assert!(!decode_bool(&[0, 0x80]));
        assert!(decode_bool(&[1]));
        assert!(decode_bool(&[0x80, 0]));
    }
}
