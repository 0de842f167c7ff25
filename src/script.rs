//! Bet redemption script template matcher
//!
//! A wager is redeemed by a scriptSig of the form
//!
//! ```text
//! <4: bound block tag> <sig> <pubkey> [OP_PUSHDATA1] <len> <redeem script>
//! ```
//!
//! where the redeem script is
//!
//! ```text
//! OP_DUP OP_HASH160 <20: pubkey hash> OP_EQUALVERIFY OP_CHECKSIG OP_IF
//!   { OP_DUP <4: number> OP_EQUAL OP_IF OP_DROP OP_TRUE OP_ELSE }   (N - 1 times)
//!   <4: number> OP_EQUALVERIFY OP_TRUE
//!   { OP_ENDIF }                                                    (N - 1 times)
//! OP_ELSE OP_DROP OP_FALSE OP_ENDIF <4: argument> OP_DROP
//! ```
//!
//! The matcher walks the redeem script backwards from its end and the push
//! prefix forwards from the script start; the two walks must meet exactly.

use tracing::{trace, warn};

use crate::constants::{BET_NUMBER_SIZE, MAX_BET_NUMBERS, PUBKEY_HASH_PUSH_SIZE};
use crate::cursor::{match_template, BackwardCursor, ForwardCursor, TemplateByte};
use crate::error::TemplateError;
use crate::opcodes::*;
use crate::types::{BetNumbers, TransactionInput};

use TemplateByte::{Any, Op};

/// Trailing window: closes the outer `OP_IF` and drops the argument push.
pub const TRAILER_TEMPLATE: [TemplateByte; 10] = [
    Op(OP_ELSE),
    Op(OP_DROP),
    Op(OP_FALSE),
    Op(OP_ENDIF),
    Any,
    Any,
    Any,
    Any,
    Any,
    Op(OP_DROP),
];

/// Tail of every nested wager test, preceding its number push.
pub const NESTED_BET_TEMPLATE: [TemplateByte; 5] = [
    Op(OP_EQUAL),
    Op(OP_IF),
    Op(OP_DROP),
    Op(OP_TRUE),
    Op(OP_ELSE),
];

/// Signature check opening the wager branch.
pub const SIGNATURE_TEMPLATE: [TemplateByte; 3] = [Op(OP_EQUALVERIFY), Op(OP_CHECKSIG), Op(OP_IF)];

/// Redeem script prefix.
pub const PREFIX_TEMPLATE: [TemplateByte; 2] = [Op(OP_DUP), Op(OP_HASH160)];

/// Offset of the argument push opcode inside the trailing window
const ARGUMENT_PUSH_OFFSET: usize = 4;

/// Result of a successful template match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetMatch {
    /// Number of wagers encoded, `1..=MAX_BET_NUMBERS`
    pub bets_encoded: usize,
    /// Wager numbers, innermost (last encoded) first
    pub numbers: BetNumbers,
    /// Script offset where the redeem script starts
    pub redeem_offset: usize,
}

/// Match a redemption scriptSig against the bet template.
pub fn match_bet_script(script: &[u8]) -> Result<BetMatch, TemplateError> {
    let mut back = BackwardCursor::at_end(script);
    back.take_template(&TRAILER_TEMPLATE)?;

    // OP_TRUE preceded by one OP_ENDIF per nested wager
    let mut bets_encoded = 0;
    for closers in 0..MAX_BET_NUMBERS {
        let offset = back.position().saturating_sub(1);
        match back.take_byte()? {
            OP_TRUE => {
                bets_encoded = closers + 1;
                break;
            }
            OP_ENDIF => continue,
            found => {
                return Err(TemplateError::Mismatch { offset, expected: OP_ENDIF, found });
            }
        }
    }
    if bets_encoded == 0 {
        return Err(TemplateError::UnterminatedChain);
    }

    back.expect_op(OP_EQUALVERIFY)?;
    let mut numbers = Vec::with_capacity(bets_encoded);
    numbers.push(back.take_i32_le()?);
    // push length byte of the number, not part of the template
    back.skip(1)?;

    for _ in 1..bets_encoded {
        back.take_template(&NESTED_BET_TEMPLATE)?;
        numbers.push(back.take_i32_le()?);
        back.skip(1)?;
        back.expect_op(OP_DUP)?;
    }

    back.take_template(&SIGNATURE_TEMPLATE)?;
    back.skip(PUBKEY_HASH_PUSH_SIZE)?;
    back.take_template(&PREFIX_TEMPLATE)?;

    let redeem_offset = redeem_script_offset(script)?;
    if redeem_offset != back.position() {
        return Err(TemplateError::CursorMismatch {
            forward: redeem_offset,
            backward: back.position(),
        });
    }

    Ok(BetMatch { bets_encoded, numbers, redeem_offset })
}

/// Forward walk: block tag, signature and public key pushes, then the
/// redeem script's own length prefix.
fn redeem_script_offset(script: &[u8]) -> Result<usize, TemplateError> {
    let mut fwd = ForwardCursor::at_start(script);
    for _ in 0..3 {
        fwd.skip_short_push()?;
    }
    if fwd.peek_byte()? == OP_PUSHDATA1 {
        fwd.skip(1)?;
    }
    fwd.skip(1)?;
    Ok(fwd.position())
}

/// Match the input's scriptSig; `None` when it is not a bet redemption.
///
/// Scripts without the bet trailer are ordinary spends and are dismissed
/// quietly; a script that has the trailer but fails the full match is logged.
pub fn is_input_bet(input: &TransactionInput) -> Option<BetMatch> {
    if !has_bet_trailer(&input.script_sig) {
        trace!("no bet trailer");
        return None;
    }
    match match_bet_script(&input.script_sig) {
        Ok(bet) => Some(bet),
        Err(err) => {
            warn!(%err, "transaction format check failed");
            None
        }
    }
}

/// Game argument pushed just before the final `OP_DROP`.
pub fn script_argument(script: &[u8]) -> Result<u32, TemplateError> {
    let mut back = BackwardCursor::at_end(script);
    let window = back.take_template(&TRAILER_TEMPLATE)?;
    let push = window[ARGUMENT_PUSH_OFFSET];
    if push as usize != BET_NUMBER_SIZE {
        return Err(TemplateError::BadArgumentPush(push));
    }
    let value = &window[ARGUMENT_PUSH_OFFSET + 1..ARGUMENT_PUSH_OFFSET + 1 + BET_NUMBER_SIZE];
    Ok(u32::from_le_bytes([value[0], value[1], value[2], value[3]]))
}

/// Block tag bound into the scriptSig's first push.
pub fn script_block_tag(script: &[u8]) -> Result<u32, TemplateError> {
    let mut fwd = ForwardCursor::at_start(script);
    fwd.skip(1)?;
    let tag = fwd.take(4)?;
    Ok(u32::from_le_bytes([tag[0], tag[1], tag[2], tag[3]]))
}

/// `OP_HASH160 <20> OP_EQUAL`
pub fn is_pay_to_script_hash(script_pubkey: &[u8]) -> bool {
    script_pubkey.len() == 23
        && script_pubkey[0] == OP_HASH160
        && script_pubkey[1] == 0x14
        && script_pubkey[22] == OP_EQUAL
}

/// Match the trailing window only; cheap pre-filter for callers scanning inputs.
pub fn has_bet_trailer(script: &[u8]) -> bool {
    script.len() >= TRAILER_TEMPLATE.len()
        && match_template(&script[script.len() - TRAILER_TEMPLATE.len()..], &TRAILER_TEMPLATE, 0)
            .is_ok()
}
