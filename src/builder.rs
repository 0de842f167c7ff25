//! Script construction for wager placement and redemption
//!
//! These are the inverses of the matchers in [`crate::script`] and
//! [`crate::descriptor`].

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::constants::{BET_NUMBER_SIZE, MAX_BET_NUMBERS};
use crate::error::{ConsensusError, Result};
use crate::opcodes::*;
use crate::types::{BetNumbers, ByteString};

/// HASH160: RIPEMD160(SHA256(x))
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha256_hash = Sha256::digest(data);
    let ripemd160_hash = Ripemd160::digest(sha256_hash);
    let mut out = [0u8; 20];
    out.copy_from_slice(&ripemd160_hash);
    out
}

/// `OP_HASH160 <hash160(redeem_script)> OP_EQUAL`
pub fn p2sh_script_pubkey(redeem_script: &[u8]) -> ByteString {
    let mut script = Vec::with_capacity(23);
    script.push(OP_HASH160);
    script.push(0x14);
    script.extend_from_slice(&hash160(redeem_script));
    script.push(OP_EQUAL);
    script
}

/// Wager redemption parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetScript {
    pub pubkey_hash: [u8; 20],
    /// Innermost wager first, the order the matcher reports
    pub numbers: BetNumbers,
    pub argument: u32,
}

impl BetScript {
    pub fn redeem_script(&self) -> Result<ByteString> {
        if self.numbers.is_empty() || self.numbers.len() > MAX_BET_NUMBERS {
            return Err(ConsensusError::Serialization(format!(
                "cannot encode {} wager numbers",
                self.numbers.len()
            )));
        }

        let mut script = vec![OP_DUP, OP_HASH160, 0x14];
        script.extend_from_slice(&self.pubkey_hash);
        script.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG, OP_IF]);

        for number in self.numbers[1..].iter().rev() {
            script.extend_from_slice(&[OP_DUP, BET_NUMBER_SIZE as u8]);
            script.extend_from_slice(&number.to_le_bytes());
            script.extend_from_slice(&[OP_EQUAL, OP_IF, OP_DROP, OP_TRUE, OP_ELSE]);
        }
        script.push(BET_NUMBER_SIZE as u8);
        script.extend_from_slice(&self.numbers[0].to_le_bytes());
        script.extend_from_slice(&[OP_EQUALVERIFY, OP_TRUE]);
        script.extend(std::iter::repeat(OP_ENDIF).take(self.numbers.len() - 1));

        script.extend_from_slice(&[OP_ELSE, OP_DROP, OP_FALSE, OP_ENDIF, BET_NUMBER_SIZE as u8]);
        script.extend_from_slice(&self.argument.to_le_bytes());
        script.push(OP_DROP);
        Ok(script)
    }
}

fn push_short(script: &mut ByteString, data: &[u8], what: &str) -> Result<()> {
    if data.len() > MAX_DIRECT_PUSH as usize {
        return Err(ConsensusError::Serialization(format!(
            "{} of {} bytes exceeds a direct push",
            what,
            data.len()
        )));
    }
    script.push(data.len() as u8);
    script.extend_from_slice(data);
    Ok(())
}

/// `<block tag> <signature> <pubkey> <redeem script>`
pub fn build_bet_script_sig(
    block_tag: u32,
    signature: &[u8],
    pubkey: &[u8],
    bet: &BetScript,
) -> Result<ByteString> {
    let redeem = bet.redeem_script()?;
    let mut script = Vec::with_capacity(8 + signature.len() + pubkey.len() + redeem.len());
    push_short(&mut script, &block_tag.to_le_bytes(), "block tag")?;
    push_short(&mut script, signature, "signature")?;
    push_short(&mut script, pubkey, "public key")?;
    if redeem.len() > MAX_DIRECT_PUSH as usize {
        script.push(OP_PUSHDATA1);
    }
    // redeem scripts are at most 43 + 12 * 17 bytes
    script.push(redeem.len() as u8);
    script.extend_from_slice(&redeem);
    Ok(script)
}

/// Length encoding of a data-carrier push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushForm {
    Direct,
    PushData1,
    PushData2,
    PushData4,
}

impl PushForm {
    /// Smallest form able to carry `len` bytes
    pub fn minimal(len: usize) -> Self {
        if len <= MAX_DIRECT_PUSH as usize {
            PushForm::Direct
        } else if len <= u8::MAX as usize {
            PushForm::PushData1
        } else if len <= u16::MAX as usize {
            PushForm::PushData2
        } else {
            PushForm::PushData4
        }
    }
}

/// `OP_RETURN <push descriptor>` using the requested length encoding.
pub fn data_carrier_script(descriptor: &str, form: PushForm) -> Result<ByteString> {
    let data = descriptor.as_bytes();
    let len = data.len();
    let too_long = || {
        ConsensusError::Serialization(format!(
            "descriptor of {} bytes does not fit {:?}",
            len, form
        ))
    };

    let mut script = vec![OP_RETURN];
    match form {
        PushForm::Direct => {
            if len > MAX_DIRECT_PUSH as usize {
                return Err(too_long());
            }
            script.push(len as u8);
        }
        PushForm::PushData1 => {
            let len = u8::try_from(len).map_err(|_| too_long())?;
            script.push(OP_PUSHDATA1);
            script.push(len);
        }
        PushForm::PushData2 => {
            let len = u16::try_from(len).map_err(|_| too_long())?;
            script.push(OP_PUSHDATA2);
            script.extend_from_slice(&len.to_le_bytes());
        }
        PushForm::PushData4 => {
            let len = u32::try_from(len).map_err(|_| too_long())?;
            script.push(OP_PUSHDATA4);
            script.extend_from_slice(&len.to_le_bytes());
        }
    }
    script.extend_from_slice(data);
    Ok(script)
}
