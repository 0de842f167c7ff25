//! Structural rules for wager-placement (make-bet) transactions

use tracing::warn;

use crate::config::{GameParams, Rule};
use crate::descriptor::{extract_descriptor, BetSegment, SegmentKind};
use crate::error::{ConsensusError, Result};
use crate::policy::RewardPolicy;
use crate::script::is_pay_to_script_hash;
use crate::transaction::is_make_bet_tx;
use crate::types::*;

pub struct MakeBetFormatValidator<'a> {
    reward: &'a dyn RewardPolicy,
    params: &'a GameParams,
}

/// Per-segment amount ceiling.
///
/// A lottery number must lie in `1..=argument`; a qualified bet's suffix,
/// when present, must be nonzero.
pub fn check_bet_amount_limit(argument: u32, segment: &BetSegment) -> Result<()> {
    match segment.kind() {
        SegmentKind::Lottery(number) => {
            let number = number.unwrap_or(0);
            if number == 0 {
                return Err(ConsensusError::BetFormat(format!(
                    "bet amount below limit in '{}'",
                    segment
                )));
            }
            if number > argument {
                return Err(ConsensusError::BetFormat(format!(
                    "bet amount {} above game limit {}",
                    number, argument
                )));
            }
        }
        SegmentKind::Qualified(Some(0)) => {
            return Err(ConsensusError::BetFormat(format!(
                "bet amount below limit in '{}'",
                segment
            )));
        }
        SegmentKind::Qualified(None) => {
            return Err(ConsensusError::BetFormat(format!(
                "bet amount suffix of '{}' is not a number",
                segment
            )));
        }
        SegmentKind::Qualified(Some(_)) | SegmentKind::Named => {}
    }
    Ok(())
}

impl<'a> MakeBetFormatValidator<'a> {
    pub fn new(reward: &'a dyn RewardPolicy, params: &'a GameParams) -> Self {
        Self { reward, params }
    }

    fn verify(&self, tx: &Transaction) -> Result<()> {
        if tx.outputs.len() < 2 {
            return Err(ConsensusError::BetFormat(format!(
                "{} outputs, wager needs at least 2",
                tx.outputs.len()
            )));
        }

        let carrier = extract_descriptor(tx)?;
        let descriptor = &carrier.descriptor;
        let argument = self.reward.descriptor_argument(descriptor, self.params.max_reward)?;
        if argument > self.params.max_reward {
            return Err(ConsensusError::BetFormat(format!("bad argument: {}", argument)));
        }

        for (i, segment) in descriptor.segments().iter().enumerate() {
            if self.reward.reward(segment, argument) == 0 {
                return Err(ConsensusError::BetFormat(format!("unknown bet type '{}'", segment)));
            }
            check_bet_amount_limit(argument, segment)?;
            let output = tx.outputs.get(i).ok_or_else(|| {
                ConsensusError::BetFormat(format!("bet segment {} has no output", i))
            })?;
            if output.value == 0 {
                return Err(ConsensusError::BetFormat(format!("output {} stakes nothing", i)));
            }
        }

        // stakes must be escrowed
        for (i, output) in tx.outputs[..carrier.output_index].iter().enumerate() {
            if !is_pay_to_script_hash(&output.script_pubkey) {
                return Err(ConsensusError::BetFormat(format!(
                    "output {} before data carrier is not P2SH",
                    i
                )));
            }
        }
        Ok(())
    }

    /// Verify a wager-placement transaction. Untagged transactions pass.
    pub fn tx_make_bet_verify(
        &self,
        tx: &Transaction,
        height: Natural,
        ignore_hardfork: bool,
    ) -> ValidationResult {
        if !ignore_hardfork && !self.params.is_active(Rule::MakeBetFormatVerify, height) {
            return ValidationResult::Valid;
        }
        if !is_make_bet_tx(tx, self.params.make_bet_indicator) {
            return ValidationResult::Valid;
        }
        match self.verify(tx) {
            Ok(()) => ValidationResult::Valid,
            Err(err) => {
                warn!(%err, "txMakeBetVerify");
                ValidationResult::Invalid(err)
            }
        }
    }
}
