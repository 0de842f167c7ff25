//! Block-level payoff auditing
//!
//! Bounds how much a single block can mint through winning wagers. The
//! outcome of every wager placed in a block is drawn from that block's own
//! hash.

use tracing::{debug, warn};

use crate::block::block_hash_tag;
use crate::config::{GameParams, Rule};
use crate::descriptor::extract_descriptor;
use crate::economic::{checked_add, checked_payout, saturating_payout};
use crate::error::{ConsensusError, Result};
use crate::policy::Policies;
use crate::transaction::is_make_bet_tx;
use crate::types::*;

/// Wagered input and winning payoff summed over a block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BetTotals {
    pub wagered: Amount,
    pub payoff: Amount,
}

pub struct BlockRewardAuditor<'a> {
    block: &'a Block,
    policies: Policies<'a>,
    params: &'a GameParams,
    block_subsidy: Amount,
    block_tag: u32,
}

impl<'a> BlockRewardAuditor<'a> {
    pub fn new(
        params: &'a GameParams,
        block: &'a Block,
        block_subsidy: Amount,
        policies: Policies<'a>,
    ) -> Self {
        let block_tag = block_hash_tag(&block.header.hash());
        Self { block, policies, params, block_subsidy, block_tag }
    }

    pub fn block_subsidy(&self) -> Amount {
        self.block_subsidy
    }

    /// Wager totals for one tagged transaction, drawn against this block.
    fn tx_bet_totals(&self, tx: &Transaction) -> Result<BetTotals> {
        let carrier = extract_descriptor(tx)?;
        let descriptor = &carrier.descriptor;
        let argument = self
            .policies
            .reward
            .descriptor_argument(descriptor, self.params.max_reward)?;
        let drawn = self.policies.combiner.combine(argument, self.block_tag);

        if descriptor.len() > tx.outputs.len() {
            return Err(ConsensusError::Descriptor(format!(
                "{} bet segments for {} outputs",
                descriptor.len(),
                tx.outputs.len()
            )));
        }

        let mut totals = BetTotals::default();
        for (segment, output) in descriptor.segments().iter().zip(&tx.outputs) {
            let reward = self.policies.reward.reward(segment, argument);
            if self.policies.outcome.is_winning(segment, argument, drawn) {
                let payoff = saturating_payout(reward, output.value);
                totals.payoff = totals.payoff.saturating_add(payoff);
            }
            totals.wagered = totals.wagered.saturating_add(output.value.max(0));
        }
        Ok(totals)
    }

    /// Wager totals over every tagged transaction of the block.
    ///
    /// Transactions whose descriptor cannot be evaluated are skipped.
    pub fn bet_totals(&self) -> BetTotals {
        let mut totals = BetTotals::default();
        for (idx, tx) in self.block.transactions.iter().enumerate() {
            if !is_make_bet_tx(tx, self.params.make_bet_indicator) {
                continue;
            }
            match self.tx_bet_totals(tx) {
                Ok(tx_totals) => {
                    totals.wagered = totals.wagered.saturating_add(tx_totals.wagered);
                    totals.payoff = totals.payoff.saturating_add(tx_totals.payoff);
                }
                Err(err) => warn!(tx = idx, %err, "skipping wager in payoff audit"),
            }
        }
        totals
    }

    /// Whether the block's winning wagers mint more than allowed.
    ///
    /// Fires only when wagered input reaches 90% of the subsidy and the
    /// payoff exceeds wagered input plus one subsidy.
    pub fn is_bet_payoff_exceeded(&self, height: Natural) -> bool {
        if !self.params.is_active(Rule::MakeBetFormatVerify, height) {
            return false;
        }

        let totals = self.bet_totals();
        let saturation = self.block_subsidy.saturating_mul(9) / 10;
        let ceiling = totals.wagered.saturating_add(self.block_subsidy);
        if totals.wagered >= saturation && totals.payoff > ceiling {
            warn!(
                payoff = totals.payoff,
                wagered = totals.wagered,
                block_subsidy = self.block_subsidy,
                "bet payoff exceeded"
            );
            return true;
        }
        false
    }

    /// Worst-case payoff of one wager transaction, per output capped at half
    /// the block subsidy.
    pub fn potential_reward(&self, tx: &Transaction) -> Result<Amount> {
        let carrier = extract_descriptor(tx)?;
        let descriptor = &carrier.descriptor;
        let argument = self
            .policies
            .reward
            .descriptor_argument(descriptor, self.params.max_reward)?;

        let mut sum: Amount = 0;
        for (i, segment) in descriptor.segments().iter().enumerate() {
            let output = tx.outputs.get(i).ok_or_else(|| {
                ConsensusError::Descriptor(format!("bet segment {} has no output", i))
            })?;
            let reward = self.policies.reward.reward(segment, argument);
            let payoff = checked_payout(reward, output.value)?;
            if payoff > self.block_subsidy / 2 {
                return Err(ConsensusError::EconomicValidation(format!(
                    "potential reward of one bet {} higher than half subsidy {}",
                    payoff, self.block_subsidy
                )));
            }
            sum = checked_add(sum, payoff)?;
        }
        Ok(sum)
    }

    /// Add `tx`'s potential payoff to the block's running `reward_sum`.
    ///
    /// `reward_sum` is only updated when the transaction is accepted.
    pub fn check_potential_reward_limit(
        &self,
        reward_sum: &mut Amount,
        tx: &Transaction,
        height: Natural,
        ignore_hardfork: bool,
    ) -> ValidationResult {
        if !ignore_hardfork && !self.params.is_active(Rule::MakeBetRewardLimit, height) {
            return ValidationResult::Valid;
        }
        if !is_make_bet_tx(tx, self.params.make_bet_indicator) {
            return ValidationResult::Valid;
        }

        let result = self
            .potential_reward(tx)
            .and_then(|payoff| checked_add(*reward_sum, payoff))
            .and_then(|total| {
                if total > self.params.max_payoff {
                    Err(ConsensusError::EconomicValidation(format!(
                        "potential payoff {} above maximum {}",
                        total, self.params.max_payoff
                    )))
                } else {
                    Ok(total)
                }
            });

        match result {
            Ok(total) => {
                debug!(reward_sum = total, "potential reward within limit");
                *reward_sum = total;
                ValidationResult::Valid
            }
            Err(err) => {
                warn!(%err, "potential reward limit");
                ValidationResult::Invalid(err)
            }
        }
    }
}
