//! Settlement (get-bet) reward verification
//!
//! A settlement transaction spends escrowed wager outputs. For every input
//! the redeem script's argument and bound block tag are re-derived, the
//! wager's descriptor segment is looked up in the spent transaction, and the
//! script-encoded reward must equal the policy reward for that segment. The
//! transaction's declared outputs are then bounded by the accumulated reward.

use tracing::{debug, warn};

use crate::block::block_hash_tag;
use crate::chain::{ChainView, ConfirmedTransaction};
use crate::config::{GameParams, Rule};
use crate::descriptor::extract_descriptor;
use crate::economic::{calculate_fee, checked_add, checked_payout, money_range};
use crate::error::{ConsensusError, Result};
use crate::policy::Policies;
use crate::script::{match_bet_script, script_argument, script_block_tag};
use crate::transaction::is_make_bet_tx;
use crate::types::*;

/// Per-input verification result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardRecord {
    pub input_index: usize,
    /// Argument encoded in the redeem script
    pub argument: u32,
    /// Argument the reward policy derives from the wager's descriptor
    pub descriptor_argument: u32,
    pub bets_encoded: usize,
    pub bet_numbers: BetNumbers,
    /// `argument / bets_encoded`
    pub script_reward: u32,
    /// Value of the spent wager output
    pub amount: Amount,
    /// The descriptor argument yields a different reward than the script
    /// argument. Recorded, not rejected.
    pub argument_divergence: bool,
}

/// Whole-transaction verification result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettlementReport {
    pub fee: Amount,
    pub total_reward: Amount,
    pub input_sum: Amount,
    pub records: Vec<RewardRecord>,
}

impl SettlementReport {
    pub fn has_divergence(&self) -> bool {
        self.records.iter().any(|r| r.argument_divergence)
    }
}

/// Verify one settlement input against the wager transaction it spends.
pub fn verify_bet_input(
    height: Natural,
    tx: &Transaction,
    input_index: usize,
    prev: &ConfirmedTransaction,
    policies: &Policies<'_>,
    params: &GameParams,
) -> Result<RewardRecord> {
    let input = tx.inputs.get(input_index).ok_or_else(|| {
        ConsensusError::Reference(format!("input {} out of range", input_index))
    })?;

    if !is_make_bet_tx(&prev.tx, params.make_bet_indicator) {
        return Err(ConsensusError::BetFormat(format!(
            "spent transaction version {} is not a wager",
            prev.tx.version
        )));
    }

    // bind the wager to the block that mined it
    let argument = script_argument(&input.script_sig)?;
    let expected_tag = policies
        .combiner
        .combine(argument, block_hash_tag(&prev.block_hash));
    let script_tag = script_block_tag(&input.script_sig)?;
    if expected_tag != script_tag {
        return Err(ConsensusError::BetFormat(format!(
            "blockhash mismatch: script 0x{:08x}, chain 0x{:08x}",
            script_tag, expected_tag
        )));
    }

    let carrier = extract_descriptor(&prev.tx)?;
    let descriptor_argument = policies
        .reward
        .descriptor_argument(&carrier.descriptor, params.max_reward)?;

    let out_index = input.prevout.index as usize;
    let segment = carrier.descriptor.segment(out_index).ok_or_else(|| {
        ConsensusError::Descriptor(format!(
            "no bet segment for output {} in '{}'",
            out_index, carrier.descriptor
        ))
    })?;

    let op_return_reward = policies.reward.reward(segment, argument);

    let bet = match_bet_script(&input.script_sig)?;
    let script_reward = argument / bet.bets_encoded as u32;
    if op_return_reward != script_reward {
        return Err(ConsensusError::EconomicValidation(format!(
            "opReturnReward {} != scriptReward {}",
            op_return_reward, script_reward
        )));
    }

    if !policies
        .pattern
        .matches(height, &params.activation, segment, &bet.numbers)
    {
        return Err(ConsensusError::BetFormat(format!(
            "numbers {:?} do not match bet '{}'",
            bet.numbers, segment
        )));
    }

    if op_return_reward > params.max_reward || script_reward > params.max_reward {
        return Err(ConsensusError::EconomicValidation(format!(
            "reward {} exceeds maximum {}",
            script_reward, params.max_reward
        )));
    }

    let amount = prev
        .tx
        .outputs
        .get(out_index)
        .map(|output| output.value)
        .ok_or_else(|| {
            ConsensusError::Reference(format!("spent output {} does not exist", out_index))
        })?;

    let descriptor_reward = policies.reward.reward(segment, descriptor_argument);
    let argument_divergence = descriptor_reward != script_reward;
    if argument_divergence {
        warn!(
            input_index,
            argument,
            descriptor_argument,
            "descriptor argument diverges from script argument"
        );
    }

    Ok(RewardRecord {
        input_index,
        argument,
        descriptor_argument,
        bets_encoded: bet.bets_encoded,
        bet_numbers: bet.numbers,
        script_reward,
        amount,
        argument_divergence,
    })
}

/// Verify every input of a settlement transaction and bound its outputs.
///
/// `declared_in` and `declared_out` are the input and output totals the
/// ledger computed for `tx`.
pub fn verify_settlement(
    height: Natural,
    tx: &Transaction,
    declared_in: Amount,
    declared_out: Amount,
    chain: &dyn ChainView,
    policies: &Policies<'_>,
    params: &GameParams,
) -> Result<SettlementReport> {
    let mut report = SettlementReport::default();

    for (idx, input) in tx.inputs.iter().enumerate() {
        let record = chain
            .confirmed_transaction(&input.prevout.hash)
            .and_then(|prev| verify_bet_input(height, tx, idx, &prev, policies, params))
            .map_err(|err| {
                warn!(input = idx, %err, "settlement input rejected");
                err
            })?;

        let payout = checked_payout(record.script_reward, record.amount)?;
        report.total_reward = checked_add(report.total_reward, payout)?;
        report.input_sum = checked_add(report.input_sum, record.amount)?;
        report.records.push(record);
    }

    if declared_in != report.input_sum {
        warn!(declared_in, input_sum = report.input_sum, "in != inputSum");
        return Err(ConsensusError::EconomicValidation(format!(
            "declared input {} != input sum {}",
            declared_in, report.input_sum
        )));
    }

    if !money_range(declared_out) || declared_out > params.max_payoff {
        warn!(declared_out, max_payoff = params.max_payoff, "out > maxPayoff");
        return Err(ConsensusError::EconomicValidation(format!(
            "declared output {} exceeds maximum payoff {}",
            declared_out, params.max_payoff
        )));
    }

    if declared_out > report.total_reward {
        warn!(declared_out, total_reward = report.total_reward, "out > totalReward");
        return Err(ConsensusError::EconomicValidation(format!(
            "declared output {} exceeds total reward {}",
            declared_out, report.total_reward
        )));
    }

    report.fee = calculate_fee(report.total_reward, declared_out)?;
    debug!(fee = report.fee, total_reward = report.total_reward, "settlement verified");
    Ok(report)
}

/// Height-gated settlement check returning the verdict and the fee.
///
/// Before settlement verification activates no check is performed and the
/// fee is zero.
pub fn check_settlement(
    height: Natural,
    tx: &Transaction,
    declared_in: Amount,
    declared_out: Amount,
    chain: &dyn ChainView,
    policies: &Policies<'_>,
    params: &GameParams,
) -> (ValidationResult, Amount) {
    if !params.is_active(Rule::GetBetNewVerify, height) {
        return (ValidationResult::Valid, 0);
    }
    match verify_settlement(height, tx, declared_in, declared_out, chain, policies, params) {
        Ok(report) => (ValidationResult::Valid, report.fee),
        Err(err) => (ValidationResult::Invalid(err), 0),
    }
}
