//! Shared fixtures: a roulette-like game policy and transaction builders

#![allow(dead_code)]

use games_consensus::block::block_hash_tag;
use games_consensus::builder::{
    build_bet_script_sig, data_carrier_script, p2sh_script_pubkey, BetScript, PushForm,
};
use games_consensus::config::{ActivationHeights, GameParams, Rule};
use games_consensus::descriptor::{BetDescriptor, BetSegment, SegmentKind};
use games_consensus::policy::{ArgumentCombiner, BetPatternPolicy, OutcomePolicy, RewardPolicy};
use games_consensus::*;

pub const INDICATOR: i32 = 0x1000;
pub const ARGUMENT: u32 = 36;
pub const MAX_PAYOFF: Amount = 1_000_000;

pub const RED: [i32; 18] = [1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36];

pub fn params() -> GameParams {
    GameParams::new(INDICATOR, ARGUMENT, MAX_PAYOFF).with_activation(ActivationHeights::always())
}

/// Roulette on `1..=argument`.
///
/// Lottery `n` pays `argument`, `split_n` covers `n` and `n + 1` and pays
/// half, `red`/`odd` cover 18 numbers each.
#[derive(Debug, Clone)]
pub struct Roulette {
    pub argument: u32,
    pub reward_override: Option<u32>,
}

impl Default for Roulette {
    fn default() -> Self {
        Self {
            argument: ARGUMENT,
            reward_override: None,
        }
    }
}

fn odd_numbers() -> Vec<i32> {
    (1..=35).step_by(2).collect()
}

fn sorted(numbers: &[i32]) -> Vec<i32> {
    let mut numbers = numbers.to_vec();
    numbers.sort_unstable();
    numbers
}

impl ArgumentCombiner for Roulette {
    fn combine(&self, argument: u32, block_tag: u32) -> u32 {
        if argument == 0 {
            return 0;
        }
        block_tag % argument + 1
    }
}

impl RewardPolicy for Roulette {
    fn reward(&self, segment: &BetSegment, argument: u32) -> u32 {
        if let Some(reward) = self.reward_override {
            return reward;
        }
        if argument == 0 {
            return 0;
        }
        match segment.kind() {
            SegmentKind::Lottery(Some(n)) if n >= 1 && n <= argument => argument,
            SegmentKind::Qualified(Some(_)) if segment.as_str().starts_with("split_") => {
                argument / 2
            }
            SegmentKind::Named if matches!(segment.as_str(), "red" | "odd") => argument / 18,
            _ => 0,
        }
    }

    fn descriptor_argument(&self, _descriptor: &BetDescriptor, max_reward: u32) -> Result<u32> {
        if self.argument > max_reward {
            return Err(ConsensusError::BetFormat(format!("argument {} too large", self.argument)));
        }
        Ok(self.argument)
    }
}

impl BetPatternPolicy for Roulette {
    fn matches(
        &self,
        height: Natural,
        activation: &ActivationHeights,
        segment: &BetSegment,
        numbers: &[i32],
    ) -> bool {
        match segment.kind() {
            SegmentKind::Lottery(Some(n)) => numbers == [n as i32],
            SegmentKind::Qualified(Some(n)) => sorted(numbers) == vec![n as i32, n as i32 + 1],
            SegmentKind::Named => match segment.as_str() {
                // any 18 numbers were accepted as red before the redefinition
                "red" if !activation.is_active(Rule::RouletteNewDefs, height) => {
                    numbers.len() == 18
                }
                "red" => sorted(numbers) == RED.to_vec(),
                "odd" => sorted(numbers) == odd_numbers(),
                _ => false,
            },
            _ => false,
        }
    }
}

impl OutcomePolicy for Roulette {
    fn is_winning(&self, segment: &BetSegment, _argument: u32, drawn: u32) -> bool {
        let drawn = drawn as i32;
        match segment.kind() {
            SegmentKind::Lottery(Some(n)) => n as i32 == drawn,
            SegmentKind::Qualified(Some(n)) => drawn == n as i32 || drawn == n as i32 + 1,
            SegmentKind::Named => match segment.as_str() {
                "red" => RED.contains(&drawn),
                "odd" => drawn % 2 == 1,
                _ => false,
            },
            _ => false,
        }
    }
}

pub fn escrow_script() -> ByteString {
    p2sh_script_pubkey(&[0x51])
}

/// Wager placement: one escrow output per bet, then the data carrier.
pub fn wager_tx(bets: &[(&str, Amount)]) -> Transaction {
    let descriptor = bets.iter().map(|(bet, _)| *bet).collect::<Vec<_>>().join("+");
    let mut outputs: Vec<TransactionOutput> = bets
        .iter()
        .map(|&(_, value)| TransactionOutput { value, script_pubkey: escrow_script() })
        .collect();
    outputs.push(TransactionOutput {
        value: 0,
        script_pubkey: data_carrier_script(&descriptor, PushForm::minimal(descriptor.len()))
            .unwrap(),
    });
    Transaction {
        version: 1 ^ INDICATOR,
        inputs: vec![TransactionInput {
            prevout: OutPoint { hash: [9; 32], index: 0 },
            script_sig: vec![],
            sequence: 0xffffffff,
        }],
        outputs,
        lock_time: 0,
    }
}

/// Input redeeming output `index` of `prev_txid`, bound to `prev_block_hash`.
pub fn settlement_input(
    game: &Roulette,
    prev_txid: Hash,
    index: u32,
    prev_block_hash: &Hash,
    numbers: &[i32],
    argument: u32,
) -> TransactionInput {
    let bet = BetScript { pubkey_hash: [0x22; 20], numbers: numbers.to_vec(), argument };
    let tag = game.combine(argument, block_hash_tag(prev_block_hash));
    TransactionInput {
        prevout: OutPoint { hash: prev_txid, index },
        script_sig: build_bet_script_sig(tag, &[0x30; 71], &[0x02; 33], &bet).unwrap(),
        sequence: 0xffffffff,
    }
}

pub fn settlement_tx(inputs: Vec<TransactionInput>, payout: Amount) -> Transaction {
    Transaction {
        version: 1,
        inputs,
        outputs: vec![TransactionOutput { value: payout, script_pubkey: vec![0x51] }],
        lock_time: 0,
    }
}

pub fn block_with(transactions: Vec<Transaction>, nonce: u32) -> Block {
    Block {
        header: BlockHeader {
            version: 1,
            prev_block_hash: [0; 32],
            merkle_root: [0; 32],
            timestamp: 1_600_000_000,
            bits: 0x1d00ffff,
            nonce,
        },
        transactions,
    }
}
