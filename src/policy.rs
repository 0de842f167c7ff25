//! Game policies supplied by the embedding node
//!
//! The checks in this crate are game-agnostic: payout multipliers, legal
//! number sets, outcome rules and the block-hash combiner are injected.
//! Implementations must be pure functions of their arguments.

use crate::config::ActivationHeights;
use crate::descriptor::{BetDescriptor, BetSegment};
use crate::error::Result;
use crate::types::Natural;

/// Combines a game argument with a 32-bit block hash tag.
///
/// Used both to re-derive the block tag a wager is bound to and to draw the
/// outcome of a block.
pub trait ArgumentCombiner {
    fn combine(&self, argument: u32, block_tag: u32) -> u32;
}

pub trait RewardPolicy {
    /// Payout multiplier of `segment` under `argument`; `0` for an unknown bet type.
    fn reward(&self, segment: &BetSegment, argument: u32) -> u32;

    /// Game argument implied by a whole descriptor.
    fn descriptor_argument(&self, descriptor: &BetDescriptor, max_reward: u32) -> Result<u32>;
}

pub trait BetPatternPolicy {
    /// Whether `numbers` is a legal encoding of `segment` at `height`.
    ///
    /// Height-dependent number semantics must be read from `activation`
    /// (see [`crate::config::Rule::RouletteNewDefs`]), the same table the
    /// caller validates with.
    fn matches(
        &self,
        height: Natural,
        activation: &ActivationHeights,
        segment: &BetSegment,
        numbers: &[i32],
    ) -> bool;
}

pub trait OutcomePolicy {
    fn is_winning(&self, segment: &BetSegment, argument: u32, drawn: u32) -> bool;
}

/// Bundle of the four policies, borrowed for one validation call
#[derive(Clone, Copy)]
pub struct Policies<'a> {
    pub combiner: &'a dyn ArgumentCombiner,
    pub reward: &'a dyn RewardPolicy,
    pub pattern: &'a dyn BetPatternPolicy,
    pub outcome: &'a dyn OutcomePolicy,
}

impl<'a> Policies<'a> {
    /// Borrow all four policies from one object implementing them.
    pub fn from_game<G>(game: &'a G) -> Self
    where
        G: ArgumentCombiner + RewardPolicy + BetPatternPolicy + OutcomePolicy,
    {
        Self { combiner: game, reward: game, pattern: game, outcome: game }
    }
}
