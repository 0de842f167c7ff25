//! # Games-Consensus
//!
//! Consensus enforcement for the numbers/roulette betting game embedded in
//! ledger transactions.
//!
//! This crate provides pure, side-effect-free functions deciding whether a
//! transaction or block that places or settles a wager is well-formed and
//! economically sound. Every validating node must reach the same verdict,
//! so nothing here reads wall-clock time or node-local state.
//!
//! ## Architecture
//!
//! - Script template matcher ([`script`]): recognises bet redemption scripts
//!   and recovers the wagered numbers
//! - Bet descriptor extractor ([`descriptor`]): reads the per-output bet
//!   choices from a wager's data-carrier output
//! - Reward verifier ([`reward`]): recomputes a settlement's reward and fee
//! - Payoff auditor ([`payoff`]): bounds what a block may mint through wagers
//! - Format validator ([`format`]): structural rules for wager placements
//!
//! Game rules (payout multipliers, legal numbers, outcomes) are injected
//! through the traits in [`policy`]; ledger lookups through
//! [`chain::ChainView`].
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: All checks are deterministic and side-effect-free
//! 2. **Bounded Reads**: Script bytes are only read through bounds-checked cursors
//! 3. **Explicit Heights**: Rule activation is a function of the height passed in
//! 4. **Exact Version Pinning**: Consensus-critical hashing dependencies are pinned
//!
//! ## Usage
//!
//! ```rust
//! use games_consensus::GamesConsensus;
//! use games_consensus::config::GameParams;
//! use games_consensus::types::*;
//!
//! let consensus = GamesConsensus::new(GameParams::new(0x1000, 36, 1_000_000));
//! let tx = Transaction {
//!     version: 1 ^ 0x1000,
//!     inputs: vec![],
//!     outputs: vec![],
//!     lock_time: 0,
//! };
//! assert!(consensus.is_make_bet_tx(&tx));
//! ```

pub mod types;
pub mod constants;
pub mod opcodes;
pub mod error;
pub mod config;
pub mod cursor;
pub mod script;
pub mod descriptor;
pub mod policy;
pub mod chain;
pub mod economic;
pub mod block;
pub mod transaction;
pub mod reward;
pub mod payoff;
pub mod format;
pub mod builder;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use error::{ConsensusError, ErrorClass, Result, TemplateError};

use chain::ChainView;
use config::GameParams;
use descriptor::DataCarrier;
use format::MakeBetFormatValidator;
use payoff::BlockRewardAuditor;
use policy::{Policies, RewardPolicy};
use reward::SettlementReport;
use script::BetMatch;

/// Games consensus checks bound to one set of network parameters
#[derive(Debug, Clone)]
pub struct GamesConsensus {
    params: GameParams,
}

impl GamesConsensus {
    pub fn new(params: GameParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &GameParams {
        &self.params
    }

    /// Whether `tx` carries the wager-placement version tag
    pub fn is_make_bet_tx(&self, tx: &Transaction) -> bool {
        transaction::is_make_bet_tx(tx, self.params.make_bet_indicator)
    }

    /// Match an input's scriptSig against the bet redemption template
    ///
    /// # Examples
    ///
    /// ```
    /// use games_consensus::GamesConsensus;
    /// use games_consensus::builder::{build_bet_script_sig, BetScript};
    /// use games_consensus::config::GameParams;
    /// use games_consensus::types::*;
    ///
    /// let consensus = GamesConsensus::new(GameParams::new(0x1000, 36, 1_000_000));
    /// let bet = BetScript { pubkey_hash: [0; 20], numbers: vec![17], argument: 36 };
    /// let input = TransactionInput {
    ///     prevout: OutPoint { hash: [1; 32], index: 0 },
    ///     script_sig: build_bet_script_sig(0, &[0x30; 71], &[0x02; 33], &bet).unwrap(),
    ///     sequence: 0xffffffff,
    /// };
    ///
    /// let matched = consensus.is_input_bet(&input).unwrap();
    /// assert_eq!(matched.bets_encoded, 1);
    /// assert_eq!(matched.numbers, vec![17]);
    /// ```
    pub fn is_input_bet(&self, input: &TransactionInput) -> Option<BetMatch> {
        script::is_input_bet(input)
    }

    /// Extract the bet descriptor of a wager-placement transaction
    ///
    /// # Examples
    ///
    /// ```
    /// use games_consensus::GamesConsensus;
    /// use games_consensus::builder::{data_carrier_script, PushForm};
    /// use games_consensus::config::GameParams;
    /// use games_consensus::types::*;
    ///
    /// let consensus = GamesConsensus::new(GameParams::new(0x1000, 36, 1_000_000));
    /// let tx = Transaction {
    ///     version: 1,
    ///     inputs: vec![],
    ///     outputs: vec![
    ///         TransactionOutput { value: 100, script_pubkey: vec![] },
    ///         TransactionOutput {
    ///             value: 0,
    ///             script_pubkey: data_carrier_script("17", PushForm::Direct).unwrap(),
    ///         },
    ///     ],
    ///     lock_time: 0,
    /// };
    ///
    /// let carrier = consensus.extract_descriptor(&tx).unwrap();
    /// assert_eq!(carrier.output_index, 1);
    /// assert_eq!(carrier.descriptor.as_str(), "17");
    /// ```
    pub fn extract_descriptor(&self, tx: &Transaction) -> Result<DataCarrier> {
        descriptor::extract_descriptor(tx)
    }

    /// Verify a settlement transaction, returning its reward breakdown
    pub fn verify_settlement(
        &self,
        height: Natural,
        tx: &Transaction,
        declared_in: Amount,
        declared_out: Amount,
        chain: &dyn ChainView,
        policies: &Policies<'_>,
    ) -> Result<SettlementReport> {
        let params = &self.params;
        reward::verify_settlement(height, tx, declared_in, declared_out, chain, policies, params)
    }

    /// Height-gated settlement check returning the verdict and the fee
    pub fn check_settlement(
        &self,
        height: Natural,
        tx: &Transaction,
        declared_in: Amount,
        declared_out: Amount,
        chain: &dyn ChainView,
        policies: &Policies<'_>,
    ) -> (ValidationResult, Amount) {
        let params = &self.params;
        reward::check_settlement(height, tx, declared_in, declared_out, chain, policies, params)
    }

    /// Payoff auditor for `block`, whose subsidy is `block_subsidy`
    pub fn block_auditor<'a>(
        &'a self,
        block: &'a Block,
        block_subsidy: Amount,
        policies: Policies<'a>,
    ) -> BlockRewardAuditor<'a> {
        BlockRewardAuditor::new(&self.params, block, block_subsidy, policies)
    }

    /// Whether `block`, connected at `height`, pays out more than its wagers allow
    pub fn is_bet_payoff_exceeded(
        &self,
        height: Natural,
        block: &Block,
        chain: &dyn ChainView,
        policies: Policies<'_>,
    ) -> bool {
        self.block_auditor(block, chain.block_subsidy(height), policies)
            .is_bet_payoff_exceeded(height)
    }

    /// Structural check of a wager-placement transaction
    pub fn tx_make_bet_verify(
        &self,
        tx: &Transaction,
        height: Natural,
        reward: &dyn RewardPolicy,
        ignore_hardfork: bool,
    ) -> ValidationResult {
        MakeBetFormatValidator::new(reward, &self.params)
            .tx_make_bet_verify(tx, height, ignore_hardfork)
    }
}
