//! Amount arithmetic and the default subsidy schedule

use crate::constants::*;
use crate::error::{ConsensusError, Result};
use crate::types::*;

/// GetBlockSubsidy: ℕ → ℤ
///
/// Default halving schedule; ledgers with their own schedule override
/// [`crate::chain::ChainView::block_subsidy`].
pub fn get_block_subsidy(height: Natural) -> Amount {
    let halving_period = height / HALVING_INTERVAL;

    // After 64 halvings, subsidy becomes 0
    if halving_period >= 64 {
        return 0;
    }

    INITIAL_SUBSIDY >> halving_period
}

/// Amount lies in `0..=MAX_MONEY`
pub fn money_range(amount: Amount) -> bool {
    (0..=MAX_MONEY).contains(&amount)
}

/// `multiplier * amount`, rejecting overflow and out-of-range results
pub fn checked_payout(multiplier: u32, amount: Amount) -> Result<Amount> {
    if !money_range(amount) {
        return Err(ConsensusError::EconomicValidation(format!(
            "amount {} outside money range",
            amount
        )));
    }
    Amount::from(multiplier).checked_mul(amount).ok_or_else(|| {
        ConsensusError::EconomicValidation(format!("payout {} x {} overflows", multiplier, amount))
    })
}

/// Add two accumulated amounts, rejecting overflow
pub fn checked_add(acc: Amount, amount: Amount) -> Result<Amount> {
    acc.checked_add(amount).ok_or_else(|| {
        ConsensusError::EconomicValidation("amount accumulator overflows".to_string())
    })
}

/// Settlement fee: what the reward covers beyond the declared outputs
pub fn calculate_fee(total_reward: Amount, declared_out: Amount) -> Result<Amount> {
    match total_reward.checked_sub(declared_out) {
        Some(fee) if fee >= 0 => Ok(fee),
        _ => Err(ConsensusError::EconomicValidation("Negative fee".to_string())),
    }
}

/// Saturating `multiplier * amount` for audits where overflow can only mean "too much"
pub fn saturating_payout(multiplier: u32, amount: Amount) -> Amount {
    Amount::from(multiplier).saturating_mul(amount.max(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_block_subsidy_genesis() {
        assert_eq!(get_block_subsidy(0), INITIAL_SUBSIDY);
    }

    #[test]
    fn test_get_block_subsidy_halvings() {
        assert_eq!(get_block_subsidy(HALVING_INTERVAL - 1), INITIAL_SUBSIDY);
        assert_eq!(get_block_subsidy(HALVING_INTERVAL), INITIAL_SUBSIDY / 2);
        assert_eq!(get_block_subsidy(HALVING_INTERVAL * 2), INITIAL_SUBSIDY / 4);
        assert_eq!(get_block_subsidy(HALVING_INTERVAL * 64), 0);
    }

    #[test]
    fn test_checked_payout() {
        assert_eq!(checked_payout(36, 100).unwrap(), 3600);
        assert_eq!(checked_payout(0, 100).unwrap(), 0);
        assert!(checked_payout(2, -1).is_err());
        assert!(checked_payout(2, MAX_MONEY + 1).is_err());
    }

    #[test]
    fn test_checked_payout_overflow() {
        // u32::MAX * MAX_MONEY does not fit in i64
        assert!(checked_payout(u32::MAX, MAX_MONEY).is_err());
    }

    #[test]
    fn test_calculate_fee() {
        assert_eq!(calculate_fee(3600, 3500).unwrap(), 100);
        assert_eq!(calculate_fee(3600, 3600).unwrap(), 0);
        assert!(calculate_fee(3600, 3601).is_err());
    }

    #[test]
    fn test_saturating_payout() {
        assert_eq!(saturating_payout(u32::MAX, i64::MAX), i64::MAX);
        assert_eq!(saturating_payout(3, -5), 0);
        assert_eq!(saturating_payout(3, 700), 2100);
    }

    #[test]
    fn test_money_range() {
        assert!(money_range(0));
        assert!(money_range(MAX_MONEY));
        assert!(!money_range(-1));
    }
}
