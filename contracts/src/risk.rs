//! Loan risk math.
//!
//! All ratios are integer percentages over `PRECISION`, computed with
//! multiply-before-divide and truncating division.

use odra::casper_types::U256;

/// Maximum loan-to-value for new borrowing (70%)
pub const MAX_LTV: u32 = 70;

/// Loan-to-value at which a loan becomes liquidatable (75%, inclusive)
pub const LIQUIDATION_THRESHOLD: u32 = 75;

/// Share of seized collateral kept by the protocol (10%)
pub const LIQUIDATION_PENALTY: u32 = 10;

/// Percentage scale
pub const PRECISION: u32 = 100;

/// Maximum debt supported by collateral worth `collateral_value` USD.
pub fn max_borrow_for_value(collateral_value: U256) -> U256 {
    collateral_value * U256::from(MAX_LTV) / U256::from(PRECISION)
}

/// Loan-to-value in percent.
///
/// Zero collateral yields 0. Collateral that prices to zero USD yields
/// `U256::MAX` while debt is outstanding.
pub fn loan_to_value_for(collateral: U256, collateral_value: U256, borrowed: U256) -> U256 {
    ratio_percent(collateral, collateral_value, borrowed)
}

/// Whether `ltv` has reached the liquidation threshold.
pub fn is_liquidatable_ltv(ltv: U256) -> bool {
    ltv >= U256::from(LIQUIDATION_THRESHOLD)
}

/// Split seized collateral into `(liquidator_payout, protocol_penalty)`.
pub fn liquidation_split(collateral: U256) -> (U256, U256) {
    let payout = collateral * U256::from(PRECISION - LIQUIDATION_PENALTY) / U256::from(PRECISION);
    (payout, collateral - payout)
}

/// Protocol utilization in percent, same edge rules as `loan_to_value_for`.
pub fn utilization_for(total_collateral: U256, collateral_value: U256, total_borrowed: U256) -> U256 {
    ratio_percent(total_collateral, collateral_value, total_borrowed)
}

fn ratio_percent(collateral: U256, collateral_value: U256, borrowed: U256) -> U256 {
    if collateral.is_zero() {
        return U256::zero();
    }
    if collateral_value.is_zero() {
        return if borrowed.is_zero() { U256::zero() } else { U256::MAX };
    }
    borrowed * U256::from(PRECISION) / collateral_value
}
