//! Common types used across the lending protocol.

use odra::casper_types::{U256, U512};

/// Per-account loan record.
///
/// `active` mirrors `borrowed_amount > 0` after every ledger operation.
#[odra::odra_type]
#[derive(Default)]
pub struct Loan {
    /// Posted collateral (smallest native unit)
    pub collateral_amount: U256,
    /// Outstanding debt (smallest borrowed-asset unit)
    pub borrowed_amount: U256,
    /// Block time (seconds) of the first borrow against zero debt
    pub opened_at: u64,
    /// Whether the loan carries debt
    pub active: bool,
}

/// Round data as reported by a round-based price feed.
#[odra::odra_type]
#[derive(Copy)]
pub struct RoundData {
    /// Round identifier
    pub round_id: u64,
    /// Reported price (signed, feed decimals)
    pub answer: i64,
    /// Block time the round started
    pub started_at: u64,
    /// Block time the answer was last updated
    pub updated_at: u64,
    /// Round in which the answer was computed
    pub answered_in_round: u64,
}

/// Validated price read from the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuote {
    /// Strictly positive price
    pub price: U256,
    /// Decimal places of `price`
    pub decimals: u8,
}

/// Protocol-wide aggregate view
#[odra::odra_type]
pub struct ProtocolStats {
    /// Sum of all posted collateral
    pub total_collateral: U256,
    /// Sum of all outstanding debt
    pub total_borrowed: U256,
    /// Current validated collateral price
    pub current_price: U256,
    /// Decimal places of `current_price`
    pub price_decimals: u8,
    /// Borrowed value over collateral value, in percent
    pub utilization: U256,
}

/// Cumulative liquidation counters
#[odra::odra_type]
#[derive(Default)]
pub struct LiquidationStats {
    /// Number of liquidations processed
    pub total_liquidations: u64,
    /// Debt repaid by liquidators
    pub total_debt_repaid: U256,
    /// Collateral taken from liquidated loans
    pub total_collateral_seized: U256,
    /// Collateral retained by the protocol as penalty
    pub total_penalties: U256,
}

/// Fixed risk parameters (percentages over `precision`)
#[odra::odra_type]
pub struct RiskParameters {
    pub max_ltv: u32,
    pub liquidation_threshold: u32,
    pub liquidation_penalty: u32,
    pub precision: u32,
    pub staleness_limit: u64,
}

// ===== Helper Functions =====

/// Convert U512 to U256 (native amounts fit in the lower 256 bits)
pub(crate) fn u512_to_u256(value: U512) -> U256 {
    let mut bytes = [0u8; 64];
    value.to_little_endian(&mut bytes);
    U256::from_little_endian(&bytes[..32])
}

/// Convert U256 to U512
pub(crate) fn u256_to_u512(value: U256) -> U512 {
    let mut bytes = [0u8; 32];
    value.to_little_endian(&mut bytes);
    U512::from_little_endian(&bytes)
}
