//! BTC Lending Contracts
//!
//! Collateralized lending protocol: native-asset collateral, stable-value debt.
//!
//! ## Architecture
//!
//! - **LoanLedger**: Per-account loans, protocol totals, deposit/borrow/repay/withdraw/liquidate
//! - **PriceGateway**: Validated oracle reads and collateral valuation (embedded in the ledger)
//! - **ManualPriceFeed**: Owner-pushed round-based price feed
//! - **StableToken**: CEP-18 borrowed asset
//!
//! ## Risk Parameters
//!
//! - Borrowing capped at 70% loan-to-value
//! - Liquidatable at 75% loan-to-value (inclusive)
//! - 10% of seized collateral retained as liquidation penalty
//! - Prices older than one hour are rejected

#![cfg_attr(target_arch = "wasm32", no_std)]

#[cfg(target_arch = "wasm32")]
extern crate alloc;

// Re-export odra for downstream usage
pub use odra;

// Core module declarations
pub mod types;
pub mod errors;
pub mod risk;
pub mod price_feed;
pub mod price_gateway;

// Contract modules
pub mod stable_token;
pub mod loan_ledger;
