//! Protocol error definitions.

use odra::prelude::*;

/// Lending protocol errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LendingError {
    // Oracle errors (1xx)
    InvalidPriceData = 100,
    PriceDataStale = 101,
    OracleNotConfigured = 102,

    // Loan precondition errors (2xx)
    MustDepositCollateral = 200,
    NoCollateralDeposited = 201,
    ExceedsBorrowingLimit = 202,
    NoActiveLoan = 203,
    AmountExceedsDebt = 204,
    InsufficientCollateral = 205,
    OutstandingDebtExists = 206,
    LoanNotLiquidatable = 207,
    ZeroAmount = 208,

    // Collaborator errors (3xx)
    TransferFailed = 300,
    DebtTransferFailed = 301,

    // Access control and guard errors (4xx)
    ReentrantCall = 400,
    Unauthorized = 401,
    NothingToSweep = 402,

    // Token errors (5xx)
    InsufficientBalance = 500,
    InsufficientAllowance = 501,
}

impl LendingError {
    pub const fn message(&self) -> &'static str {
        match self {
            // Oracle
            LendingError::InvalidPriceData => "Oracle returned a non-positive price",
            LendingError::PriceDataStale => "Oracle price data is stale",
            LendingError::OracleNotConfigured => "Price oracle not configured",

            // Loan
            LendingError::MustDepositCollateral => "Must deposit a non-zero collateral amount",
            LendingError::NoCollateralDeposited => "No collateral deposited",
            LendingError::ExceedsBorrowingLimit => "Borrow exceeds maximum loan-to-value",
            LendingError::NoActiveLoan => "No active loan",
            LendingError::AmountExceedsDebt => "Repay amount exceeds outstanding debt",
            LendingError::InsufficientCollateral => "Insufficient collateral",
            LendingError::OutstandingDebtExists => "Outstanding debt must be repaid first",
            LendingError::LoanNotLiquidatable => "Loan is not liquidatable",
            LendingError::ZeroAmount => "Amount must be greater than zero",

            // Collaborators
            LendingError::TransferFailed => "Token transfer failed",
            LendingError::DebtTransferFailed => "Debt transfer from liquidator failed",

            // Access control
            LendingError::ReentrantCall => "Reentrant call rejected",
            LendingError::Unauthorized => "Unauthorized: caller is not owner",
            LendingError::NothingToSweep => "No protocol fees to sweep",

            // Token
            LendingError::InsufficientBalance => "Insufficient token balance",
            LendingError::InsufficientAllowance => "Insufficient token allowance",
        }
    }
}

impl core::fmt::Display for LendingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<LendingError> for OdraError {
    fn from(error: LendingError) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            OdraError::user(error as u16)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            OdraError::user(error as u16, error.message())
        }
    }
}
