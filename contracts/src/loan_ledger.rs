//! Loan Ledger Contract
//!
//! Native-asset collateralized lending against a stable-value token.
//! Each account holds at most one loan; collateral is posted through a
//! payable entry point and debt is drawn from the ledger's token liquidity.
//!
//! Operation flow:
//! 1. Take the reentrancy lock
//! 2. Check preconditions, pricing collateral through the Price Gateway
//! 3. Pull incoming funds before touching state (repay, liquidate)
//! 4. Update the loan and the protocol totals together
//! 5. Send outgoing funds after state is settled (borrow, withdraw, liquidate)
//! 6. Emit the operation event and release the lock
//!
//! Any failure reverts the whole call, lock and storage writes included.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::LendingError;
use crate::price_gateway::{PriceGateway, convert_to_usd, STALENESS_LIMIT};
use crate::risk::{
    self, LIQUIDATION_PENALTY, LIQUIDATION_THRESHOLD, MAX_LTV, PRECISION,
};
use crate::stable_token::Cep18TokenContractRef;
use odra::ContractRef;
use crate::types::{
    u256_to_u512, u512_to_u256, LiquidationStats, Loan, ProtocolStats, RiskParameters,
};

// ========== Events ==========

#[odra::event]
pub struct CollateralDeposited {
    pub account: Address,
    pub amount: U256,
    pub collateral_balance: U256,
}

#[odra::event]
pub struct Borrowed {
    pub account: Address,
    pub amount: U256,
    pub total_debt: U256,
}

#[odra::event]
pub struct Repaid {
    pub account: Address,
    pub amount: U256,
    pub remaining_debt: U256,
}

#[odra::event]
pub struct CollateralWithdrawn {
    pub account: Address,
    pub amount: U256,
    pub remaining_collateral: U256,
}

#[odra::event]
pub struct LoanLiquidated {
    pub account: Address,
    pub liquidator: Address,
    pub collateral_seized: U256,
    pub debt_repaid: U256,
    pub liquidator_payout: U256,
}

#[odra::event]
pub struct PriceOracleUpdated {
    pub previous_oracle: Option<Address>,
    pub new_oracle: Address,
}

#[odra::event]
pub struct ProtocolFeesSwept {
    pub recipient: Address,
    pub amount: U256,
}

#[odra::event]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}

/// Loan Ledger
#[odra::module(events = [
    CollateralDeposited,
    Borrowed,
    Repaid,
    CollateralWithdrawn,
    LoanLiquidated,
    PriceOracleUpdated,
    ProtocolFeesSwept,
    OwnershipTransferred
])]
pub struct LoanLedger {
    /// Protocol owner
    owner: Var<Address>,
    /// Collateral pricing
    price_gateway: SubModule<PriceGateway>,
    /// Borrowed-asset token (CEP-18)
    borrowed_token: Var<Address>,
    /// Loan per account
    loans: Mapping<Address, Loan>,
    /// Sum of all posted collateral
    total_collateral: Var<U256>,
    /// Sum of all outstanding debt
    total_borrowed: Var<U256>,
    /// Reentrancy lock
    locked: Var<bool>,
    /// Cumulative liquidation counters
    liquidation_stats: Var<LiquidationStats>,
}

#[odra::module]
impl LoanLedger {
    /// Initialize the ledger; the deployer becomes the owner
    pub fn init(&mut self, price_oracle: Address, borrowed_token: Address) {
        self.owner.set(self.env().caller());
        self.price_gateway.set_oracle(price_oracle);
        self.borrowed_token.set(borrowed_token);
        self.total_collateral.set(U256::zero());
        self.total_borrowed.set(U256::zero());
        self.locked.set(false);
        self.liquidation_stats.set(LiquidationStats::default());
    }

    // ========== Loan Operations ==========

    /// Post the attached native value as collateral
    #[odra(payable)]
    pub fn deposit_collateral(&mut self) {
        self.lock();
        let amount = u512_to_u256(self.env().attached_value());
        let result = self.execute_deposit(amount);
        self.unwrap_or_revert(result);
        self.unlock();
    }

    /// Borrow against posted collateral, up to `MAX_LTV`
    pub fn borrow(&mut self, amount: U256) {
        self.lock();
        let result = self.execute_borrow(amount);
        self.unwrap_or_revert(result);
        self.unlock();
    }

    /// Repay part or all of the outstanding debt (requires token approval)
    pub fn repay(&mut self, amount: U256) {
        self.lock();
        let result = self.execute_repay(amount);
        self.unwrap_or_revert(result);
        self.unlock();
    }

    /// Withdraw collateral from a loan with no outstanding debt
    pub fn withdraw_collateral(&mut self, amount: U256) {
        self.lock();
        let result = self.execute_withdraw(amount);
        self.unwrap_or_revert(result);
        self.unlock();
    }

    /// Close an undercollateralized loan by repaying its full debt
    /// (requires token approval); the caller receives the collateral
    /// minus `LIQUIDATION_PENALTY` percent
    pub fn liquidate(&mut self, account: Address) {
        self.lock();
        let result = self.execute_liquidation(account);
        self.unwrap_or_revert(result);
        self.unlock();
    }

    // ========== Admin Functions ==========

    /// Point the Price Gateway at a new oracle (owner only)
    pub fn set_price_oracle(&mut self, oracle: Address) {
        self.require_owner();
        self.lock();
        let previous_oracle = self.price_gateway.get_oracle();
        self.price_gateway.set_oracle(oracle);
        self.env().emit_event(PriceOracleUpdated {
            previous_oracle,
            new_oracle: oracle,
        });
        self.unlock();
    }

    /// Send retained liquidation penalties to the owner (owner only).
    /// Posted collateral is never swept.
    pub fn sweep_protocol_fees(&mut self) {
        self.require_owner();
        self.lock();
        let fees = self.get_protocol_fees();
        if fees.is_zero() {
            self.env().revert(LendingError::NothingToSweep);
        }
        let recipient = self.env().caller();
        self.env().transfer_tokens(&recipient, &u256_to_u512(fees));
        self.env().emit_event(ProtocolFeesSwept { recipient, amount: fees });
        self.unlock();
    }

    /// Hand the owner role to another address (owner only)
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.require_owner();
        self.lock();
        let previous_owner = self.env().caller();
        self.owner.set(new_owner);
        self.env().emit_event(OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        self.unlock();
    }

    // ========== View Functions ==========

    /// Get the loan of `account` (all-zero if none was ever opened)
    pub fn get_loan(&self, account: Address) -> Loan {
        self.loans.get(&account).unwrap_or_default()
    }

    pub fn get_total_collateral(&self) -> U256 {
        self.total_collateral.get().unwrap_or(U256::zero())
    }

    pub fn get_total_borrowed(&self) -> U256 {
        self.total_borrowed.get().unwrap_or(U256::zero())
    }

    pub fn get_owner(&self) -> Option<Address> {
        self.owner.get()
    }

    pub fn get_borrowed_token(&self) -> Option<Address> {
        self.borrowed_token.get()
    }

    pub fn get_price_oracle(&self) -> Option<Address> {
        self.price_gateway.get_oracle()
    }

    /// Native balance held above posted collateral
    pub fn get_protocol_fees(&self) -> U256 {
        let balance = u512_to_u256(self.env().self_balance());
        balance.saturating_sub(self.get_total_collateral())
    }

    /// Latest validated `(price, decimals)`
    pub fn get_latest_price(&self) -> (U256, u8) {
        self.price_gateway.get_latest_price()
    }

    /// Value of `btc_amount` collateral in borrowed-asset units
    pub fn btc_to_usd(&self, btc_amount: U256) -> U256 {
        self.price_gateway.btc_to_usd(btc_amount)
    }

    /// Value of the collateral posted by `account`
    pub fn collateral_value_usd(&self, account: Address) -> U256 {
        let loan = self.get_loan(account);
        self.price_gateway.btc_to_usd(loan.collateral_amount)
    }

    /// Maximum debt `collateral` can support
    pub fn max_borrow(&self, collateral: U256) -> U256 {
        risk::max_borrow_for_value(self.price_gateway.btc_to_usd(collateral))
    }

    /// Debt `account` can still draw at the current price
    pub fn available_to_borrow(&self, account: Address) -> U256 {
        let loan = self.get_loan(account);
        self.max_borrow(loan.collateral_amount)
            .saturating_sub(loan.borrowed_amount)
    }

    /// Loan-to-value of `account` in percent (0 without collateral)
    pub fn loan_to_value(&self, account: Address) -> U256 {
        let loan = self.get_loan(account);
        let result = self.ltv_of(&loan);
        self.unwrap_or_revert(result)
    }

    /// Whether `account` has reached `LIQUIDATION_THRESHOLD`
    pub fn is_liquidatable(&self, account: Address) -> bool {
        risk::is_liquidatable_ltv(self.loan_to_value(account))
    }

    /// Protocol totals with current price and utilization
    pub fn protocol_stats(&self) -> ProtocolStats {
        let quote = self.unwrap_or_revert(self.price_gateway.quote());
        let total_collateral = self.get_total_collateral();
        let total_borrowed = self.get_total_borrowed();
        let collateral_value = convert_to_usd(total_collateral, &quote);

        ProtocolStats {
            total_collateral,
            total_borrowed,
            current_price: quote.price,
            price_decimals: quote.decimals,
            utilization: risk::utilization_for(total_collateral, collateral_value, total_borrowed),
        }
    }

    pub fn liquidation_stats(&self) -> LiquidationStats {
        self.liquidation_stats.get().unwrap_or_default()
    }

    pub fn get_risk_parameters(&self) -> RiskParameters {
        RiskParameters {
            max_ltv: MAX_LTV,
            liquidation_threshold: LIQUIDATION_THRESHOLD,
            liquidation_penalty: LIQUIDATION_PENALTY,
            precision: PRECISION,
            staleness_limit: STALENESS_LIMIT,
        }
    }
}

impl LoanLedger {
    fn execute_deposit(&mut self, amount: U256) -> Result<(), LendingError> {
        if amount.is_zero() {
            return Err(LendingError::MustDepositCollateral);
        }
        let account = self.env().caller();
        let mut loan = self.get_loan(account);

        loan.collateral_amount += amount;
        self.loans.set(&account, loan.clone());
        self.total_collateral.set(self.get_total_collateral() + amount);

        self.env().emit_event(CollateralDeposited {
            account,
            amount,
            collateral_balance: loan.collateral_amount,
        });
        Ok(())
    }

    fn execute_borrow(&mut self, amount: U256) -> Result<(), LendingError> {
        if amount.is_zero() {
            return Err(LendingError::ZeroAmount);
        }
        let account = self.env().caller();
        let mut loan = self.get_loan(account);
        if loan.collateral_amount.is_zero() {
            return Err(LendingError::NoCollateralDeposited);
        }

        let quote = self.price_gateway.quote()?;
        let limit = risk::max_borrow_for_value(convert_to_usd(loan.collateral_amount, &quote));
        let new_debt = loan
            .borrowed_amount
            .checked_add(amount)
            .ok_or(LendingError::ExceedsBorrowingLimit)?;
        if new_debt > limit {
            return Err(LendingError::ExceedsBorrowingLimit);
        }

        if !loan.active {
            loan.active = true;
            loan.opened_at = self.env().get_block_time_secs();
        }
        loan.borrowed_amount = new_debt;
        self.loans.set(&account, loan);
        self.total_borrowed.set(self.get_total_borrowed() + amount);

        // Reverting on `false` discards the updates above
        if !self.token().transfer(account, amount) {
            return Err(LendingError::TransferFailed);
        }

        self.env().emit_event(Borrowed {
            account,
            amount,
            total_debt: new_debt,
        });
        Ok(())
    }

    fn execute_repay(&mut self, amount: U256) -> Result<(), LendingError> {
        if amount.is_zero() {
            return Err(LendingError::ZeroAmount);
        }
        let account = self.env().caller();
        let mut loan = self.get_loan(account);
        if !loan.active {
            return Err(LendingError::NoActiveLoan);
        }
        if amount > loan.borrowed_amount {
            return Err(LendingError::AmountExceedsDebt);
        }

        let ledger = self.env().self_address();
        if !self.token().transfer_from(account, ledger, amount) {
            return Err(LendingError::TransferFailed);
        }

        loan.borrowed_amount -= amount;
        if loan.borrowed_amount.is_zero() {
            loan.active = false;
        }
        let remaining_debt = loan.borrowed_amount;
        self.loans.set(&account, loan);
        self.total_borrowed.set(self.get_total_borrowed() - amount);

        self.env().emit_event(Repaid {
            account,
            amount,
            remaining_debt,
        });
        Ok(())
    }

    fn execute_withdraw(&mut self, amount: U256) -> Result<(), LendingError> {
        if amount.is_zero() {
            return Err(LendingError::ZeroAmount);
        }
        let account = self.env().caller();
        let mut loan = self.get_loan(account);
        if amount > loan.collateral_amount {
            return Err(LendingError::InsufficientCollateral);
        }
        if !loan.borrowed_amount.is_zero() {
            return Err(LendingError::OutstandingDebtExists);
        }

        loan.collateral_amount -= amount;
        let remaining_collateral = loan.collateral_amount;
        self.loans.set(&account, loan);
        self.total_collateral.set(self.get_total_collateral() - amount);

        self.env().transfer_tokens(&account, &u256_to_u512(amount));

        self.env().emit_event(CollateralWithdrawn {
            account,
            amount,
            remaining_collateral,
        });
        Ok(())
    }

    fn execute_liquidation(&mut self, account: Address) -> Result<(), LendingError> {
        let loan = self.get_loan(account);
        let ltv = self.ltv_of(&loan)?;
        if !risk::is_liquidatable_ltv(ltv) {
            return Err(LendingError::LoanNotLiquidatable);
        }

        let liquidator = self.env().caller();
        let debt = loan.borrowed_amount;
        let collateral = loan.collateral_amount;

        // 1. Pull the full debt from the liquidator
        let ledger = self.env().self_address();
        if !self.token().transfer_from(liquidator, ledger, debt) {
            return Err(LendingError::DebtTransferFailed);
        }

        // 2. Close the loan
        self.loans.set(&account, Loan::default());
        self.total_collateral.set(self.get_total_collateral() - collateral);
        self.total_borrowed.set(self.get_total_borrowed() - debt);

        let (payout, penalty) = risk::liquidation_split(collateral);
        let mut stats = self.liquidation_stats();
        stats.total_liquidations += 1;
        stats.total_debt_repaid += debt;
        stats.total_collateral_seized += collateral;
        stats.total_penalties += penalty;
        self.liquidation_stats.set(stats);

        // 3. Pay the liquidator; the penalty stays with the ledger
        if !payout.is_zero() {
            self.env().transfer_tokens(&liquidator, &u256_to_u512(payout));
        }

        self.env().emit_event(LoanLiquidated {
            account,
            liquidator,
            collateral_seized: collateral,
            debt_repaid: debt,
            liquidator_payout: payout,
        });
        Ok(())
    }

    /// LTV of `loan`; zero collateral short-circuits without a price read.
    fn ltv_of(&self, loan: &Loan) -> Result<U256, LendingError> {
        if loan.collateral_amount.is_zero() {
            return Ok(U256::zero());
        }
        let quote = self.price_gateway.quote()?;
        let value = convert_to_usd(loan.collateral_amount, &quote);
        Ok(risk::loan_to_value_for(loan.collateral_amount, value, loan.borrowed_amount))
    }

    fn token(&self) -> Cep18TokenContractRef {
        match self.borrowed_token.get() {
            Some(token) => Cep18TokenContractRef::new(self.env(), token),
            None => self.env().revert(LendingError::TransferFailed),
        }
    }

    fn lock(&mut self) {
        if self.locked.get().unwrap_or(false) {
            self.env().revert(LendingError::ReentrantCall);
        }
        self.locked.set(true);
    }

    fn unlock(&mut self) {
        self.locked.set(false);
    }

    fn unwrap_or_revert<T>(&self, result: Result<T, LendingError>) -> T {
        match result {
            Ok(value) => value,
            Err(error) => self.env().revert(error),
        }
    }

    fn require_owner(&self) {
        let caller = self.env().caller();
        match self.owner.get() {
            Some(owner) if caller == owner => {}
            _ => self.env().revert(LendingError::Unauthorized),
        }
    }
}
