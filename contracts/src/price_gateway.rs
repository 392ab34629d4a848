//! Price Gateway
//!
//! Single point of external price ingestion for the ledger:
//! - Reads the latest round from a `PriceFeed` oracle
//! - Rejects non-positive answers (`InvalidPriceData`)
//! - Rejects answers at or beyond `STALENESS_LIMIT` (`PriceDataStale`)
//! - Converts collateral amounts to USD with truncating integer math
//!
//! Prices are read fresh on every call; nothing is cached.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use crate::errors::LendingError;
use crate::price_feed::PriceFeedContractRef;
use crate::types::{PriceQuote, RoundData};

/// Maximum price age in seconds before the answer is rejected (1 hour)
pub const STALENESS_LIMIT: u64 = 3600;

/// Anything that can report a price round and its decimals.
pub trait PriceSource {
    fn round_data(&self) -> RoundData;
    fn feed_decimals(&self) -> u8;
}

impl PriceSource for PriceFeedContractRef {
    fn round_data(&self) -> RoundData {
        self.latest_round_data()
    }

    fn feed_decimals(&self) -> u8 {
        self.decimals()
    }
}

/// Read and validate the latest price from `source` as of `now` (seconds).
pub fn read_price<S: PriceSource>(source: &S, now: u64) -> Result<PriceQuote, LendingError> {
    let round = source.round_data();
    if round.answer <= 0 {
        return Err(LendingError::InvalidPriceData);
    }
    // Future timestamps count as age zero
    if now.saturating_sub(round.updated_at) >= STALENESS_LIMIT {
        return Err(LendingError::PriceDataStale);
    }
    Ok(PriceQuote {
        price: U256::from(round.answer as u64),
        decimals: source.feed_decimals(),
    })
}

/// `amount * price / 10^decimals`, truncated.
pub fn convert_to_usd(amount: U256, quote: &PriceQuote) -> U256 {
    if amount.is_zero() {
        return U256::zero();
    }
    amount * quote.price / U256::from(10u64).pow(U256::from(quote.decimals))
}

/// Price Gateway module (embedded in the ledger)
#[odra::module]
pub struct PriceGateway {
    /// External round-based oracle
    oracle: Var<Address>,
}

#[odra::module]
impl PriceGateway {
    /// Point the gateway at a new oracle
    pub fn set_oracle(&mut self, oracle: Address) {
        self.oracle.set(oracle);
    }

    /// Get the oracle address
    pub fn get_oracle(&self) -> Option<Address> {
        self.oracle.get()
    }

    /// Get the latest validated `(price, decimals)`
    pub fn get_latest_price(&self) -> (U256, u8) {
        let quote = self.revert_on_err(self.quote());
        (quote.price, quote.decimals)
    }

    /// Convert a collateral amount to USD at the latest validated price
    pub fn btc_to_usd(&self, btc_amount: U256) -> U256 {
        let quote = self.revert_on_err(self.quote());
        convert_to_usd(btc_amount, &quote)
    }
}

impl PriceGateway {
    /// Latest validated quote, read from the configured oracle.
    pub fn quote(&self) -> Result<PriceQuote, LendingError> {
        let oracle = self.oracle.get().ok_or(LendingError::OracleNotConfigured)?;
        let feed = PriceFeedContractRef::new(self.env(), oracle);
        read_price(&feed, self.env().get_block_time_secs())
    }

    fn revert_on_err<T>(&self, result: Result<T, LendingError>) -> T {
        match result {
            Ok(value) => value,
            Err(error) => self.env().revert(error),
        }
    }
}
