//! Round-based price feed.
//!
//! `PriceFeed` is the interface the price gateway reads. `ManualPriceFeed`
//! implements it with owner-pushed rounds, for test networks and local runs.

use odra::prelude::*;
use crate::types::RoundData;
use crate::errors::LendingError;

/// Round-based price feed interface for cross-contract calls
#[odra::external_contract]
pub trait PriceFeed {
    /// Latest round reported by the feed
    fn latest_round_data(&self) -> RoundData;
    /// Decimal places of `RoundData::answer`
    fn decimals(&self) -> u8;
}

/// Emitted when a new answer is pushed
#[odra::event]
pub struct AnswerUpdated {
    pub round_id: u64,
    pub answer: i64,
    pub updated_at: u64,
}

/// Owner-pushed price feed
#[odra::module(events = [AnswerUpdated])]
pub struct ManualPriceFeed {
    /// Address allowed to push answers
    owner: Var<Address>,
    /// Answer decimals
    decimals: Var<u8>,
    /// Latest round
    latest_round: Var<RoundData>,
}

#[odra::module]
impl ManualPriceFeed {
    /// Initialize the feed with a first round stamped at the current block time (seconds)
    pub fn init(&mut self, decimals: u8, initial_answer: i64) {
        self.owner.set(self.env().caller());
        self.decimals.set(decimals);
        let now = self.env().get_block_time_secs();
        self.push_round(initial_answer, now);
    }

    /// Get the latest round
    pub fn latest_round_data(&self) -> RoundData {
        self.latest_round.get().unwrap_or(RoundData {
            round_id: 0,
            answer: 0,
            started_at: 0,
            updated_at: 0,
            answered_in_round: 0,
        })
    }

    /// Get answer decimals
    pub fn decimals(&self) -> u8 {
        self.decimals.get().unwrap_or(8)
    }

    /// Push a new answer stamped with the current block time (owner only)
    pub fn update_answer(&mut self, answer: i64) {
        self.require_owner();
        let now = self.env().get_block_time_secs();
        self.push_round(answer, now);
    }

    /// Push a new answer with an explicit update time in seconds (owner only)
    pub fn set_round_data(&mut self, answer: i64, updated_at: u64) {
        self.require_owner();
        self.push_round(answer, updated_at);
    }

    /// Get the feed owner
    pub fn get_owner(&self) -> Option<Address> {
        self.owner.get()
    }

    // ========== Internal Functions ==========

    fn push_round(&mut self, answer: i64, updated_at: u64) {
        let round_id = self.latest_round.get().map(|r| r.round_id).unwrap_or(0) + 1;
        self.latest_round.set(RoundData {
            round_id,
            answer,
            started_at: updated_at,
            updated_at,
            answered_in_round: round_id,
        });
        self.env().emit_event(AnswerUpdated {
            round_id,
            answer,
            updated_at,
        });
    }

    fn require_owner(&self) {
        let caller = self.env().caller();
        match self.owner.get() {
            Some(owner) if caller == owner => {}
            _ => self.env().revert(LendingError::Unauthorized),
        }
    }
}
