//! Price reference interface and its local stand-in
//!
//! `AggregatorV3Interface` mirrors the read surface of a Chainlink-style
//! aggregator. `MockV3Aggregator` is deployed on local networks where no real
//! feed exists; it reports whatever answer it was constructed or updated with.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::errors::PriceFeedError;

/// One reporting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundData {
    pub round_id: u64,
    pub answer: i128,
    pub started_at: i64,
    pub updated_at: i64,
    pub answered_in_round: u64,
}

/// Read-only price source.
pub trait AggregatorV3Interface {
    /// Decimal places of `answer`.
    fn decimals(&self) -> u8;

    fn description(&self) -> &str;

    fn version(&self) -> u64;

    fn get_round_data(&self, round_id: u64) -> Result<RoundData, PriceFeedError>;

    fn latest_round_data(&self) -> Result<RoundData, PriceFeedError>;
}

/// Resolves a bound price-reference address to a readable source.
pub trait PriceFeedDirectory {
    fn price_feed(&self, address: &Address) -> Option<&dyn AggregatorV3Interface>;
}

impl<A: AggregatorV3Interface> PriceFeedDirectory for HashMap<Address, A> {
    fn price_feed(&self, address: &Address) -> Option<&dyn AggregatorV3Interface> {
        self.get(address).map(|feed| feed as &dyn AggregatorV3Interface)
    }
}

/// Simulated aggregator for local networks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockV3Aggregator {
    decimals: u8,
    latest_round: u64,
    rounds: BTreeMap<u64, RoundData>,
}

impl MockV3Aggregator {
    pub const VERSION: u64 = 0;
    pub const DESCRIPTION: &'static str = "v0.8/tests/MockV3Aggregator.sol";

    /// Create a mock reporting `initial_answer` (scaled by `decimals`) as round 1.
    pub fn new(decimals: u8, initial_answer: i128, timestamp: i64) -> Self {
        let mut mock = Self {
            decimals,
            latest_round: 0,
            rounds: BTreeMap::new(),
        };
        mock.update_answer(initial_answer, timestamp);
        mock
    }

    /// Report a new answer as the next round.
    pub fn update_answer(&mut self, answer: i128, timestamp: i64) {
        let round_id = self.latest_round + 1;
        self.update_round_data(round_id, answer, timestamp, timestamp);
    }

    /// Overwrite a round and make it the latest.
    pub fn update_round_data(
        &mut self,
        round_id: u64,
        answer: i128,
        timestamp: i64,
        started_at: i64,
    ) {
        self.latest_round = round_id;
        self.rounds.insert(
            round_id,
            RoundData {
                round_id,
                answer,
                started_at,
                updated_at: timestamp,
                answered_in_round: round_id,
            },
        );
    }

    /// Answer of the latest round.
    pub fn latest_answer(&self) -> i128 {
        self.rounds
            .get(&self.latest_round)
            .map(|round| round.answer)
            .unwrap_or_default()
    }

    pub fn latest_round(&self) -> u64 {
        self.latest_round
    }
}

impl AggregatorV3Interface for MockV3Aggregator {
    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn version(&self) -> u64 {
        Self::VERSION
    }

    fn get_round_data(&self, round_id: u64) -> Result<RoundData, PriceFeedError> {
        self.rounds
            .get(&round_id)
            .copied()
            .ok_or(PriceFeedError::NoDataPresent { round_id })
    }

    fn latest_round_data(&self) -> Result<RoundData, PriceFeedError> {
        self.get_round_data(self.latest_round)
    }
}
