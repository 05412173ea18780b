//! Contract events
//!
//! Events are immutable records appended by successful contract operations.
//! A reverted call never leaves an event behind.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A contribution was accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funded {
    pub funder: Address,
    pub amount: U256,
    /// Funder's cumulative contribution after this call
    pub total_funded: U256,
}

/// The owner drained the contract and reset the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub owner: Address,
    pub amount: U256,
    pub funders_cleared: usize,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    Funded(Funded),
    Withdrawn(Withdrawn),
}
