//! Funder ledger: ordered funder list plus per-funder totals
//!
//! The list gives first-contribution order for enumeration and clearing; the
//! map gives O(1) lookup. Both are private and only `record` and `clear`
//! mutate them, so they cannot drift apart.
//!
//! Invariants:
//! - every funder in the list has a strictly positive total in the map
//! - the list has no duplicates
//! - the map has no keys outside the list

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::FundMeError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunderLedger {
    funders: Vec<Address>,
    amounts: HashMap<Address, U256>,
}

impl FunderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `funder`'s total, appending them to the list if they
    /// have no current entry. Returns the new total.
    ///
    /// A zero amount is a no-op so the positivity invariant holds.
    pub fn record(&mut self, funder: Address, amount: U256) -> Result<U256, FundMeError> {
        let current = self.amount_funded(&funder);
        if amount.is_zero() {
            return Ok(current);
        }

        let total = current.checked_add(amount).ok_or(FundMeError::Overflow)?;
        if current.is_zero() {
            self.funders.push(funder);
        }
        self.amounts.insert(funder, total);
        Ok(total)
    }

    /// Remove every funder's entry, then empty the list. Returns how many
    /// funders were cleared.
    pub fn clear(&mut self) -> usize {
        for funder in &self.funders {
            self.amounts.remove(funder);
        }
        let cleared = self.funders.len();
        self.funders.clear();
        cleared
    }

    /// Cumulative contribution of `funder`; zero if unknown.
    pub fn amount_funded(&self, funder: &Address) -> U256 {
        self.amounts.get(funder).copied().unwrap_or(U256::ZERO)
    }

    /// Funder at list position `index`.
    pub fn funder(&self, index: usize) -> Result<Address, FundMeError> {
        self.funders
            .get(index)
            .copied()
            .ok_or(FundMeError::IndexOutOfRange {
                index,
                len: self.funders.len(),
            })
    }

    pub fn funders(&self) -> &[Address] {
        &self.funders
    }

    pub fn len(&self) -> usize {
        self.funders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funders.is_empty()
    }

    /// Sum of all totals. `None` only if the sum exceeds `U256::MAX`.
    pub fn total(&self) -> Option<U256> {
        self.funders
            .iter()
            .try_fold(U256::ZERO, |acc, funder| acc.checked_add(self.amount_funded(funder)))
    }
}
