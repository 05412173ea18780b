//! Ownership primitive for contract modules
//!
//! The owner is fixed at construction. There is no transfer or renounce
//! operation.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::errors::FundMeError;

/// Immutable single-owner access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ownable {
    owner: Address,
}

impl Ownable {
    /// Bind `owner` permanently.
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    /// Get the owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Check if `caller` is the owner.
    pub fn is_owner(&self, caller: &Address) -> bool {
        self.owner == *caller
    }

    /// Fail with `NotOwner` unless `caller` is the owner.
    pub fn only_owner(&self, caller: &Address) -> Result<(), FundMeError> {
        if !self.is_owner(caller) {
            return Err(FundMeError::NotOwner { caller: *caller });
        }
        Ok(())
    }
}
