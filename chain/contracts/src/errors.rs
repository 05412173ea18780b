//! Contract-specific error types
//!
//! Error taxonomy for the custody contract, the price feed interface and the
//! development chain that hosts them.

use alloy_primitives::{Address, U256};
use thiserror::Error;
use types::errors::ConversionError;

/// Errors raised by the `FundMe` custody contract
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FundMeError {
    #[error("Insufficient value: worth {usd_value} USD (18 decimals), minimum is {minimum}")]
    InsufficientValue { usd_value: U256, minimum: U256 },

    #[error("Unauthorized: {caller} is not the owner")]
    NotOwner { caller: Address },

    #[error("Transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    #[error("Funder index {index} out of range (funders: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Price feed error: {0}")]
    PriceFeed(#[from] PriceFeedError),

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// Errors raised while reading a price source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PriceFeedError {
    #[error("No price feed deployed at {address}")]
    NotFound { address: Address },

    #[error("No data present for round {round_id}")]
    NoDataPresent { round_id: u64 },

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),
}

/// Errors raised when moving native currency
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("Recipient {to} rejected {amount} wei")]
    Rejected { to: Address, amount: U256 },

    #[error("Recipient balance overflow")]
    Overflow,
}

/// Errors raised by the development chain
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    #[error("No FundMe contract at {address}")]
    UnknownContract { address: Address },

    #[error("Insufficient funds for {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: Address,
        required: U256,
        available: U256,
    },

    #[error("Execution reverted: {0}")]
    Reverted(#[from] FundMeError),

    #[error("Price feed error: {0}")]
    PriceFeed(#[from] PriceFeedError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("Chain has no dev accounts")]
    NoDevAccounts,
}
