//! FundMe Contract Logic & Local Chain
//!
//! This crate implements the custody contract that accepts native-currency
//! contributions worth at least 50 USD and lets its owner withdraw the pot,
//! plus the minimal chain runtime it is deployed to during development.
//!
//! # Modules
//! - `errors`: Contract and chain error types
//! - `events`: Contract events (`Funded`, `Withdrawn`)
//! - `security`: Ownership / access control
//! - `price_feed`: Aggregator interface and `MockV3Aggregator`
//! - `ledger`: Funder list + per-funder totals
//! - `fund_me`: The custody contract
//! - `chain`: `LocalChain`, accounts, gas and blocks
//!
//! # Version
//! v0.1.0

pub mod chain;
pub mod errors;
pub mod events;
pub mod fund_me;
pub mod ledger;
pub mod price_feed;
pub mod security;

pub use chain::{LocalChain, Receipt, TxKind};
pub use errors::{ChainError, FundMeError, PriceFeedError, TransferError};
pub use events::ContractEvent;
pub use fund_me::{CallContext, FundMe, ValueTransfer};
pub use price_feed::{AggregatorV3Interface, MockV3Aggregator, PriceFeedDirectory};

/// Contract ABI version: frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
