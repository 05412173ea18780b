//! Deployment error types

use fundme_contracts::errors::ChainError;
use thiserror::Error;
use types::errors::UnitError;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Network '{name}' is not classified (expected one of: {known})")]
    UnclassifiedNetwork { name: String, known: String },

    #[error("No price feed address configured for network '{network}'")]
    UnresolvedPriceFeed { network: String },

    #[error("No deployment of {name} recorded for network '{network}'")]
    MissingDeployment { name: String, network: String },

    #[error("Dev account index {index} out of range ({available} available)")]
    UnknownAccount { index: usize, available: usize },

    #[error("Invalid amount: {0}")]
    Amount(#[from] UnitError),

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
