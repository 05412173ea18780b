//! FundMe deployment tooling
//!
//! Resolves the target network, runs the deployment pipeline against the
//! in-process chain, and operates the deployed contract.
//!
//! # Modules
//! - `network`: Network name → profile (classification, price feed, confirmations)
//! - `pipeline`: Mocks → FundMe → confirmations → verification
//! - `deployments`: Per-network deployment records
//! - `scripts`: Fund / withdraw / status
//! - `state`: Persisted chain state
//! - `verify`: Block-explorer verification seam
//! - `config`: Command-line options
//! - `errors`: Deployment error types

pub mod config;
pub mod deployments;
pub mod errors;
pub mod network;
pub mod pipeline;
pub mod scripts;
pub mod state;
pub mod verify;

pub use errors::DeployError;
