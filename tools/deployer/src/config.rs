//! Command-line configuration
//!
//! Every global option can also come from the environment (or a `.env` file
//! loaded by the binary).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::DeployTag;
use crate::scripts::DEFAULT_FUND_AMOUNT;

#[derive(Debug, Parser)]
#[command(name = "fundme", version, about = "Deploy and operate the FundMe contract")]
pub struct Cli {
    /// Target network (localhost, hardhat, sepolia, mainnet)
    #[arg(long, global = true, env = "FUNDME_NETWORK", default_value = "hardhat")]
    pub network: String,

    /// Directory holding chain state and deployment records
    #[arg(long, global = true, env = "FUNDME_STATE_DIR", default_value = ".fundme")]
    pub state_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the resolved network profile as JSON
    Network,

    /// Run the deployment pipeline
    Deploy {
        #[arg(long, value_enum, default_value_t = DeployTag::All)]
        tags: DeployTag,
    },

    /// Fund the deployed FundMe
    Fund {
        /// Amount in ether
        #[arg(long, default_value = DEFAULT_FUND_AMOUNT)]
        amount: String,

        /// Dev account index to fund from
        #[arg(long, default_value_t = 0)]
        account: usize,
    },

    /// Withdraw the balance as the deployer
    Withdraw,

    /// Print the deployed FundMe's state as JSON
    Status,
}
