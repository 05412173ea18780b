//! Fund / withdraw / status scripts against a deployed FundMe

use alloy_primitives::{Address, U256};
use fundme_contracts::chain::{LocalChain, Receipt};
use serde::Serialize;
use tracing::info;
use types::numeric::{display_ether, parse_ether};

use crate::deployments::{DeploymentStore, FUND_ME};
use crate::errors::DeployError;

/// Amount sent by `fund` when none is given
pub const DEFAULT_FUND_AMOUNT: &str = "0.05";

/// Fund the recorded FundMe from dev account `account` with `amount` ether.
pub fn fund(
    chain: &mut LocalChain,
    store: &DeploymentStore,
    account: usize,
    amount: &str,
) -> Result<Receipt, DeployError> {
    let contract = store.get(FUND_ME)?.address;
    let from = dev_account(chain, account)?;
    let value = parse_ether(amount)?;

    info!(%contract, %from, amount = %display_ether(value), "Funding contract...");
    let receipt = chain.fund(from, contract, value)?;
    info!(tx_id = %receipt.tx_id, block = receipt.block_number, "Funded!");
    Ok(receipt)
}

/// Withdraw the recorded FundMe's balance as the deployer.
pub fn withdraw(chain: &mut LocalChain, store: &DeploymentStore) -> Result<Receipt, DeployError> {
    let contract = store.get(FUND_ME)?.address;
    let owner = chain.deployer()?;
    let amount = chain.balance_of(&contract);

    info!(%contract, amount = %display_ether(amount), "Withdrawing...");
    let receipt = chain.withdraw(owner, contract)?;
    info!(tx_id = %receipt.tx_id, block = receipt.block_number, "Got it back!");
    Ok(receipt)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunderStatus {
    pub address: Address,
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundMeStatus {
    pub network: String,
    pub address: Address,
    pub owner: Address,
    pub price_feed: Address,
    pub balance: U256,
    pub balance_display: String,
    pub funders: Vec<FunderStatus>,
}

/// Snapshot of the recorded FundMe's state.
pub fn status(chain: &LocalChain, store: &DeploymentStore) -> Result<FundMeStatus, DeployError> {
    let address = store.get(FUND_ME)?.address;
    let contract = chain.fund_me(&address)?;

    Ok(FundMeStatus {
        network: store.network().to_string(),
        address,
        owner: contract.owner(),
        price_feed: contract.price_feed(),
        balance: contract.balance(),
        balance_display: display_ether(contract.balance()),
        funders: contract
            .funders()
            .iter()
            .map(|funder| FunderStatus {
                address: *funder,
                amount: contract.address_to_amount_funded(funder),
            })
            .collect(),
    })
}

fn dev_account(chain: &LocalChain, index: usize) -> Result<Address, DeployError> {
    let accounts = chain.dev_accounts();
    accounts
        .get(index)
        .copied()
        .ok_or(DeployError::UnknownAccount {
            index,
            available: accounts.len(),
        })
}
