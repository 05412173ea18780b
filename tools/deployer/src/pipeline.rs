//! Deployment pipeline
//!
//! ```text
//! mocks (local only) → resolve price feed → FundMe → confirmations → verify
//! ```
//!
//! Each step is tagged so a run can be limited to `mocks` or `fund-me`.
//! A mock already recorded for the network and still present on the chain is
//! reused rather than deployed again.

use alloy_primitives::Address;
use clap::ValueEnum;
use fundme_contracts::chain::{LocalChain, Receipt};
use serde_json::json;
use tracing::{info, warn};

use crate::deployments::{DeploymentRecord, DeploymentStore, FUND_ME, MOCK_V3_AGGREGATOR};
use crate::errors::DeployError;
use crate::network::{NetworkProfile, PriceFeedSource};
use crate::verify::{ContractVerifier, VerifyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeployTag {
    All,
    Mocks,
    FundMe,
}

impl DeployTag {
    pub fn includes_mocks(self) -> bool {
        matches!(self, DeployTag::All | DeployTag::Mocks)
    }

    pub fn includes_fund_me(self) -> bool {
        matches!(self, DeployTag::All | DeployTag::FundMe)
    }
}

/// What a pipeline run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentSummary {
    pub price_feed: Option<DeploymentRecord>,
    pub fund_me: Option<DeploymentRecord>,
}

pub struct Deployer<'a> {
    chain: &'a mut LocalChain,
    store: &'a mut DeploymentStore,
    profile: &'a NetworkProfile,
    verifier: &'a mut dyn ContractVerifier,
}

impl<'a> Deployer<'a> {
    pub fn new(
        chain: &'a mut LocalChain,
        store: &'a mut DeploymentStore,
        profile: &'a NetworkProfile,
        verifier: &'a mut dyn ContractVerifier,
    ) -> Self {
        Self {
            chain,
            store,
            profile,
            verifier,
        }
    }

    /// Run every step selected by `tag`.
    pub fn run(&mut self, tag: DeployTag) -> Result<DeploymentSummary, DeployError> {
        let price_feed = if tag.includes_mocks() {
            self.deploy_mocks()?
        } else {
            None
        };
        let fund_me = if tag.includes_fund_me() {
            Some(self.deploy_fund_me()?)
        } else {
            None
        };
        Ok(DeploymentSummary { price_feed, fund_me })
    }

    /// Deploy `MockV3Aggregator` on local networks. Returns `None` elsewhere.
    pub fn deploy_mocks(&mut self) -> Result<Option<DeploymentRecord>, DeployError> {
        let (decimals, initial_answer) = match self.profile.price_feed_source()? {
            PriceFeedSource::DeployMock {
                decimals,
                initial_answer,
            } => (decimals, initial_answer),
            PriceFeedSource::Fixed(_) => {
                info!(network = self.profile.name, "Non-local network, skipping mocks");
                return Ok(None);
            }
        };

        if let Some(existing) = self.store.find(MOCK_V3_AGGREGATOR)? {
            if self.chain.price_feed(&existing.address).is_some() {
                info!(address = %existing.address, "Mocks already deployed");
                return Ok(Some(existing));
            }
        }

        info!(network = self.profile.name, "Local network detected! Deploying mocks...");
        let deployer = self.chain.deployer()?;
        let receipt = self
            .chain
            .deploy_price_feed(deployer, decimals, initial_answer)?;
        let record = self.record(
            MOCK_V3_AGGREGATOR,
            &receipt,
            vec![json!(decimals), json!(initial_answer.to_string())],
        )?;
        info!(address = %record.address, "Mocks deployed!");
        Ok(Some(record))
    }

    /// Deploy FundMe bound to this network's price feed.
    pub fn deploy_fund_me(&mut self) -> Result<DeploymentRecord, DeployError> {
        let price_feed = self.resolve_price_feed()?;
        info!(network = self.profile.name, %price_feed, "Price feed address for network");

        let deployer = self.chain.deployer()?;
        let receipt = self.chain.deploy_fund_me(deployer, price_feed)?;
        let required = self.profile.required_confirmations();
        let confirmations = self.chain.wait_for_confirmations(&receipt, required);
        info!(confirmations, required, "Deployment confirmed");

        let args = vec![json!(price_feed)];
        let record = self.record(FUND_ME, &receipt, args.clone())?;
        info!(address = %record.address, owner = %deployer, "FundMe deployed");

        if !self.profile.is_local() {
            self.verify(record.address, &args);
        }
        Ok(record)
    }

    fn resolve_price_feed(&self) -> Result<Address, DeployError> {
        match self.profile.price_feed_source()? {
            PriceFeedSource::Fixed(address) => Ok(address),
            PriceFeedSource::DeployMock { .. } => {
                let mock = self.store.get(MOCK_V3_AGGREGATOR)?;
                // a record can outlive the chain it was deployed to
                if self.chain.price_feed(&mock.address).is_none() {
                    return Err(DeployError::MissingDeployment {
                        name: MOCK_V3_AGGREGATOR.to_string(),
                        network: self.profile.name.to_string(),
                    });
                }
                Ok(mock.address)
            }
        }
    }

    fn verify(&mut self, address: Address, args: &[serde_json::Value]) {
        info!(%address, "Verifying contract...");
        match self.verifier.verify(address, args) {
            Ok(()) => info!(%address, "Contract verified"),
            Err(VerifyError::AlreadyVerified { .. }) => info!(%address, "Already verified"),
            Err(err) => warn!(%address, error = %err, "Verification failed"),
        }
    }

    fn record(
        &mut self,
        name: &str,
        receipt: &Receipt,
        args: Vec<serde_json::Value>,
    ) -> Result<DeploymentRecord, DeployError> {
        let address = receipt
            .contract_address
            .ok_or_else(|| DeployError::MissingDeployment {
                name: name.to_string(),
                network: self.profile.name.to_string(),
            })?;
        let record = DeploymentRecord {
            name: name.to_string(),
            address,
            deployer: receipt.from,
            args,
            tx_id: receipt.tx_id,
            block_number: receipt.block_number,
            deployed_at: chrono::Utc::now(),
        };
        self.store.save(record.clone())?;
        Ok(record)
    }
}
