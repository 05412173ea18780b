//! Network Resolver: maps a network name to its deployment profile
//!
//! Pure lookup over a static table. Local networks carry no price feed
//! address: the pipeline deploys (or reuses) a `MockV3Aggregator` instead.
//! Every other network must name a fixed feed; an unknown name is fatal and
//! never falls back to a default.

use alloy_primitives::{address, Address};
use serde::Serialize;
use std::fmt;

use crate::errors::DeployError;

/// Decimals reported by the local mock feed
pub const MOCK_DECIMALS: u8 = 18;

/// 2000 USD with 18 decimals
pub const MOCK_INITIAL_ANSWER: i128 = 2_000_000_000_000_000_000_000;

/// Confirmations waited for when a profile names none
pub const DEFAULT_CONFIRMATIONS: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    Local,
    Testnet,
    Mainnet,
}

impl NetworkKind {
    pub fn is_local(self) -> bool {
        matches!(self, NetworkKind::Local)
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkKind::Local => "local",
            NetworkKind::Testnet => "testnet",
            NetworkKind::Mainnet => "mainnet",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkProfile {
    pub name: &'static str,
    pub kind: NetworkKind,
    pub price_feed: Option<Address>,
    pub block_confirmations: Option<u64>,
}

/// Where the FundMe constructor's price feed comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceFeedSource {
    /// Existing on-chain feed
    Fixed(Address),
    /// Deploy (or reuse) a mock with these parameters
    DeployMock { decimals: u8, initial_answer: i128 },
}

static NETWORKS: &[NetworkProfile] = &[
    NetworkProfile {
        name: "localhost",
        kind: NetworkKind::Local,
        price_feed: None,
        block_confirmations: None,
    },
    NetworkProfile {
        name: "hardhat",
        kind: NetworkKind::Local,
        price_feed: None,
        block_confirmations: None,
    },
    NetworkProfile {
        name: "sepolia",
        kind: NetworkKind::Testnet,
        price_feed: Some(address!("694AA1769357215DE4FAC081bf1f309aDC325306")),
        block_confirmations: Some(5),
    },
    NetworkProfile {
        name: "mainnet",
        kind: NetworkKind::Mainnet,
        price_feed: Some(address!("5f4eC3Df9cbd43714FE2740f5E3616155c5b8419")),
        block_confirmations: Some(6),
    },
];

/// All known profiles, in table order.
pub fn known_networks() -> &'static [NetworkProfile] {
    NETWORKS
}

/// Look up `name` in the network table.
pub fn resolve(name: &str) -> Result<&'static NetworkProfile, DeployError> {
    NETWORKS
        .iter()
        .find(|profile| profile.name == name)
        .ok_or_else(|| DeployError::UnclassifiedNetwork {
            name: name.to_string(),
            known: NETWORKS
                .iter()
                .map(|profile| profile.name)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

impl NetworkProfile {
    pub fn is_local(&self) -> bool {
        self.kind.is_local()
    }

    pub fn required_confirmations(&self) -> u64 {
        self.block_confirmations.unwrap_or(DEFAULT_CONFIRMATIONS)
    }

    /// Price feed to bind FundMe to on this network.
    pub fn price_feed_source(&self) -> Result<PriceFeedSource, DeployError> {
        if self.is_local() {
            return Ok(PriceFeedSource::DeployMock {
                decimals: MOCK_DECIMALS,
                initial_answer: MOCK_INITIAL_ANSWER,
            });
        }
        self.price_feed
            .map(PriceFeedSource::Fixed)
            .ok_or_else(|| DeployError::UnresolvedPriceFeed {
                network: self.name.to_string(),
            })
    }
}
