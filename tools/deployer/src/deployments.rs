//! Deployment record store
//!
//! One JSON record per contract name, grouped by network:
//!
//! ```text
//! <root>/<network>/<ContractName>.json
//! ```
//!
//! Writes are atomic (write to `.tmp`, fsync, rename). The in-memory backend
//! serves tests and dry runs.

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use types::ids::TxId;

use crate::errors::DeployError;

pub const MOCK_V3_AGGREGATOR: &str = "MockV3Aggregator";
pub const FUND_ME: &str = "FundMe";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub name: String,
    pub address: Address,
    pub deployer: Address,
    /// Constructor arguments, in order
    pub args: Vec<serde_json::Value>,
    pub tx_id: TxId,
    pub block_number: u64,
    pub deployed_at: DateTime<Utc>,
}

#[derive(Debug)]
enum Backend {
    Directory(PathBuf),
    Memory(BTreeMap<String, DeploymentRecord>),
}

#[derive(Debug)]
pub struct DeploymentStore {
    network: String,
    backend: Backend,
}

impl DeploymentStore {
    /// File-backed store for `network` under `root`.
    pub fn open(root: impl AsRef<Path>, network: &str) -> Self {
        Self {
            network: network.to_string(),
            backend: Backend::Directory(root.as_ref().join(network)),
        }
    }

    pub fn in_memory(network: &str) -> Self {
        Self {
            network: network.to_string(),
            backend: Backend::Memory(BTreeMap::new()),
        }
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    /// Insert or replace the record for `record.name`.
    pub fn save(&mut self, record: DeploymentRecord) -> Result<(), DeployError> {
        match &mut self.backend {
            Backend::Memory(records) => {
                records.insert(record.name.clone(), record);
            }
            Backend::Directory(dir) => {
                fs::create_dir_all(&*dir)?;
                let json = serde_json::to_vec_pretty(&record)?;
                let path = dir.join(format!("{}.json", record.name));
                let tmp_path = dir.join(format!("{}.json.tmp", record.name));
                {
                    let mut file = File::create(&tmp_path)?;
                    file.write_all(&json)?;
                    file.sync_all()?;
                }
                fs::rename(&tmp_path, &path)?;
            }
        }
        Ok(())
    }

    /// Record for `name`, or `None` if nothing was deployed under it.
    pub fn find(&self, name: &str) -> Result<Option<DeploymentRecord>, DeployError> {
        match &self.backend {
            Backend::Memory(records) => Ok(records.get(name).cloned()),
            Backend::Directory(dir) => {
                let path = dir.join(format!("{name}.json"));
                if !path.exists() {
                    return Ok(None);
                }
                let data = fs::read(&path)?;
                Ok(Some(serde_json::from_slice(&data)?))
            }
        }
    }

    /// Record for `name`; `MissingDeployment` if absent.
    pub fn get(&self, name: &str) -> Result<DeploymentRecord, DeployError> {
        self.find(name)?.ok_or_else(|| DeployError::MissingDeployment {
            name: name.to_string(),
            network: self.network.clone(),
        })
    }

    /// Names of all recorded contracts, sorted.
    pub fn names(&self) -> Result<Vec<String>, DeployError> {
        match &self.backend {
            Backend::Memory(records) => Ok(records.keys().cloned().collect()),
            Backend::Directory(dir) => {
                if !dir.exists() {
                    return Ok(Vec::new());
                }
                let mut names = Vec::new();
                for entry in fs::read_dir(dir)? {
                    let path = entry?.path();
                    if path.extension().map(|ext| ext == "json").unwrap_or(false) {
                        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                            names.push(stem.to_string());
                        }
                    }
                }
                names.sort();
                Ok(names)
            }
        }
    }
}
