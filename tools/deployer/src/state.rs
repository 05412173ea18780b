//! Persisted chain state, one file per network
//!
//! ```text
//! <root>/<network>/state/chain.json
//! ```
//!
//! Kept in its own subdirectory so the deployment records beside it stay one
//! `<ContractName>.json` per contract.

use fundme_contracts::chain::LocalChain;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::DeployError;

const STATE_DIR: &str = "state";
const CHAIN_FILE: &str = "chain.json";

fn state_dir(root: &Path, network: &str) -> PathBuf {
    root.join(network).join(STATE_DIR)
}

pub fn chain_path(root: &Path, network: &str) -> PathBuf {
    state_dir(root, network).join(CHAIN_FILE)
}

/// Load the saved chain for `network`, or start a fresh one.
pub fn load_chain(root: &Path, network: &str) -> Result<LocalChain, DeployError> {
    let path = chain_path(root, network);
    if !path.exists() {
        debug!(path = %path.display(), "No saved chain, starting at genesis");
        return Ok(LocalChain::new());
    }
    let data = fs::read(&path)?;
    let chain: LocalChain = serde_json::from_slice(&data)?;
    debug!(path = %path.display(), block = chain.block_number(), "Loaded chain");
    Ok(chain)
}

/// Atomically write `chain` for `network`.
pub fn save_chain(root: &Path, network: &str, chain: &LocalChain) -> Result<PathBuf, DeployError> {
    let path = chain_path(root, network);
    let dir = state_dir(root, network);
    fs::create_dir_all(&dir)?;

    let tmp_path = dir.join(format!("{CHAIN_FILE}.tmp"));
    {
        let mut file = File::create(&tmp_path)?;
        file.write_all(&serde_json::to_vec(chain)?)?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, &path)?;
    Ok(path)
}
