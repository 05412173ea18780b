//! Block-explorer source verification seam
//!
//! No explorer client ships with this crate. The pipeline calls the verifier
//! after deploying to a remote network and only logs failures.

use alloy_primitives::Address;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VerifyError {
    #[error("Verification service unavailable")]
    Unavailable,

    #[error("Contract at {address} is already verified")]
    AlreadyVerified { address: Address },

    #[error("Verification rejected: {reason}")]
    Rejected { reason: String },
}

pub trait ContractVerifier {
    fn verify(
        &mut self,
        address: Address,
        constructor_args: &[serde_json::Value],
    ) -> Result<(), VerifyError>;
}

/// Verifier used when no explorer is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVerifier;

impl ContractVerifier for NoVerifier {
    fn verify(
        &mut self,
        _address: Address,
        _constructor_args: &[serde_json::Value],
    ) -> Result<(), VerifyError> {
        Err(VerifyError::Unavailable)
    }
}
