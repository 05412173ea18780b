//! Shared types for the FundMe contracts and deployment tooling
//!
//! Everything here is pure data and arithmetic: no chain state, no I/O.
//!
//! # Modules
//! - `ids`: Transaction identifiers
//! - `numeric`: Wei/ether/USD fixed-point helpers
//! - `conversion`: The native-currency to USD conversion step
//! - `errors`: Error taxonomy

pub mod conversion;
pub mod errors;
pub mod ids;
pub mod numeric;

pub use alloy_primitives::{Address, U256};

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::conversion::*;
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use alloy_primitives::{Address, U256};
}
