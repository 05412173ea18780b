//! Error types for unit handling and price conversion
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

/// Errors raised while parsing or formatting fixed-point amounts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    #[error("Malformed amount: {value}")]
    Malformed { value: String },

    #[error("Amount must not be negative: {value}")]
    Negative { value: String },

    #[error("Amount {value} has more than {decimals} decimal places")]
    TooPrecise { value: String, decimals: u8 },

    #[error("Amount out of range")]
    Overflow,
}

/// Errors raised by the USD conversion step
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Price source reported a non-positive answer: {answer}")]
    InvalidAnswer { answer: i128 },

    #[error("Arithmetic overflow converting to USD")]
    Overflow,
}
