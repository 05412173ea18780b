//! Fixed-point amounts for native currency and USD
//!
//! Native currency is counted in wei (18 decimals). USD values produced by the
//! conversion step use the same 18-decimal scale, so `usd(50)` is the 50 USD
//! threshold as a raw `U256`.
//!
//! Human-readable amounts ("0.05") go through `rust_decimal` so parsing is
//! exact: no floating point ever touches a balance.

use alloy_primitives::U256;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::UnitError;

/// Decimal places of the native currency
pub const ETHER_DECIMALS: u8 = 18;

/// Decimal places of USD values returned by the conversion step
pub const USD_DECIMALS: u8 = 18;

/// Wei in one whole ether
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// `10^exp` as a `U256`.
pub fn pow10(exp: u8) -> U256 {
    U256::from(10u64).pow(U256::from(exp))
}

/// Whole ether to wei.
pub fn ether(amount: u64) -> U256 {
    U256::from(amount) * U256::from(WEI_PER_ETHER)
}

/// Whole USD to 18-decimal fixed point.
pub fn usd(amount: u64) -> U256 {
    U256::from(amount) * pow10(USD_DECIMALS)
}

/// Parse a decimal string into an integer amount with `decimals` places.
///
/// `parse_units("0.05", 18)` is `50_000_000_000_000_000`. Values with more
/// fractional digits than `decimals` are rejected rather than truncated.
pub fn parse_units(value: &str, decimals: u8) -> Result<U256, UnitError> {
    let trimmed = value.trim();
    let parsed = Decimal::from_str(trimmed).map_err(|_| UnitError::Malformed {
        value: value.to_string(),
    })?;

    if parsed.is_sign_negative() && !parsed.is_zero() {
        return Err(UnitError::Negative {
            value: value.to_string(),
        });
    }

    let scale = parsed.scale();
    if scale > u32::from(decimals) {
        return Err(UnitError::TooPrecise {
            value: value.to_string(),
            decimals,
        });
    }

    let mantissa = U256::from(parsed.mantissa().unsigned_abs());
    // scale <= decimals <= u8::MAX here
    let shift = decimals - scale as u8;
    mantissa
        .checked_mul(pow10(shift))
        .ok_or(UnitError::Overflow)
}

/// Parse an ether amount ("0.1") into wei.
pub fn parse_ether(value: &str) -> Result<U256, UnitError> {
    parse_units(value, ETHER_DECIMALS)
}

/// Render an integer amount with `decimals` places as a normalized decimal.
pub fn format_units(value: U256, decimals: u8) -> Result<Decimal, UnitError> {
    let raw = u128::try_from(value).map_err(|_| UnitError::Overflow)?;
    let raw = i128::try_from(raw).map_err(|_| UnitError::Overflow)?;
    Decimal::try_from_i128_with_scale(raw, u32::from(decimals))
        .map(|d| d.normalize())
        .map_err(|_| UnitError::Overflow)
}

/// Render wei as ether.
pub fn format_ether(value: U256) -> Result<Decimal, UnitError> {
    format_units(value, ETHER_DECIMALS)
}

/// Log-friendly ether rendering; falls back to raw wei when out of range.
pub fn display_ether(value: U256) -> String {
    match format_ether(value) {
        Ok(d) => format!("{d} ETH"),
        Err(_) => format!("{value} wei"),
    }
}
