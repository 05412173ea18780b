//! Native-currency to USD conversion
//!
//! The one arithmetic step the custody contract performs:
//!
//! ```text
//! usd_value = amount * answer / 10^feed_decimals
//! ```
//!
//! `amount` is in wei, so the product is already an 18-decimal USD value.
//! Multiplication happens before division and the result is floored; a
//! contribution is accepted iff `usd_value >= usd(MINIMUM_USD)`.

use alloy_primitives::U256;

use crate::errors::ConversionError;
use crate::numeric::{pow10, usd};

/// Minimum contribution in whole USD
pub const MINIMUM_USD: u64 = 50;

/// USD value (18 decimals) of `amount` wei at price `answer` with
/// `feed_decimals` places.
pub fn usd_value(amount: U256, answer: i128, feed_decimals: u8) -> Result<U256, ConversionError> {
    if answer <= 0 {
        return Err(ConversionError::InvalidAnswer { answer });
    }
    let price = U256::from(answer.unsigned_abs());
    let scaled = amount
        .checked_mul(price)
        .ok_or(ConversionError::Overflow)?;
    Ok(scaled / pow10(feed_decimals))
}

/// The threshold as an 18-decimal USD value.
pub fn minimum_usd() -> U256 {
    usd(MINIMUM_USD)
}

/// Whether an 18-decimal USD value clears the threshold.
pub fn meets_minimum(usd_value: U256) -> bool {
    usd_value >= minimum_usd()
}

/// Smallest wei amount that clears the threshold at the given price.
pub fn minimum_contribution(answer: i128, feed_decimals: u8) -> Result<U256, ConversionError> {
    if answer <= 0 {
        return Err(ConversionError::InvalidAnswer { answer });
    }
    let price = U256::from(answer.unsigned_abs());
    let numerator = minimum_usd()
        .checked_mul(pow10(feed_decimals))
        .ok_or(ConversionError::Overflow)?;
    // ceil(numerator / price)
    let (quotient, remainder) = numerator.div_rem(price);
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + U256::from(1u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{ether, parse_ether};
    use proptest::prelude::*;

    /// 2000 USD with 18 decimals
    const PRICE_18: i128 = 2_000_000_000_000_000_000_000;
    /// 2000 USD with 8 decimals (real Chainlink ETH/USD scale)
    const PRICE_8: i128 = 200_000_000_000;

    #[test]
    fn test_usd_value_one_ether() {
        assert_eq!(usd_value(ether(1), PRICE_18, 18).unwrap(), usd(2000));
        assert_eq!(usd_value(ether(1), PRICE_8, 8).unwrap(), usd(2000));
    }

    #[test]
    fn test_usd_value_tenth_ether() {
        let amount = parse_ether("0.1").unwrap();
        assert_eq!(usd_value(amount, PRICE_18, 18).unwrap(), usd(200));
        assert!(meets_minimum(usd(200)));
    }

    #[test]
    fn test_threshold_boundary() {
        let exact = parse_ether("0.025").unwrap();
        assert_eq!(usd_value(exact, PRICE_18, 18).unwrap(), usd(50));
        assert!(meets_minimum(usd_value(exact, PRICE_18, 18).unwrap()));

        let below = exact - U256::from(1u64);
        assert!(!meets_minimum(usd_value(below, PRICE_18, 18).unwrap()));
    }

    #[test]
    fn test_zero_amount_is_worth_nothing() {
        assert_eq!(usd_value(U256::ZERO, PRICE_18, 18).unwrap(), U256::ZERO);
        assert!(!meets_minimum(U256::ZERO));
    }

    #[test]
    fn test_non_positive_answer_rejected() {
        assert_eq!(
            usd_value(ether(1), 0, 18),
            Err(ConversionError::InvalidAnswer { answer: 0 })
        );
        assert_eq!(
            usd_value(ether(1), -1, 18),
            Err(ConversionError::InvalidAnswer { answer: -1 })
        );
    }

    #[test]
    fn test_overflow_detected() {
        assert_eq!(usd_value(U256::MAX, PRICE_18, 18), Err(ConversionError::Overflow));
    }

    #[test]
    fn test_minimum_contribution_at_2000() {
        assert_eq!(
            minimum_contribution(PRICE_18, 18).unwrap(),
            parse_ether("0.025").unwrap()
        );
        assert_eq!(
            minimum_contribution(PRICE_8, 8).unwrap(),
            parse_ether("0.025").unwrap()
        );
    }

    #[test]
    fn test_minimum_contribution_rounds_up() {
        // 50 USD at 3 USD/ETH is 16.67 ETH; the floor would miss the threshold
        let price = 3 * 10i128.pow(18);
        let min = minimum_contribution(price, 18).unwrap();
        assert!(meets_minimum(usd_value(min, price, 18).unwrap()));
        assert!(!meets_minimum(usd_value(min - U256::from(1u64), price, 18).unwrap()));
    }

    proptest! {
        #[test]
        fn prop_minimum_contribution_is_tight(price in 1u64..1_000_000u64, decimals in 0u8..=18u8) {
            let answer = i128::from(price) * 10i128.pow(u32::from(decimals));
            let min = minimum_contribution(answer, decimals).unwrap();
            prop_assert!(meets_minimum(usd_value(min, answer, decimals).unwrap()));
            if !min.is_zero() {
                let below = min - U256::from(1u64);
                prop_assert!(!meets_minimum(usd_value(below, answer, decimals).unwrap()));
            }
        }

        #[test]
        fn prop_usd_value_monotonic(a in 0u128..u128::MAX / 2, delta in 0u128..1_000_000u128) {
            let lo = usd_value(U256::from(a), PRICE_18, 18).unwrap();
            let hi = usd_value(U256::from(a + delta), PRICE_18, 18).unwrap();
            prop_assert!(lo <= hi);
        }
    }
}
