//! Fixed-point payment amounts.
//!
//! Payment tokens on the bridge use six fractional digits (USDC base units).
//! Catalog prices are converted by scaling with 10^6 and truncating toward
//! zero: a sub-unit remainder is dropped, never rounded up, so a buyer is
//! never charged more than the listed price.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of fractional digits carried by the payment token.
pub const TOKEN_DECIMALS: u32 = 6;

/// Scale factor matching [`TOKEN_DECIMALS`].
pub const TOKEN_SCALE: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("price {0} is negative")]
    Negative(Decimal),
    #[error("price {0} does not fit a fixed-point amount")]
    Overflow(Decimal),
}

/// Integer amount in token base units (value scaled by 10^6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedPointAmount(u64);

impl FixedPointAmount {
    #[must_use]
    pub const fn from_base_units(units: u64) -> Self {
        Self(units)
    }

    #[must_use]
    pub const fn base_units(self) -> u64 {
        self.0
    }

    /// Convert a decimal price, truncating anything past six fractional digits.
    ///
    /// # Errors
    ///
    /// Returns an error for negative prices or prices too large for `u64` base units.
    pub fn from_decimal_truncating(price: Decimal) -> Result<Self, AmountError> {
        if price.is_sign_negative() && !price.is_zero() {
            return Err(AmountError::Negative(price));
        }
        let scaled = price
            .checked_mul(Decimal::from(TOKEN_SCALE))
            .ok_or(AmountError::Overflow(price))?;
        scaled
            .trunc()
            .to_u64()
            .map(Self)
            .ok_or(AmountError::Overflow(price))
    }

    /// Back to a decimal with exactly six fractional digits.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.0), TOKEN_DECIMALS)
    }
}

impl fmt::Display for FixedPointAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
