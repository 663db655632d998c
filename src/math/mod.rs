//! Fixed-point math used for interest and valuation.

pub mod common;
pub mod decimal;
pub mod rate;

pub use common::{TryAdd, TryDiv, TryMul};
pub use decimal::Decimal;
pub use rate::Rate;

use odra::casper_types::U256;

use crate::error::VaultError;

/// `amount * numerator / denominator`, rounded down.
pub fn mul_div_floor(amount: U256, numerator: U256, denominator: U256) -> Result<U256, VaultError> {
    amount
        .checked_mul(numerator)
        .ok_or(VaultError::MathOverflow)?
        .checked_div(denominator)
        .ok_or(VaultError::MathOverflow)
}

/// `amount * numerator / denominator`, rounded up.
pub fn mul_div_ceil(amount: U256, numerator: U256, denominator: U256) -> Result<U256, VaultError> {
    if denominator.is_zero() {
        return Err(VaultError::MathOverflow);
    }
    let product = amount.checked_mul(numerator).ok_or(VaultError::MathOverflow)?;
    let quotient = product / denominator;
    if (product % denominator).is_zero() {
        Ok(quotient)
    } else {
        quotient
            .checked_add(U256::one())
            .ok_or(VaultError::MathOverflow)
    }
}
