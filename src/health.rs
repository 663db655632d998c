//! Position health against the oracle price.
//!
//! A position is liquidatable once
//! `debt_value > collateral_value * LIQUIDATION_THRESHOLD_PERCENT / 100`.
//! Both assets are assumed to share the same token decimals, and both
//! prices are quoted in the same unit by the oracle.

use odra::casper_types::U256;

use crate::error::VaultError;
use crate::math::{common::WAD, mul_div_floor, Decimal, Rate, TryDiv, TryMul};
use crate::state::{LIQUIDATION_THRESHOLD_PERCENT, LOAN_TO_VALUE_PERCENT};

/// Oracle prices needed to value a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceQuote {
    /// Price of one collateral unit
    pub collateral_price: U256,
    /// Price of one debt unit
    pub debt_price: U256,
}

impl PriceQuote {
    /// Reject quotes the vault can't value against
    pub fn validate(&self) -> Result<(), VaultError> {
        if self.collateral_price.is_zero() || self.debt_price.is_zero() {
            return Err(VaultError::InvalidPrice);
        }
        Ok(())
    }
}

/// Valuation of a single position.
#[odra::odra_type]
pub struct HealthSnapshot {
    /// `collateral_amount * collateral_price`
    pub collateral_value: U256,
    /// `current_debt * debt_price`
    pub debt_value: U256,
    /// WAD-scaled `collateral_value * threshold / debt_value`, `U256::MAX` without debt
    pub health_factor: U256,
}

impl HealthSnapshot {
    /// Health factor below one
    pub fn is_liquidatable(&self) -> bool {
        self.health_factor < U256::from(WAD)
    }
}

/// Value a position. Pure function of the amounts and the quote.
pub fn evaluate(
    collateral_amount: U256,
    current_debt: U256,
    quote: &PriceQuote,
) -> Result<HealthSnapshot, VaultError> {
    quote.validate()?;
    let collateral_value = collateral_amount
        .checked_mul(quote.collateral_price)
        .ok_or(VaultError::MathOverflow)?;
    let debt_value = current_debt
        .checked_mul(quote.debt_price)
        .ok_or(VaultError::MathOverflow)?;

    let health_factor = if debt_value.is_zero() {
        U256::MAX
    } else {
        Decimal::from_amount(collateral_value)?
            .try_mul(Rate::from_percent(LIQUIDATION_THRESHOLD_PERCENT))?
            .try_div(Decimal::from_amount(debt_value)?)?
            .to_scaled_val()
    };

    Ok(HealthSnapshot {
        collateral_value,
        debt_value,
        health_factor,
    })
}

/// Amount of the debt asset lent against `collateral_amount` at open time.
pub fn borrow_amount(collateral_amount: U256, quote: &PriceQuote) -> Result<U256, VaultError> {
    quote.validate()?;
    let collateral_value = collateral_amount
        .checked_mul(quote.collateral_price)
        .ok_or(VaultError::MathOverflow)?;
    let lendable_value = mul_div_floor(
        collateral_value,
        U256::from(LOAN_TO_VALUE_PERCENT),
        U256::from(100u8),
    )?;
    lendable_value
        .checked_div(quote.debt_price)
        .ok_or(VaultError::MathOverflow)
}
