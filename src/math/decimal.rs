//! Large WAD-scaled decimal values used for indices and valuations.

use {
    crate::{
        error::VaultError,
        math::{common::*, Rate},
    },
    core::fmt,
    odra::casper_types::U256,
    odra::prelude::*,
};

/// Large decimal values, precise to 18 digits
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Eq, Ord)]
pub struct Decimal(pub U256);

impl Decimal {
    /// One
    pub fn one() -> Self {
        Self(Self::wad())
    }

    fn wad() -> U256 {
        U256::from(WAD)
    }

    /// Create scaled decimal from percent value
    pub fn from_percent(percent: u8) -> Self {
        Self(U256::from(percent as u64 * PERCENT_SCALER))
    }

    /// Create decimal from an already scaled value
    pub fn from_scaled_val(scaled_val: U256) -> Self {
        Self(scaled_val)
    }

    /// Raw scaled value, as kept in contract storage
    pub fn to_scaled_val(&self) -> U256 {
        self.0
    }

    /// Lift a whole token amount into WAD scale
    pub fn from_amount(amount: U256) -> Result<Self, VaultError> {
        Ok(Self(
            amount
                .checked_mul(Self::wad())
                .ok_or(VaultError::MathOverflow)?,
        ))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut scaled_val = self.0.to_string();
        if scaled_val.len() <= SCALE {
            scaled_val.insert_str(0, &"0".repeat(SCALE - scaled_val.len()));
            scaled_val.insert_str(0, "0.");
        } else {
            scaled_val.insert(scaled_val.len() - SCALE, '.');
        }
        f.write_str(&scaled_val)
    }
}

impl From<u64> for Decimal {
    fn from(val: u64) -> Self {
        Self(Self::wad() * U256::from(val))
    }
}

impl From<Rate> for Decimal {
    fn from(rate: Rate) -> Self {
        Self::from_scaled_val(rate.to_scaled_val())
    }
}

impl TryAdd for Decimal {
    fn try_add(self, rhs: Self) -> Result<Self, VaultError> {
        Ok(Self(self.0.checked_add(rhs.0).ok_or(VaultError::MathOverflow)?))
    }
}

impl TryDiv<Decimal> for Decimal {
    fn try_div(self, rhs: Self) -> Result<Self, VaultError> {
        Ok(Self(
            self.0
                .checked_mul(Self::wad())
                .ok_or(VaultError::MathOverflow)?
                .checked_div(rhs.0)
                .ok_or(VaultError::MathOverflow)?,
        ))
    }
}

impl TryMul<Rate> for Decimal {
    fn try_mul(self, rhs: Rate) -> Result<Self, VaultError> {
        self.try_mul(Decimal::from(rhs))
    }
}

impl TryMul<Decimal> for Decimal {
    fn try_mul(self, rhs: Self) -> Result<Self, VaultError> {
        Ok(Self(
            self.0
                .checked_mul(rhs.0)
                .ok_or(VaultError::MathOverflow)?
                .checked_div(Self::wad())
                .ok_or(VaultError::MathOverflow)?,
        ))
    }
}
