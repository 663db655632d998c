//! Rate type for interest rate calculations using U256

use {
    crate::{error::VaultError, math::common::*},
    odra::casper_types::U256,
};

/// Interest rate as a scaled value
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Eq, Ord)]
pub struct Rate(pub U256);

impl Rate {
    /// One (100%)
    pub fn one() -> Self {
        Self(Self::wad())
    }

    /// Zero (0%)
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    fn wad() -> U256 {
        U256::from(WAD)
    }

    /// Create rate from percent value (0-100)
    pub fn from_percent(percent: u8) -> Self {
        Self(U256::from(percent as u64 * PERCENT_SCALER))
    }

    /// Create rate from basis points (1 bps = 0.01%)
    pub fn from_bps(bps: u32) -> Self {
        Self(U256::from(bps as u64 * BPS_SCALER))
    }

    /// Return raw scaled value
    pub fn to_scaled_val(&self) -> U256 {
        self.0
    }

    /// Create rate from scaled value
    pub fn from_scaled_val(scaled_val: U256) -> Self {
        Self(scaled_val)
    }

    /// Calculate power (for compound interest)
    pub fn try_pow(&self, exponent: u64) -> Result<Self, VaultError> {
        if exponent == 0 {
            return Ok(Self::one());
        }

        let mut result = Self::one();
        let mut base = *self;
        let mut exp = exponent;

        while exp > 0 {
            if exp % 2 == 1 {
                result = result.try_mul(base)?;
            }
            exp /= 2;
            if exp > 0 {
                base = base.try_mul(base)?;
            }
        }

        Ok(result)
    }
}

impl TryAdd for Rate {
    fn try_add(self, rhs: Self) -> Result<Self, VaultError> {
        Ok(Self(self.0.checked_add(rhs.0).ok_or(VaultError::MathOverflow)?))
    }
}

impl TryDiv<u64> for Rate {
    fn try_div(self, rhs: u64) -> Result<Self, VaultError> {
        Ok(Self(
            self.0
                .checked_div(U256::from(rhs))
                .ok_or(VaultError::MathOverflow)?,
        ))
    }
}

impl TryMul<Rate> for Rate {
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
