//! Per-account membership and position record.

use odra::casper_types::U256;

use crate::error::VaultError;
use crate::math::{mul_div_ceil, Decimal};

/// Fixed-shape record kept for every account that has ever entered.
#[odra::odra_type]
pub struct AccountInfo {
    /// Stake paid to become a member, zero when not a member
    pub toll: U256,
    /// Collateral locked in the open position, zero when none is open
    pub collateral_amount: U256,
    /// Borrowed amount at `entry_index`
    pub debt_principal: U256,
    /// Interest index when the position was opened
    pub entry_index: U256,
}

impl AccountInfo {
    /// Record of an account that never entered
    pub fn empty() -> Self {
        Self {
            toll: U256::zero(),
            collateral_amount: U256::zero(),
            debt_principal: U256::zero(),
            entry_index: U256::zero(),
        }
    }

    /// Whether the toll has been paid
    pub fn is_member(&self) -> bool {
        !self.toll.is_zero()
    }

    /// Whether a position is open
    pub fn has_position(&self) -> bool {
        !self.collateral_amount.is_zero()
    }

    /// Record a freshly opened position
    pub fn open_position(
        &mut self,
        collateral_amount: U256,
        debt_principal: U256,
        index: Decimal,
    ) -> Result<(), VaultError> {
        if self.has_position() {
            return Err(VaultError::PositionAlreadyOpen);
        }
        if collateral_amount.is_zero() || debt_principal.is_zero() {
            return Err(VaultError::InvalidAmount);
        }
        self.collateral_amount = collateral_amount;
        self.debt_principal = debt_principal;
        self.entry_index = index.to_scaled_val();
        Ok(())
    }

    /// Zero the position fields and return the collateral that was locked.
    /// Membership is kept.
    pub fn clear_position(&mut self) -> Result<U256, VaultError> {
        if !self.has_position() {
            return Err(VaultError::NoOpenPosition);
        }
        let collateral = self.collateral_amount;
        self.collateral_amount = U256::zero();
        self.debt_principal = U256::zero();
        self.entry_index = U256::zero();
        Ok(collateral)
    }

    /// Owed debt at `index`: `principal * index / entry_index`, rounded up.
    pub fn current_debt(&self, index: Decimal) -> Result<U256, VaultError> {
        if !self.has_position() || self.entry_index.is_zero() {
            return Ok(U256::zero());
        }
        mul_div_ceil(self.debt_principal, index.to_scaled_val(), self.entry_index)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::TryMul;

    fn wad(amount: u64) -> U256 {
        U256::from(amount) * U256::from(crate::math::common::WAD)
    }

    #[test]
    fn empty_account_has_nothing() {
        let account = AccountInfo::empty();
        assert!(!account.is_member());
        assert!(!account.has_position());
        assert_eq!(account.current_debt(Decimal::from(2u64)).unwrap(), U256::zero());
    }

    #[test]
    fn debt_scales_with_index_growth() {
        let mut account = AccountInfo::empty();
        let entry = Decimal::from_percent(110).try_mul(Decimal::one()).unwrap();
        account.open_position(wad(10), wad(20_000), entry).unwrap();

        assert_eq!(account.current_debt(entry).unwrap(), wad(20_000));
        // index grew 1.1 -> 1.21, so debt grew by 10%
        let later = entry.try_mul(Decimal::from_percent(110)).unwrap();
        assert_eq!(account.current_debt(later).unwrap(), wad(22_000));
    }

    #[test]
    fn debt_rounds_up() {
        let mut account = AccountInfo::empty();
        account
            .open_position(U256::one(), U256::from(3u64), Decimal::from(3u64))
            .unwrap();
        assert_eq!(account.current_debt(Decimal::from(4u64)).unwrap(), U256::from(4u64));
        assert_eq!(
            account
                .current_debt(Decimal::from_scaled_val(U256::from(3_000_000_000_000_000_001u64)))
                .unwrap(),
            U256::from(4u64)
        );
    }

    #[test]
    fn second_open_is_rejected() {
        let mut account = AccountInfo::empty();
        account.open_position(wad(1), wad(1), Decimal::one()).unwrap();
        assert_eq!(
            account.open_position(wad(1), wad(1), Decimal::one()),
            Err(VaultError::PositionAlreadyOpen)
        );
    }

    #[test]
    fn clearing_keeps_membership() {
        let mut account = AccountInfo::empty();
        account.toll = wad(100);
        account.open_position(wad(10), wad(5), Decimal::one()).unwrap();

        assert_eq!(account.clear_position().unwrap(), wad(10));
        assert!(account.is_member());
        assert_eq!(account.debt_principal, U256::zero());
        assert_eq!(account.entry_index, U256::zero());
        assert_eq!(account.clear_position(), Err(VaultError::NoOpenPosition));
    }
}
