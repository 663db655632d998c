//! Global interest index.
//!
//! Debt of every position is derived from one index that compounds with
//! `(1 + rate_per_second)^elapsed`, so accrual never touches accounts.

use odra::casper_types::U256;

use crate::error::VaultError;
use crate::math::{Decimal, Rate, TryAdd, TryDiv, TryMul};
use crate::state::{MAX_ANNUAL_RATE_BPS, SECONDS_PER_YEAR};

/// Externally parameterized interest-rate strategy, fixed at deployment.
#[odra::odra_type]
pub struct InterestRateStrategy {
    /// Annual borrow rate in basis points
    pub annual_rate_bps: u32,
}

impl InterestRateStrategy {
    /// Per-second rate derived from the annual rate
    pub fn rate_per_second(&self) -> Result<Rate, VaultError> {
        if self.annual_rate_bps > MAX_ANNUAL_RATE_BPS {
            return Err(VaultError::InvalidConfig);
        }
        Rate::from_bps(self.annual_rate_bps).try_div(SECONDS_PER_YEAR)
    }
}

/// Snapshot of the interest accrual state kept by the vault.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterestState {
    /// Cumulative growth since deployment, starts at one
    pub index: Decimal,
    /// Second of the last accrual
    pub last_accrual_time: u64,
    /// Constant per-second rate
    pub rate_per_second: Rate,
}

impl InterestState {
    /// Fresh state with the index at one
    pub fn new(rate_per_second: Rate, now: u64) -> Self {
        Self {
            index: Decimal::one(),
            last_accrual_time: now,
            rate_per_second,
        }
    }

    /// Seconds since the last accrual. A clock behind the last accrual counts as zero.
    pub fn seconds_elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_accrual_time)
    }

    /// Index as it would be at `now`, without recording it.
    pub fn projected_index(&self, now: u64) -> Result<Decimal, VaultError> {
        let elapsed = self.seconds_elapsed(now);
        if elapsed == 0 {
            return Ok(self.index);
        }
        let growth = Rate::one()
            .try_add(self.rate_per_second)?
            .try_pow(elapsed)?;
        self.index.try_mul(growth)
    }

    /// Move the index forward to `now`. Returns whether anything changed.
    pub fn accrue(&mut self, now: u64) -> Result<bool, VaultError> {
        if self.seconds_elapsed(now) == 0 {
            return Ok(false);
        }
        self.index = self.projected_index(now)?;
        self.last_accrual_time = now;
        Ok(true)
    }

    /// Index as kept in storage
    pub fn raw_index(&self) -> U256 {
        self.index.to_scaled_val()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn five_percent() -> Rate {
        InterestRateStrategy { annual_rate_bps: 500 }
            .rate_per_second()
            .unwrap()
    }

    #[test]
    fn rate_per_second_from_annual_bps() {
        // 0.05e18 / 31_536_000
        assert_eq!(five_percent().to_scaled_val(), U256::from(1_585_489_599u64));
    }

    #[test]
    fn rejects_rates_above_one_hundred_percent() {
        let strategy = InterestRateStrategy { annual_rate_bps: MAX_ANNUAL_RATE_BPS + 1 };
        assert_eq!(strategy.rate_per_second(), Err(VaultError::InvalidConfig));
    }

    #[test]
    fn accrual_at_same_timestamp_is_noop() {
        let mut state = InterestState::new(five_percent(), 1_000);
        assert!(state.accrue(2_000).unwrap());
        let once = state;
        assert!(!state.accrue(2_000).unwrap());
        assert_eq!(state, once);
    }

    #[test]
    fn index_is_monotonic() {
        let mut state = InterestState::new(five_percent(), 0);
        let mut previous = state.index;
        for now in [1u64, 2, 60, 3_600, 86_400, SECONDS_PER_YEAR] {
            state.accrue(now).unwrap();
            assert!(state.index >= previous);
            previous = state.index;
        }
        // Roughly e^0.05 after a year of per-second compounding
        assert!(state.index > Decimal::from_scaled_val(U256::from(1_051_000_000_000_000_000u64)));
        assert!(state.index < Decimal::from_scaled_val(U256::from(1_052_000_000_000_000_000u64)));
    }

    #[test]
    fn projection_matches_accrual_and_leaves_state_untouched() {
        let mut state = InterestState::new(five_percent(), 0);
        let projected = state.projected_index(86_400).unwrap();
        assert_eq!(state.index, Decimal::one());
        state.accrue(86_400).unwrap();
        assert_eq!(state.index, projected);
    }

    #[test]
    fn clock_regression_does_not_move_index() {
        let mut state = InterestState::new(five_percent(), 500);
        assert!(!state.accrue(100).unwrap());
        assert_eq!(state.index, Decimal::one());
        assert_eq!(state.last_accrual_time, 500);
    }

    #[test]
    fn zero_rate_keeps_index_at_one() {
        let mut state = InterestState::new(Rate::zero(), 0);
        state.accrue(SECONDS_PER_YEAR).unwrap();
        assert_eq!(state.index, Decimal::one());
    }
}
