//! Vault state: per-account records, the global interest index and risk parameters.

pub mod account;
pub mod interest;

pub use account::*;
pub use interest::*;

/// Share of collateral value lent out when a position is opened
pub const LOAN_TO_VALUE_PERCENT: u8 = 50;

/// Share of collateral value the debt may reach before the position can be liquidated
pub const LIQUIDATION_THRESHOLD_PERCENT: u8 = 60;

/// Seconds used to spread an annual rate over the per-second rate
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Block time is reported in milliseconds
pub const MILLIS_PER_SECOND: u64 = 1_000;

/// Highest accepted annual borrow rate, 100%
pub const MAX_ANNUAL_RATE_BPS: u32 = 10_000;
