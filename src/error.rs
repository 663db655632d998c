//! Error types

use core::fmt;

use odra::prelude::*;

/// Errors that may be returned by the vault and its collaborator modules.
#[odra::odra_error]
#[derive(Debug, PartialEq, Eq)]
pub enum VaultError {
    // 0
    AlreadyMember = 0,
    NotMember = 1,
    PositionAlreadyOpen = 2,
    NoOpenPosition = 3,
    InsufficientRepayment = 4,

    // 5
    NotLiquidatable = 5,
    InvalidAmount = 6,
    InvalidConfig = 7,
    InvalidPrice = 8,
    MathOverflow = 9,

    // 10
    BorrowTooSmall = 10,
    InsufficientBalance = 11,
    InsufficientAllowance = 12,
    InsufficientLiquidity = 13,
    Unauthorized = 14,

    // 15
    StalePrice = 15,
}

impl VaultError {
    /// Human readable revert reason
    pub fn message(&self) -> &'static str {
        match self {
            VaultError::AlreadyMember => "account is already a member",
            VaultError::NotMember => "account hasn't paid the toll",
            VaultError::PositionAlreadyOpen => "account already has an open position",
            VaultError::NoOpenPosition => "account has no open position",
            VaultError::InsufficientRepayment => "repayment doesn't cover the owed debt",
            VaultError::NotLiquidatable => "account hasn't reached liquidation threshold",
            VaultError::InvalidAmount => "input amount is invalid",
            VaultError::InvalidConfig => "input config value is invalid",
            VaultError::InvalidPrice => "oracle returned an invalid price",
            VaultError::MathOverflow => "math operation overflow",
            VaultError::BorrowTooSmall => "collateral is too small to borrow against",
            VaultError::InsufficientBalance => "insufficient token balance",
            VaultError::InsufficientAllowance => "insufficient token allowance",
            VaultError::InsufficientLiquidity => "insufficient pool liquidity",
            VaultError::Unauthorized => "caller is not allowed to do this",
            VaultError::StalePrice => "oracle price is stale",
        }
    }
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
