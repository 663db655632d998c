//! Interfaces of the contracts the vault talks to.
//!
//! Argument names are part of the call ABI and must match the callee's entry points.

use odra::casper_types::U256;
use odra::prelude::*;

/// CEP-18 style fungible token
#[odra::external_contract]
pub trait FungibleToken {
    /// Move `amount` from the caller to `recipient`
    fn transfer(&mut self, recipient: &Address, amount: &U256);
    /// Move `amount` from `owner` to `recipient` using the caller's allowance
    fn transfer_from(&mut self, owner: &Address, recipient: &Address, amount: &U256);
    /// Let `spender` move up to `amount` of the caller's tokens
    fn approve(&mut self, spender: &Address, amount: &U256);
    /// Balance of `address`
    fn balance_of(&self, address: &Address) -> U256;
    /// Remaining allowance from `owner` to `spender`
    fn allowance(&self, owner: &Address, spender: &Address) -> U256;
}

/// Price source quoting every asset in one common unit
#[odra::external_contract]
pub trait PriceFeed {
    /// Current price of one unit of `asset`
    fn get_price(&self, asset: &Address) -> U256;
}

/// Pool that custodies supplied collateral and sources borrowed funds
#[odra::external_contract]
pub trait LendingPool {
    /// Pull `amount` of `asset` from the caller into the pool
    fn supply(&mut self, asset: &Address, amount: &U256);
    /// Return `amount` of previously supplied `asset` to the caller
    fn withdraw(&mut self, asset: &Address, amount: &U256);
    /// Lend `amount` of `asset` to the caller
    fn borrow(&mut self, asset: &Address, amount: &U256);
    /// Pull `amount` of `asset` from the caller against its borrow
    fn repay(&mut self, asset: &Address, amount: &U256);
}
