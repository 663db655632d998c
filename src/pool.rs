//! Custody pool standing in for the external lending market.
//!
//! Tracks what each caller supplied and borrowed per asset. Lending is
//! limited by the pool's own token balance; interest is left to the borrower.

use odra::casper_types::U256;
use odra::prelude::*;
use odra::ContractRef;

use crate::error::VaultError;
use crate::external::FungibleTokenContractRef;

#[odra::module(events = [Supplied, Withdrawn, Borrowed, Repaid], errors = VaultError)]
pub struct MockLendingPool {
    supplied: Mapping<(Address, Address), U256>,
    borrowed: Mapping<(Address, Address), U256>,
}

#[odra::module]
impl MockLendingPool {
    pub fn supply(&mut self, asset: &Address, amount: &U256) {
        let caller = self.env().caller();
        let key = (caller, *asset);
        let supplied = self.supplied.get(&key).unwrap_or_default();
        self.supplied.set(&key, self.checked(supplied.checked_add(*amount)));

        let pool = self.env().self_address();
        self.token(asset).transfer_from(&caller, &pool, amount);
        self.env().emit_event(Supplied {
            account: caller,
            asset: *asset,
            amount: *amount,
        });
    }

    pub fn withdraw(&mut self, asset: &Address, amount: &U256) {
        let caller = self.env().caller();
        let key = (caller, *asset);
        let supplied = self.supplied.get(&key).unwrap_or_default();
        if supplied < *amount {
            self.env().revert(VaultError::InsufficientBalance);
        }
        self.supplied.set(&key, supplied - *amount);

        self.token(asset).transfer(&caller, amount);
        self.env().emit_event(Withdrawn {
            account: caller,
            asset: *asset,
            amount: *amount,
        });
    }

    pub fn borrow(&mut self, asset: &Address, amount: &U256) {
        let caller = self.env().caller();
        let pool = self.env().self_address();
        let mut token = self.token(asset);
        if token.balance_of(&pool) < *amount {
            self.env().revert(VaultError::InsufficientLiquidity);
        }

        let key = (caller, *asset);
        let borrowed = self.borrowed.get(&key).unwrap_or_default();
        self.borrowed.set(&key, self.checked(borrowed.checked_add(*amount)));

        token.transfer(&caller, amount);
        self.env().emit_event(Borrowed {
            account: caller,
            asset: *asset,
            amount: *amount,
        });
    }

    /// Repayments above the recorded borrow are kept as interest.
    pub fn repay(&mut self, asset: &Address, amount: &U256) {
        let caller = self.env().caller();
        let key = (caller, *asset);
        let borrowed = self.borrowed.get(&key).unwrap_or_default();
        self.borrowed.set(&key, borrowed.saturating_sub(*amount));

        let pool = self.env().self_address();
        self.token(asset).transfer_from(&caller, &pool, amount);
        self.env().emit_event(Repaid {
            account: caller,
            asset: *asset,
            amount: *amount,
        });
    }

    pub fn supplied_of(&self, account: Address, asset: Address) -> U256 {
        self.supplied.get(&(account, asset)).unwrap_or_default()
    }

    pub fn borrowed_of(&self, account: Address, asset: Address) -> U256 {
        self.borrowed.get(&(account, asset)).unwrap_or_default()
    }
}

impl MockLendingPool {
    fn token(&self, asset: &Address) -> FungibleTokenContractRef {
        FungibleTokenContractRef::new(self.env(), *asset)
    }

    fn checked(&self, value: Option<U256>) -> U256 {
        match value {
            Some(value) => value,
            None => self.env().revert(VaultError::MathOverflow),
        }
    }
}

#[odra::event]
pub struct Supplied {
    pub account: Address,
    pub asset: Address,
    pub amount: U256,
}

#[odra::event]
pub struct Withdrawn {
    pub account: Address,
    pub asset: Address,
    pub amount: U256,
}

#[odra::event]
pub struct Borrowed {
    pub account: Address,
    pub asset: Address,
    pub amount: U256,
}

#[odra::event]
pub struct Repaid {
    pub account: Address,
    pub asset: Address,
    pub amount: U256,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{MockToken, MockTokenInitArgs};
    use odra::host::{Deployer, NoArgs};

    #[test]
    fn supply_borrow_repay_withdraw() {
        let env = odra_test::env();
        let mut pool = MockLendingPool::deploy(&env, NoArgs);
        let mut token = MockToken::deploy(
            &env,
            MockTokenInitArgs {
                name: String::from("GHO"),
                symbol: String::from("GHO"),
                decimals: 18,
            },
        );
        let pool_address = pool.address().clone();
        let asset = token.address().clone();
        let alice = env.get_account(1);
        token.mint(&alice, &U256::from(100u64));

        env.set_caller(alice);
        token.approve(&pool_address, &U256::from(100u64));
        pool.supply(&asset, &U256::from(100u64));
        assert_eq!(pool.supplied_of(alice, asset), U256::from(100u64));
        assert_eq!(token.balance_of(&alice), U256::zero());

        pool.borrow(&asset, &U256::from(30u64));
        assert_eq!(pool.borrowed_of(alice, asset), U256::from(30u64));
        assert_eq!(
            pool.try_borrow(&asset, &U256::from(71u64)),
            Err(VaultError::InsufficientLiquidity.into())
        );

        token.approve(&pool_address, &U256::from(30u64));
        pool.repay(&asset, &U256::from(30u64));
        assert_eq!(pool.borrowed_of(alice, asset), U256::zero());

        pool.withdraw(&asset, &U256::from(100u64));
        assert_eq!(token.balance_of(&alice), U256::from(100u64));
        assert_eq!(
            pool.try_withdraw(&asset, &U256::one()),
            Err(VaultError::InsufficientBalance.into())
        );
    }
}
