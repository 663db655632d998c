//! Minimal CEP-18 style token used as membership, collateral and debt asset
//! in tests and local deployments.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::error::VaultError;

#[odra::module(events = [Transfer, Approval], errors = VaultError)]
pub struct MockToken {
    name: Var<String>,
    symbol: Var<String>,
    decimals: Var<u8>,
    total_supply: Var<U256>,
    balances: Mapping<Address, U256>,
    allowances: Mapping<(Address, Address), U256>,
}

#[odra::module]
impl MockToken {
    pub fn init(&mut self, name: String, symbol: String, decimals: u8) {
        self.name.set(name);
        self.symbol.set(symbol);
        self.decimals.set(decimals);
        self.total_supply.set(U256::zero());
    }

    /// Faucet mint, open to anyone
    pub fn mint(&mut self, owner: &Address, amount: &U256) {
        let supply = self.total_supply.get_or_default();
        let new_supply = match supply.checked_add(*amount) {
            Some(value) => value,
            None => self.env().revert(VaultError::MathOverflow),
        };
        self.total_supply.set(new_supply);
        let balance = self.balance_of(owner);
        self.balances.set(owner, balance + *amount);
    }

    pub fn transfer(&mut self, recipient: &Address, amount: &U256) {
        let sender = self.env().caller();
        self.move_tokens(&sender, recipient, amount);
    }

    pub fn transfer_from(&mut self, owner: &Address, recipient: &Address, amount: &U256) {
        let spender = self.env().caller();
        let allowance = self.allowance(owner, &spender);
        if allowance < *amount {
            self.env().revert(VaultError::InsufficientAllowance);
        }
        self.allowances.set(&(*owner, spender), allowance - *amount);
        self.move_tokens(owner, recipient, amount);
    }

    pub fn approve(&mut self, spender: &Address, amount: &U256) {
        let owner = self.env().caller();
        self.allowances.set(&(owner, *spender), *amount);
        self.env().emit_event(Approval {
            owner,
            spender: *spender,
            value: *amount,
        });
    }

    pub fn balance_of(&self, address: &Address) -> U256 {
        self.balances.get(address).unwrap_or_default()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.allowances.get(&(*owner, *spender)).unwrap_or_default()
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply.get_or_default()
    }

    pub fn name(&self) -> String {
        self.name.get_or_default()
    }

    pub fn symbol(&self) -> String {
        self.symbol.get_or_default()
    }

    pub fn decimals(&self) -> u8 {
        self.decimals.get_or_default()
    }
}

impl MockToken {
    fn move_tokens(&mut self, from: &Address, to: &Address, amount: &U256) {
        let from_balance = self.balance_of(from);
        if from_balance < *amount {
            self.env().revert(VaultError::InsufficientBalance);
        }
        self.balances.set(from, from_balance - *amount);
        let to_balance = self.balance_of(to);
        self.balances.set(to, to_balance + *amount);

        self.env().emit_event(Transfer {
            from: *from,
            to: *to,
            value: *amount,
        });
    }
}

#[odra::event]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

#[odra::event]
pub struct Approval {
    pub owner: Address,
    pub spender: Address,
    pub value: U256,
}

#[cfg(test)]
mod tests {
    use super::*;
    use odra::host::Deployer;

    fn deploy(env: &odra::host::HostEnv) -> MockTokenHostRef {
        MockToken::deploy(
            env,
            MockTokenInitArgs {
                name: String::from("Wrapped Ether"),
                symbol: String::from("WETH"),
                decimals: 18,
            },
        )
    }

    #[test]
    fn mint_and_transfer() {
        let env = odra_test::env();
        let mut token = deploy(&env);
        let (alice, bob) = (env.get_account(1), env.get_account(2));

        token.mint(&alice, &U256::from(100u64));
        env.set_caller(alice);
        token.transfer(&bob, &U256::from(40u64));

        assert_eq!(token.balance_of(&alice), U256::from(60u64));
        assert_eq!(token.balance_of(&bob), U256::from(40u64));
        assert_eq!(token.total_supply(), U256::from(100u64));
        assert_eq!(token.symbol(), "WETH");
    }

    #[test]
    fn transfer_from_spends_allowance() {
        let env = odra_test::env();
        let mut token = deploy(&env);
        let (alice, bob) = (env.get_account(1), env.get_account(2));
        token.mint(&alice, &U256::from(100u64));

        env.set_caller(alice);
        token.approve(&bob, &U256::from(30u64));

        env.set_caller(bob);
        assert_eq!(
            token.try_transfer_from(&alice, &bob, &U256::from(31u64)),
            Err(VaultError::InsufficientAllowance.into())
        );
        token.transfer_from(&alice, &bob, &U256::from(30u64));
        assert_eq!(token.allowance(&alice, &bob), U256::zero());
        assert_eq!(token.balance_of(&bob), U256::from(30u64));
    }

    #[test]
    fn overdraft_is_rejected() {
        let env = odra_test::env();
        let mut token = deploy(&env);
        let (alice, bob) = (env.get_account(1), env.get_account(2));

        env.set_caller(alice);
        assert_eq!(
            token.try_transfer(&bob, &U256::one()),
            Err(VaultError::InsufficientBalance.into())
        );
    }
}
