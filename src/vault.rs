//! Collateralized debt vault.
//!
//! Members pay a toll in the membership token, then open one position each:
//! collateral is supplied to the lending pool and half of its value is lent
//! out in the debt asset. Debt grows with a global interest index, and a
//! position whose debt outgrows the liquidation threshold can be taken over
//! by anyone who repays it in full.
//!
//! Every mutating entry point validates and writes its own storage before any
//! token or pool call, so a reentrant call sees the updated state.

use odra::casper_types::U256;
use odra::prelude::*;
use odra::ContractRef;

use crate::error::VaultError;
use crate::external::{FungibleTokenContractRef, LendingPoolContractRef, PriceFeedContractRef};
use crate::health::{self, HealthSnapshot, PriceQuote};
use crate::math::{Decimal, Rate};
use crate::state::{AccountInfo, InterestRateStrategy, InterestState, MILLIS_PER_SECOND};

#[odra::module(
    events = [
        Entered,
        Exited,
        InterestAccrued,
        PositionOpened,
        PositionClosed,
        PositionLiquidated
    ],
    errors = VaultError
)]
pub struct TollVault {
    // Configuration
    toll: Var<U256>,
    membership_token: Var<Address>,
    collateral_token: Var<Address>,
    debt_token: Var<Address>,
    oracle: Var<Address>,
    lending_pool: Var<Address>,

    // Global interest state
    interest_index: Var<U256>,
    last_accrual_time: Var<u64>,
    rate_per_second: Var<U256>,

    accounts: Mapping<Address, AccountInfo>,
}

#[odra::module]
impl TollVault {
    // ===========================================================================
    // CONSTRUCTOR
    // ===========================================================================

    #[allow(clippy::too_many_arguments)]
    pub fn init(
        &mut self,
        toll: U256,
        membership_token: Address,
        collateral_token: Address,
        debt_token: Address,
        oracle: Address,
        lending_pool: Address,
        strategy: InterestRateStrategy,
    ) {
        if toll.is_zero() {
            self.env().revert(VaultError::InvalidConfig);
        }
        let rate_per_second = self.or_revert(strategy.rate_per_second());

        self.toll.set(toll);
        self.membership_token.set(membership_token);
        self.collateral_token.set(collateral_token);
        self.debt_token.set(debt_token);
        self.oracle.set(oracle);
        self.lending_pool.set(lending_pool);

        self.store_interest(&InterestState::new(rate_per_second, self.now()));
    }

    // ===========================================================================
    // MEMBERSHIP
    // ===========================================================================

    /// Stake the toll and become a member
    pub fn enter(&mut self) {
        let caller = self.env().caller();
        let mut account = self.account(&caller);
        if account.is_member() {
            self.env().revert(VaultError::AlreadyMember);
        }

        let toll = self.toll.get_or_default();
        account.toll = toll;
        self.accounts.set(&caller, account);

        let vault = self.env().self_address();
        self.token(&self.membership_token)
            .transfer_from(&caller, &vault, &toll);

        log::debug!("{:?} entered with toll {}", caller, toll);
        self.env().emit_event(Entered { account: caller, toll });
    }

    /// Take the toll back. Only possible without an open position.
    pub fn exit(&mut self) {
        let caller = self.env().caller();
        let mut account = self.account(&caller);
        if !account.is_member() {
            self.env().revert(VaultError::NotMember);
        }
        if account.has_position() {
            self.env().revert(VaultError::PositionAlreadyOpen);
        }

        let toll = account.toll;
        account.toll = U256::zero();
        self.accounts.set(&caller, account);

        self.token(&self.membership_token).transfer(&caller, &toll);

        log::debug!("{:?} exited, toll {} returned", caller, toll);
        self.env().emit_event(Exited { account: caller, toll });
    }

    // ===========================================================================
    // INTEREST
    // ===========================================================================

    /// Bring the global interest index up to the current block time.
    /// Permissionless and a no-op when called twice in the same second.
    pub fn accrue_interest(&mut self) {
        self.accrue();
    }

    // ===========================================================================
    // POSITIONS
    // ===========================================================================

    /// Lock `collateral_amount` and borrow against it
    pub fn open(&mut self, collateral_amount: U256) {
        let caller = self.env().caller();
        let interest = self.accrue();

        let mut account = self.account(&caller);
        if !account.is_member() {
            self.env().revert(VaultError::NotMember);
        }
        if account.has_position() {
            self.env().revert(VaultError::PositionAlreadyOpen);
        }
        if collateral_amount.is_zero() {
            self.env().revert(VaultError::InvalidAmount);
        }

        let quote = self.price_quote();
        let borrow_amount = self.or_revert(health::borrow_amount(collateral_amount, &quote));
        if borrow_amount.is_zero() {
            self.env().revert(VaultError::BorrowTooSmall);
        }

        self.or_revert(account.open_position(collateral_amount, borrow_amount, interest.index));
        self.accounts.set(&caller, account);

        let vault = self.env().self_address();
        let pool_address = self.config_address(&self.lending_pool);
        let collateral_asset = self.config_address(&self.collateral_token);
        let debt_asset = self.config_address(&self.debt_token);

        let mut collateral = self.token(&self.collateral_token);
        collateral.transfer_from(&caller, &vault, &collateral_amount);
        collateral.approve(&pool_address, &collateral_amount);

        let mut pool = self.pool();
        pool.supply(&collateral_asset, &collateral_amount);
        pool.borrow(&debt_asset, &borrow_amount);

        self.token(&self.debt_token).transfer(&caller, &borrow_amount);

        log::info!(
            "{:?} opened position: collateral {}, borrowed {}",
            caller,
            collateral_amount,
            borrow_amount
        );
        self.env().emit_event(PositionOpened {
            account: caller,
            collateral_amount,
            borrow_amount,
            entry_index: interest.raw_index(),
        });
    }

    /// Repay the whole owed debt and take the collateral back
    pub fn close(&mut self) {
        let caller = self.env().caller();
        let interest = self.accrue();

        let mut account = self.account(&caller);
        if !account.has_position() {
            self.env().revert(VaultError::NoOpenPosition);
        }
        let owed = self.or_revert(account.current_debt(interest.index));
        self.ensure_can_repay(&caller, owed);

        let collateral_amount = self.or_revert(account.clear_position());
        self.accounts.set(&caller, account);

        self.settle(&caller, owed, collateral_amount);

        log::info!("{:?} closed position, repaid {}", caller, owed);
        self.env().emit_event(PositionClosed {
            account: caller,
            repaid: owed,
            collateral_amount,
        });
    }

    // ===========================================================================
    // LIQUIDATION
    // ===========================================================================

    /// Repay an unhealthy position in full and seize all of its collateral
    pub fn liquidate(&mut self, account: Address) {
        let liquidator = self.env().caller();
        let interest = self.accrue();

        let mut info = self.account(&account);
        if !info.has_position() {
            self.env().revert(VaultError::NoOpenPosition);
        }
        let owed = self.or_revert(info.current_debt(interest.index));
        let quote = self.price_quote();
        let snapshot = self.or_revert(health::evaluate(info.collateral_amount, owed, &quote));
        if !snapshot.is_liquidatable() {
            self.env().revert(VaultError::NotLiquidatable);
        }
        self.ensure_can_repay(&liquidator, owed);

        let collateral_amount = self.or_revert(info.clear_position());
        self.accounts.set(&account, info);

        self.settle(&liquidator, owed, collateral_amount);

        log::info!(
            "{:?} liquidated {:?}: repaid {}, seized {}",
            liquidator,
            account,
            owed,
            collateral_amount
        );
        self.env().emit_event(PositionLiquidated {
            account,
            liquidator,
            repaid: owed,
            collateral_amount,
        });
    }

    // ===========================================================================
    // QUERY FUNCTIONS
    // ===========================================================================

    /// Owed debt and locked collateral, with interest projected to now
    pub fn balance_of(&self, account: Address) -> (U256, U256) {
        let info = self.account(&account);
        let index = self.or_revert(self.interest_state().projected_index(self.now()));
        let debt = self.or_revert(info.current_debt(index));
        (debt, info.collateral_amount)
    }

    pub fn accounts(&self, account: Address) -> AccountInfo {
        self.account(&account)
    }

    /// Valuation of the account's position at current prices
    pub fn health(&self, account: Address) -> HealthSnapshot {
        let (debt, collateral_amount) = self.balance_of(account);
        let quote = self.price_quote();
        self.or_revert(health::evaluate(collateral_amount, debt, &quote))
    }

    pub fn is_liquidatable(&self, account: Address) -> bool {
        self.account(&account).has_position() && self.health(account).is_liquidatable()
    }

    pub fn interest_index(&self) -> U256 {
        self.interest_index.get_or_default()
    }

    pub fn last_accrual_time(&self) -> u64 {
        self.last_accrual_time.get_or_default()
    }

    pub fn rate_per_second(&self) -> U256 {
        self.rate_per_second.get_or_default()
    }

    pub fn toll(&self) -> U256 {
        self.toll.get_or_default()
    }

    pub fn membership_token(&self) -> Address {
        self.config_address(&self.membership_token)
    }

    pub fn collateral_token(&self) -> Address {
        self.config_address(&self.collateral_token)
    }

    pub fn debt_token(&self) -> Address {
        self.config_address(&self.debt_token)
    }

    pub fn oracle(&self) -> Address {
        self.config_address(&self.oracle)
    }

    pub fn lending_pool(&self) -> Address {
        self.config_address(&self.lending_pool)
    }
}

// ===========================================================================
// HELPER FUNCTIONS
// ===========================================================================

impl TollVault {
    fn now(&self) -> u64 {
        self.env().get_block_time() / MILLIS_PER_SECOND
    }

    fn or_revert<T>(&self, result: Result<T, VaultError>) -> T {
        match result {
            Ok(value) => value,
            Err(error) => self.env().revert(error),
        }
    }

    fn config_address(&self, slot: &Var<Address>) -> Address {
        match slot.get() {
            Some(address) => address,
            None => self.env().revert(VaultError::InvalidConfig),
        }
    }

    fn account(&self, account: &Address) -> AccountInfo {
        self.accounts
            .get(account)
            .unwrap_or_else(AccountInfo::empty)
    }

    fn interest_state(&self) -> InterestState {
        InterestState {
            index: Decimal::from_scaled_val(self.interest_index.get_or_default()),
            last_accrual_time: self.last_accrual_time.get_or_default(),
            rate_per_second: Rate::from_scaled_val(self.rate_per_second.get_or_default()),
        }
    }

    fn store_interest(&mut self, state: &InterestState) {
        self.interest_index.set(state.raw_index());
        self.last_accrual_time.set(state.last_accrual_time);
        self.rate_per_second.set(state.rate_per_second.to_scaled_val());
    }

    fn accrue(&mut self) -> InterestState {
        let mut state = self.interest_state();
        let now = self.now();
        if self.or_revert(state.accrue(now)) {
            self.store_interest(&state);
            log::debug!("interest index moved to {} at {}", state.index, now);
            self.env().emit_event(InterestAccrued {
                interest_index: state.raw_index(),
                timestamp: now,
            });
        }
        state
    }

    fn price_quote(&self) -> PriceQuote {
        let feed = PriceFeedContractRef::new(self.env(), self.config_address(&self.oracle));
        let quote = PriceQuote {
            collateral_price: feed.get_price(&self.config_address(&self.collateral_token)),
            debt_price: feed.get_price(&self.config_address(&self.debt_token)),
        };
        self.or_revert(quote.validate());
        quote
    }

    fn token(&self, slot: &Var<Address>) -> FungibleTokenContractRef {
        FungibleTokenContractRef::new(self.env(), self.config_address(slot))
    }

    fn pool(&self) -> LendingPoolContractRef {
        LendingPoolContractRef::new(self.env(), self.config_address(&self.lending_pool))
    }

    /// The payer must have approved and hold at least `owed` of the debt asset.
    fn ensure_can_repay(&self, payer: &Address, owed: U256) {
        let vault = self.env().self_address();
        let debt = self.token(&self.debt_token);
        if debt.allowance(payer, &vault) < owed || debt.balance_of(payer) < owed {
            self.env().revert(VaultError::InsufficientRepayment);
        }
    }

    /// Pull `owed` from the payer, clear the pool borrow and hand the collateral to the payer.
    fn settle(&mut self, payer: &Address, owed: U256, collateral_amount: U256) {
        let vault = self.env().self_address();
        let pool_address = self.config_address(&self.lending_pool);
        let collateral_asset = self.config_address(&self.collateral_token);
        let debt_asset = self.config_address(&self.debt_token);

        let mut debt = self.token(&self.debt_token);
        debt.transfer_from(payer, &vault, &owed);
        debt.approve(&pool_address, &owed);

        let mut pool = self.pool();
        pool.repay(&debt_asset, &owed);
        pool.withdraw(&collateral_asset, &collateral_amount);

        self.token(&self.collateral_token)
            .transfer(payer, &collateral_amount);
    }
}

// ===========================================================================
// EVENTS
// ===========================================================================

#[odra::event]
pub struct Entered {
    pub account: Address,
    pub toll: U256,
}

#[odra::event]
pub struct Exited {
    pub account: Address,
    pub toll: U256,
}

#[odra::event]
pub struct InterestAccrued {
    pub interest_index: U256,
    pub timestamp: u64,
}

#[odra::event]
pub struct PositionOpened {
    pub account: Address,
    pub collateral_amount: U256,
    pub borrow_amount: U256,
    pub entry_index: U256,
}

#[odra::event]
pub struct PositionClosed {
    pub account: Address,
    pub repaid: U256,
    pub collateral_amount: U256,
}

#[odra::event]
pub struct PositionLiquidated {
    pub account: Address,
    pub liquidator: Address,
    pub repaid: U256,
    pub collateral_amount: U256,
}
