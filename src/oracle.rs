use odra::casper_types::U256;
use odra::prelude::*;

use crate::error::VaultError;
use crate::state::MILLIS_PER_SECOND;

/// Decimals of every price published by the oracle (1e8 = one quote unit)
pub const PRICE_DECIMALS: u8 = 8;

/// Admin-pushed price feed.
///
/// Prices are kept per asset together with their publish time. Reads revert on
/// unknown assets, and on prices older than `max_price_age` seconds unless the
/// age limit is zero.
#[odra::module(events = [PriceUpdated, AdminTransferred], errors = VaultError)]
pub struct PriceOracle {
    prices: Mapping<Address, U256>,
    publish_times: Mapping<Address, u64>,
    admin: Var<Address>,
    max_price_age: Var<u64>,
}

#[odra::module]
impl PriceOracle {
    /// Initialize the oracle, the deployer becomes admin
    pub fn init(&mut self, max_price_age: u64) {
        self.admin.set(self.env().caller());
        self.max_price_age.set(max_price_age);
    }

    /// Publish a price for an asset
    pub fn set_price(&mut self, asset: Address, price: U256) {
        let caller = self.ensure_admin();
        if price.is_zero() {
            self.env().revert(VaultError::InvalidPrice);
        }

        let now = self.env().get_block_time() / MILLIS_PER_SECOND;
        self.prices.set(&asset, price);
        self.publish_times.set(&asset, now);

        self.env().emit_event(PriceUpdated {
            asset,
            price,
            publisher: caller,
            publish_time: now,
        });
    }

    /// Price of one unit of `asset`
    pub fn get_price(&self, asset: &Address) -> U256 {
        let price = match self.prices.get(asset) {
            Some(price) => price,
            None => self.env().revert(VaultError::InvalidPrice),
        };
        let max_age = self.max_price_age.get_or_default();
        if max_age > 0 {
            let now = self.env().get_block_time() / MILLIS_PER_SECOND;
            let published = self.publish_times.get(asset).unwrap_or_default();
            if now.saturating_sub(published) > max_age {
                self.env().revert(VaultError::StalePrice);
            }
        }
        price
    }

    /// Publish time of the latest price, if any
    pub fn last_update(&self, asset: Address) -> Option<u64> {
        self.publish_times.get(&asset)
    }

    /// Transfer admin rights
    pub fn transfer_admin(&mut self, new_admin: Address) {
        let previous_admin = self.ensure_admin();
        self.admin.set(new_admin);

        self.env().emit_event(AdminTransferred {
            previous_admin,
            new_admin,
        });
    }

    pub fn admin(&self) -> Option<Address> {
        self.admin.get()
    }
}

impl PriceOracle {
    fn ensure_admin(&self) -> Address {
        let caller = self.env().caller();
        if self.admin.get() != Some(caller) {
            self.env().revert(VaultError::Unauthorized);
        }
        caller
    }
}

#[odra::event]
pub struct PriceUpdated {
    pub asset: Address,
    pub price: U256,
    pub publisher: Address,
    pub publish_time: u64,
}

#[odra::event]
pub struct AdminTransferred {
    pub previous_admin: Address,
    pub new_admin: Address,
}
