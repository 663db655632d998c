#![allow(clippy::arithmetic_side_effects)]
#![cfg_attr(not(test), no_std)]

//! A toll-gated collateralized debt vault for the casper blockchain.

extern crate alloc;

pub mod error;
pub mod external;
pub mod health;
pub mod math;
pub mod oracle;
pub mod pool;
pub mod state;
pub mod token;
pub mod vault;

pub use error::VaultError;
pub use vault::TollVault;
