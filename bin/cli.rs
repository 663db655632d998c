//! CLI for deploying the vault and poking at a live deployment.

use odra::casper_types::U256;
use odra::host::{Deployer, HostEnv, HostRefLoader, NoArgs};
use odra::prelude::Addressable;

use odra_cli::{
    deploy::DeployScript,
    scenario::{Args, Error, Scenario, ScenarioMetadata},
    CommandArg, ContractProvider, DeployedContractsContainer, DeployerExt, OdraCli,
};

use toll_vault::math::common::WAD;
use toll_vault::oracle::{PriceOracle, PriceOracleHostRef, PriceOracleInitArgs, PRICE_DECIMALS};
use toll_vault::pool::MockLendingPool;
use toll_vault::state::InterestRateStrategy;
use toll_vault::token::{MockToken, MockTokenHostRef, MockTokenInitArgs};
use toll_vault::vault::{TollVault, TollVaultHostRef, TollVaultInitArgs};

const DEPLOY_GAS: u64 = 200_000_000_000;
const CALL_GAS: u64 = 5_000_000_000;
const TOLL_TOKENS: u64 = 100;
const MAX_PRICE_AGE_SECS: u64 = 3_600;
const ANNUAL_RATE_BPS: u32 = 500;
/// Debt asset minted into the pool so it can lend
const POOL_LIQUIDITY_TOKENS: u64 = 1_000_000;
const COLLATERAL_PRICE: u64 = 4_000;
const DEBT_PRICE: u64 = 1;
const OPEN_COLLATERAL_TOKENS: u64 = 1;

fn tokens(amount: u64) -> U256 {
    U256::from(amount) * U256::from(WAD)
}

fn quote_units(price: u64) -> U256 {
    U256::from(price) * U256::from(10u64.pow(PRICE_DECIMALS as u32))
}

/// Push the default prices for both vault assets. The caller must be the oracle admin.
fn publish_prices(env: &HostEnv, oracle: &mut PriceOracleHostRef, vault: &TollVaultHostRef) {
    env.set_gas(CALL_GAS);
    oracle.set_price(vault.collateral_token(), quote_units(COLLATERAL_PRICE));
    env.set_gas(CALL_GAS);
    oracle.set_price(vault.debt_token(), quote_units(DEBT_PRICE));
    println!(
        "Published prices: collateral {}, debt {}",
        COLLATERAL_PRICE, DEBT_PRICE
    );
}

/// Deploys the vault together with mock tokens, a price oracle and a lending pool
pub struct VaultDeployScript;

impl VaultDeployScript {
    fn deploy_token(env: &HostEnv, name: &str, symbol: &str) -> MockTokenHostRef {
        env.set_gas(DEPLOY_GAS);
        MockToken::deploy(
            env,
            MockTokenInitArgs {
                name: name.into(),
                symbol: symbol.into(),
                decimals: 18,
            },
        )
    }
}

impl DeployScript for VaultDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer,
    ) -> Result<(), odra_cli::deploy::Error> {
        if let Ok(vault) = container.contract_ref::<TollVault>(env) {
            println!("Vault already deployed at {:?}", vault.address());
            return Ok(());
        }

        let stake = Self::deploy_token(env, "Vault Membership", "STK");
        let collateral = Self::deploy_token(env, "Wrapped Ether", "WETH");
        let mut debt = Self::deploy_token(env, "Vault Dollar", "VUSD");

        let mut oracle = PriceOracle::load_or_deploy(
            env,
            PriceOracleInitArgs {
                max_price_age: MAX_PRICE_AGE_SECS,
            },
            container,
            DEPLOY_GAS,
        )?;
        let pool = MockLendingPool::load_or_deploy(env, NoArgs, container, DEPLOY_GAS)?;

        let vault = TollVault::load_or_deploy(
            env,
            TollVaultInitArgs {
                toll: tokens(TOLL_TOKENS),
                membership_token: stake.address().clone(),
                collateral_token: collateral.address().clone(),
                debt_token: debt.address().clone(),
                oracle: oracle.address().clone(),
                lending_pool: pool.address().clone(),
                strategy: InterestRateStrategy {
                    annual_rate_bps: ANNUAL_RATE_BPS,
                },
            },
            container,
            DEPLOY_GAS,
        )?;

        publish_prices(env, &mut oracle, &vault);
        let pool_address = pool.address().clone();
        env.set_gas(CALL_GAS);
        debt.mint(&pool_address, &tokens(POOL_LIQUIDITY_TOKENS));

        println!("Membership token: {:?}", stake.address());
        println!("Collateral token: {:?}", collateral.address());
        println!("Debt token: {:?}", debt.address());
        println!("Vault deployed at {:?}", vault.address());
        Ok(())
    }
}

/// Republishes the default prices, e.g. once they went stale
pub struct PublishPricesScenario;

impl Scenario for PublishPricesScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        _args: Args,
    ) -> Result<(), Error> {
        let vault = container.contract_ref::<TollVault>(env)?;
        let mut oracle = container.contract_ref::<PriceOracle>(env)?;
        publish_prices(env, &mut oracle, &vault);
        Ok(())
    }
}

impl ScenarioMetadata for PublishPricesScenario {
    const NAME: &'static str = "publish-prices";
    const DESCRIPTION: &'static str = "Publishes the default collateral and debt prices";
}

/// Mints the toll and some collateral to the caller, enters and opens a position
pub struct OpenPositionScenario;

impl Scenario for OpenPositionScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        _args: Args,
    ) -> Result<(), Error> {
        let mut vault = container.contract_ref::<TollVault>(env)?;
        let vault_address = vault.address().clone();
        let caller = env.caller();

        if !vault.accounts(caller).is_member() {
            let toll = vault.toll();
            let mut stake = MockToken::load(env, vault.membership_token());
            env.set_gas(CALL_GAS);
            stake.mint(&caller, &toll);
            env.set_gas(CALL_GAS);
            stake.approve(&vault_address, &toll);
            env.set_gas(CALL_GAS);
            vault.enter();
            println!("Entered with toll {}", toll);
        }

        let amount = tokens(OPEN_COLLATERAL_TOKENS);
        let mut collateral = MockToken::load(env, vault.collateral_token());
        env.set_gas(CALL_GAS);
        collateral.mint(&caller, &amount);
        env.set_gas(CALL_GAS);
        collateral.approve(&vault_address, &amount);
        env.set_gas(CALL_GAS);
        vault.open(amount);

        let (debt, locked) = vault.balance_of(caller);
        println!("Opened position: collateral {}, owed debt {}", locked, debt);
        Ok(())
    }
}

impl ScenarioMetadata for OpenPositionScenario {
    const NAME: &'static str = "open-position";
    const DESCRIPTION: &'static str = "Enters the vault if needed and opens a position with one collateral token";
}

/// Moves the global interest index to the current block time
pub struct AccrueInterestScenario;

impl Scenario for AccrueInterestScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        _args: Args,
    ) -> Result<(), Error> {
        let mut vault = container.contract_ref::<TollVault>(env)?;
        env.set_gas(CALL_GAS);
        vault.accrue_interest();
        println!(
            "Interest index {} at {}",
            vault.interest_index(),
            vault.last_accrual_time()
        );
        Ok(())
    }
}

impl ScenarioMetadata for AccrueInterestScenario {
    const NAME: &'static str = "accrue-interest";
    const DESCRIPTION: &'static str = "Accrues interest on the vault's global index";
}

/// Prints the caller's position and its health
pub struct CheckHealthScenario;

impl Scenario for CheckHealthScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        _args: Args,
    ) -> Result<(), Error> {
        let vault = container.contract_ref::<TollVault>(env)?;
        let caller = env.caller();

        let account = vault.accounts(caller);
        let (debt, collateral) = vault.balance_of(caller);
        println!("Toll staked: {}", account.toll);
        println!("Collateral: {}, owed debt: {}", collateral, debt);
        if account.has_position() {
            let health = vault.health(caller);
            println!(
                "Collateral value: {}, debt value: {}, health factor (wad): {}",
                health.collateral_value, health.debt_value, health.health_factor
            );
            println!("Liquidatable: {}", health.is_liquidatable());
        }
        Ok(())
    }
}

impl ScenarioMetadata for CheckHealthScenario {
    const NAME: &'static str = "check-health";
    const DESCRIPTION: &'static str = "Shows the caller's position and health factor";
}

pub fn main() {
    OdraCli::new()
        .about("CLI tool for the toll vault")
        .deploy(VaultDeployScript)
        .contract::<TollVault>()
        .contract::<PriceOracle>()
        .contract::<MockLendingPool>()
        .scenario(PublishPricesScenario)
        .scenario(OpenPositionScenario)
        .scenario(AccrueInterestScenario)
        .scenario(CheckHealthScenario)
        .build()
        .run();
}
