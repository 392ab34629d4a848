//! Deploy the lending protocol to Casper livenet/testnet using Odra livenet environment.
//!
//! Usage:
//!   cargo run --bin deploy_livenet --release
//!
//! Requires .env file with:
//!   ODRA_CASPER_LIVENET_SECRET_KEY_PATH=/path/to/secret_key.pem
//!   ODRA_CASPER_LIVENET_NODE_ADDRESS=https://node.testnet.casper.network
//!   ODRA_CASPER_LIVENET_CHAIN_NAME=casper-test
//!   ODRA_CASPER_LIVENET_PAYMENT_AMOUNT=200000000000
//!
//! Optional:
//!   INITIAL_BTC_PRICE=5000000000000   (feed units, default $50,000 at 8 decimals)
//!   FEED_DECIMALS=8
//!   LEDGER_LIQUIDITY=1000000          (whole tokens minted to the ledger)

use odra::casper_types::U256;
use odra::host::Deployer;
use odra::prelude::*;

use btc_lending_contracts::loan_ledger::{LoanLedger, LoanLedgerInitArgs};
use btc_lending_contracts::price_feed::{ManualPriceFeed, ManualPriceFeedInitArgs};
use btc_lending_contracts::stable_token::{StableToken, StableTokenInitArgs};

/// Borrowed-token decimals; matches native motes so USD values line up with collateral units
const TOKEN_DECIMALS: u8 = 9;

fn env_or<T: core::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn main() {
    // Load environment from .env file
    dotenv::dotenv().ok();

    println!("=== BTC Lending Livenet Deployment ===");
    println!();

    // Initialize Odra livenet environment
    let env = odra_casper_livenet_env::env();

    // Configure payment amount for deployments/calls (required for Casper 2.0 txs)
    let payment_amount: u64 = env_or("ODRA_CASPER_LIVENET_PAYMENT_AMOUNT", 200_000_000_000);
    env.set_gas(payment_amount);

    let deployer = env.caller();
    println!("Deployer: {:?}", deployer);
    println!();

    let feed_decimals: u8 = env_or("FEED_DECIMALS", 8);
    let initial_price: i64 = env_or("INITIAL_BTC_PRICE", 5_000_000_000_000);
    let liquidity_whole: u64 = env_or("LEDGER_LIQUIDITY", 1_000_000);
    let liquidity = U256::from(liquidity_whole) * U256::from(10u64).pow(U256::from(TOKEN_DECIMALS));

    // 1. Price feed
    println!("Deploying ManualPriceFeed...");
    let feed = ManualPriceFeed::deploy(
        &env,
        ManualPriceFeedInitArgs {
            decimals: feed_decimals,
            initial_answer: initial_price,
        },
    );
    let feed_addr = feed.address().clone();
    println!("ManualPriceFeed deployed at: {:?}", feed_addr);

    // 2. Borrowed asset
    println!("Deploying StableToken...");
    let mut token = StableToken::deploy(
        &env,
        StableTokenInitArgs {
            name: String::from("Lending USD"),
            symbol: String::from("lUSD"),
            decimals: TOKEN_DECIMALS,
        },
    );
    let token_addr = token.address().clone();
    println!("StableToken deployed at: {:?}", token_addr);

    // 3. Ledger
    println!("Deploying LoanLedger...");
    let ledger = LoanLedger::deploy(
        &env,
        LoanLedgerInitArgs {
            price_oracle: feed_addr,
            borrowed_token: token_addr,
        },
    );
    let ledger_addr = ledger.address().clone();
    println!("LoanLedger deployed at: {:?}", ledger_addr);
    println!();

    // 4. Borrowable liquidity
    println!("Minting {} lUSD to LoanLedger...", liquidity_whole);
    token.mint(ledger_addr, liquidity);
    println!("Done.");

    println!();
    println!("=== Deployment Complete ===");
    println!();
    println!("Contract Addresses:");
    println!("  ManualPriceFeed:  {:?}", feed_addr);
    println!("  StableToken:      {:?}", token_addr);
    println!("  LoanLedger:       {:?}", ledger_addr);
}
