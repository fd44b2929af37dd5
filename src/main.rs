//! Token Exchange - Replay Driver
//!
//! Applies a JSON replay file block by block through the exchange and prints
//! the resulting state root together with every account's balances and
//! frozen funds in display units.
//!
//! Genesis `coins` are base units; `units` are display amounts scaled by the
//! configured decimals of each denom.
//!
//! ```json
//! {
//!   "accounts": [{"address": "alice", "coins": [{"denom": "gard", "amount": "1000"}], "units": [{"denom": "apple", "amount": "1.5"}]}],
//!   "blocks": [{"time": 1700000000, "txs": [{"type": "create_order", ...}]}]
//! }
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::info;

use token_exchange::config::ExchangeConfig;
use token_exchange::escrow;
use token_exchange::logging::init_tracing;
use token_exchange::types::{Address, Coin, Denom, Msg};
use token_exchange::{ExchangeApp, TxOutcome};

#[derive(Parser, Debug)]
#[command(name = "token-exchange", about = "Replay exchange transactions deterministically")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON replay file
    #[arg(short, long)]
    input: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Replay {
    #[serde(default)]
    accounts: Vec<GenesisAccount>,
    #[serde(default)]
    blocks: Vec<ReplayBlock>,
}

#[derive(Debug, Deserialize)]
struct GenesisAccount {
    address: Address,
    #[serde(default)]
    coins: Vec<Coin>,
    #[serde(default)]
    units: Vec<DisplayAmount>,
}

#[derive(Debug, Deserialize)]
struct DisplayAmount {
    denom: Denom,
    amount: String,
}

#[derive(Debug, Deserialize)]
struct ReplayBlock {
    time: u64,
    #[serde(default)]
    txs: Vec<Msg>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = ExchangeConfig::load(args.config.as_deref())?;
    init_tracing(cfg.log.json, &cfg.log.filter).context("failed to initialize tracing")?;

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let replay: Replay = serde_json::from_str(&raw).context("failed to parse replay file")?;

    let mut app = ExchangeApp::new(cfg.params);
    for account in &replay.accounts {
        let mut coins = account.coins.clone();
        for display in &account.units {
            coins.push(cfg.parse_display(&display.denom, &display.amount)?);
        }
        for coin in &coins {
            app.fund(&account.address, coin)
                .with_context(|| format!("failed to fund {}", account.address))?;
        }
    }
    app.begin_block(0, replay.blocks.first().map_or(0, |b| b.time));
    app.commit().context("genesis state is inconsistent")?;

    let mut last_receipt = None;
    for (index, block) in replay.blocks.iter().enumerate() {
        let height = index as u64 + 1;
        app.begin_block(height, block.time);
        for msg in &block.txs {
            match app.deliver_tx(msg)? {
                TxOutcome::Accepted(result) => {
                    for event in &result.events {
                        info!(
                            height,
                            action = %event.action,
                            order_id = event.order_id,
                            owner = %event.owner,
                            "event"
                        );
                    }
                }
                TxOutcome::Rejected { .. } => {}
            }
        }
        let receipt = app
            .commit()
            .with_context(|| format!("commit failed at height {}", height))?;
        last_receipt = Some(receipt);
    }

    let store = app.committed_store();
    println!("state root: {}", hex::encode(store.state_root()));
    if let Some(hash) = last_receipt.as_ref().and_then(|r| r.receipt_hash()) {
        println!("last receipt: {}", hex::encode(hash));
    }

    for account in &replay.accounts {
        println!("{}", account.address);
        for coin in app.keeper().bank().balances(store, &account.address)? {
            println!("  spendable {}", cfg.display(&coin));
        }
        for coin in escrow::frozen_by_owner(store, &account.address)? {
            println!("  frozen    {}", cfg.display(&coin));
        }
    }

    Ok(())
}

