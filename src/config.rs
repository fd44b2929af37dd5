//! Layered configuration for the exchange node.
//!
//! Configuration is loaded in layers with increasing priority:
//! 1. Compiled-in defaults (one-supply-unit fill threshold, pretty `info` logs)
//! 2. TOML configuration file (if provided)
//! 3. Environment variable overrides (prefix `EXCHANGE_`, nested with `__`)
//!
//! ```toml
//! [params.fill_threshold]
//! policy = "fixed"
//! amount = 100
//!
//! [[denoms]]
//! denom = "gard"
//! decimals = 6
//!
//! [log]
//! json = true
//! filter = "token_exchange=debug"
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::keeper::ExchangeParams;
use crate::types::amount::{format_units_trimmed, parse_units, MAX_DECIMALS};
use crate::types::{Coin, Denom};

fn default_filter() -> String {
    "info".to_string()
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExchangeConfig {
    /// Module parameters
    #[serde(default)]
    pub params: ExchangeParams,
    /// Display metadata per denomination
    #[serde(default)]
    pub denoms: Vec<DenomMetadata>,
    /// Logging output
    #[serde(default)]
    pub log: LogConfig,
}

/// Display decimals of one denomination.
///
/// Only used to render and parse human amounts; state transitions work in
/// base units.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DenomMetadata {
    pub denom: Denom,
    pub decimals: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// JSON lines instead of pretty output
    #[serde(default)]
    pub json: bool,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            json: false,
            filter: default_filter(),
        }
    }
}

impl ExchangeConfig {
    /// Load configuration using layered sources, then [`validate`](Self::validate).
    ///
    /// Environment overrides use the `EXCHANGE_` prefix and `__` as the
    /// nesting separator, e.g. `EXCHANGE_LOG__JSON=true`.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            // ── Layer 1: compiled-in defaults ───────────────────────
            .set_default("params.fill_threshold.policy", "one_supply_unit")?
            .set_default("log.json", false)?
            .set_default("log.filter", default_filter())?;

        // ── Layer 2: TOML file ─────────────────────────────────────
        if let Some(path) = config_path {
            let path_str = path.to_str().context("config path is not valid UTF-8")?;
            builder = builder.add_source(File::with_name(path_str).required(true));
        }

        // ── Layer 3: env var overrides ─────────────────────────────
        builder = builder.add_source(
            Environment::with_prefix("EXCHANGE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: ExchangeConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject invalid denomination metadata.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for meta in &self.denoms {
            meta.denom
                .validate()
                .with_context(|| format!("denom metadata entry {}", meta.denom))?;
            if meta.decimals > MAX_DECIMALS {
                bail!(
                    "denom {} has {} decimals, maximum is {}",
                    meta.denom,
                    meta.decimals,
                    MAX_DECIMALS
                );
            }
            if !seen.insert(meta.denom.clone()) {
                bail!("denom {} configured twice", meta.denom);
            }
        }
        Ok(())
    }

    /// Display decimals of `denom`; 0 when not configured.
    pub fn decimals(&self, denom: &Denom) -> u32 {
        self.denoms
            .iter()
            .find(|meta| &meta.denom == denom)
            .map_or(0, |meta| meta.decimals)
    }

    /// Parse a display amount such as `"1.5"` into a base-unit coin.
    pub fn parse_display(&self, denom: &Denom, amount: &str) -> Result<Coin> {
        let decimals = self.decimals(denom);
        match parse_units(amount, decimals) {
            Some(base) => Ok(Coin {
                denom: denom.clone(),
                amount: base,
            }),
            None => bail!("{} is not a valid {} amount with {} decimals", amount, denom, decimals),
        }
    }

    /// Render a coin in display units, falling back to base units.
    pub fn display(&self, coin: &Coin) -> String {
        match format_units_trimmed(coin.amount, self.decimals(&coin.denom)) {
            Some(units) => format!("{} {}", units, coin.denom),
            None => coin.to_string(),
        }
    }
}
