use std::collections::HashMap;
use std::env;

use config::{Config, ConfigError, File};
use ethers::types::Address;
use serde::Deserialize;

use crate::pricing::QuoteError;

#[derive(Debug, Deserialize, Clone)]
pub struct Rpc {
    pub http_url: String,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_base_chain_id")]
    pub expected_chain_id: u64,
}

fn default_request_timeout_seconds() -> u64 {
    10
}

fn default_base_chain_id() -> u64 {
    8453 // Base mainnet
}

#[derive(Debug, Deserialize, Clone)]
pub struct Discord {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    #[serde(default = "default_false")]
    pub members_intent: bool,
    #[serde(default = "default_false")]
    pub presences_intent: bool,
    #[serde(default = "default_false")]
    pub message_content_intent: bool,
}

fn default_api_base_url() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

fn default_false() -> bool {
    false
}

impl Default for Discord {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            gateway_url: default_gateway_url(),
            members_intent: false,
            presences_intent: false,
            message_content_intent: false,
        }
    }
}

/// Presence activity kind shown before the status text. Anything else in
/// the config file fails deserialization, so an invalid kind is rejected at
/// startup rather than on the first presence push.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Watching,
    Playing,
}

impl ActivityKind {
    /// Discord gateway activity type code.
    pub fn type_code(self) -> u8 {
        match self {
            ActivityKind::Playing => 0,
            ActivityKind::Watching => 3,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Loop {
    #[serde(default = "default_update_interval_seconds")]
    pub update_interval_seconds: u64,
    #[serde(default = "default_activity")]
    pub activity: ActivityKind,
}

fn default_update_interval_seconds() -> u64 {
    15
}

fn default_activity() -> ActivityKind {
    ActivityKind::Watching
}

impl Default for Loop {
    fn default() -> Self {
        Self {
            update_interval_seconds: default_update_interval_seconds(),
            activity: default_activity(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    pub address: Address,
    pub decimals: u8,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    ConstantProduct,
    Concentrated,
    Aerodrome,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PoolConfig {
    pub address: Address,
    pub kind: PoolKind,
    /// Token names (keys into `[tokens]`) in the pool's own ordering.
    pub token0: String,
    pub token1: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HopConfig {
    /// Key into `[pools]`.
    pub pool: String,
    /// Key into `[tokens]`; one whole unit of this token is quoted through
    /// the pool.
    pub token_in: String,
    /// Flip the hop from "out per unit in" to "in per unit out".
    #[serde(default = "default_false")]
    pub invert: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TickerConfig {
    /// Display prefix, e.g. "AERO" -> "AERO MCap: $12.3M".
    pub name: String,
    /// Key into `[tokens]`; the token whose supply enters the market cap.
    pub token: String,
    /// Environment variable holding this ticker's bot credential.
    pub bot_token_env: String,
    pub route: Vec<HopConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub rpc: Rpc,
    #[serde(default)]
    pub discord: Discord,
    #[serde(default, rename = "loop")]
    pub poll: Loop,
    pub tokens: HashMap<String, TokenConfig>,
    pub pools: HashMap<String, PoolConfig>,
    pub tickers: Vec<TickerConfig>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_file("Config.toml")
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder().add_source(File::with_name(path)).build()?;

        let mut settings: Self = s.try_deserialize()?;

        // Environment variable overrides
        if let Ok(url) = env::var("TICKER_RPC_HTTP_URL") {
            if !url.trim().is_empty() {
                settings.rpc.http_url = url;
            }
        }
        if let Ok(base) = env::var("TICKER_DISCORD_API_BASE") {
            if !base.trim().is_empty() {
                settings.discord.api_base_url = base;
            }
        }

        validate_references(&settings)?;

        Ok(settings)
    }

    pub fn token_decimals(&self, name: &str) -> Result<u8, QuoteError> {
        self.tokens
            .get(name)
            .map(|t| t.decimals)
            .ok_or_else(|| QuoteError::UnknownToken(name.to_string()))
    }

    pub fn ticker(&self, name: &str) -> Option<&TickerConfig> {
        self.tickers.iter().find(|t| t.name == name)
    }
}

/// Reject dangling route/token references at load time. A typo in a pool
/// name surfaces as a startup error instead of a skipped tick every 15
/// seconds.
fn validate_references(settings: &Settings) -> Result<(), ConfigError> {
    for pool in settings.pools.values() {
        for token in [&pool.token0, &pool.token1] {
            if !settings.tokens.contains_key(token) {
                return Err(ConfigError::Message(format!(
                    "pool {:?} references unknown token '{}'",
                    pool.address, token
                )));
            }
        }
    }

    for ticker in &settings.tickers {
        if !settings.tokens.contains_key(&ticker.token) {
            return Err(ConfigError::Message(format!(
                "ticker '{}' references unknown token '{}'",
                ticker.name, ticker.token
            )));
        }
        if ticker.route.is_empty() {
            return Err(ConfigError::Message(format!(
                "ticker '{}' has an empty pricing route",
                ticker.name
            )));
        }
        for hop in &ticker.route {
            let pool = settings.pools.get(&hop.pool).ok_or_else(|| {
                ConfigError::Message(format!(
                    "ticker '{}' references unknown pool '{}'",
                    ticker.name, hop.pool
                ))
            })?;
            if !settings.tokens.contains_key(&hop.token_in) {
                return Err(ConfigError::Message(format!(
                    "ticker '{}' references unknown token '{}'",
                    ticker.name, hop.token_in
                )));
            }
            if hop.token_in != pool.token0 && hop.token_in != pool.token1 {
                return Err(ConfigError::Message(format!(
                    "ticker '{}': token '{}' is not a side of pool '{}'",
                    ticker.name, hop.token_in, hop.pool
                )));
            }
        }
    }

    Ok(())
}
