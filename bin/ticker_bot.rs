//! # Ticker Bot
//!
//! Runs one configured market-cap ticker: prices its token through the
//! configured pool route every polling interval and publishes the result as
//! the bot's per-guild nickname and status text.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin ticker_bot -- --ticker AERO
//! ```
//!
//! The ticker name selects an entry from `Config.toml`; with a single
//! configured ticker the flag can be omitted. The bot credential is read
//! from the environment variable named by the ticker's `bot_token_env`.
//! Press Ctrl+C to stop.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use tokio::signal;

use mcap_ticker::{
    discord::{DiscordChat, DiscordGateway, DiscordRest},
    rpc,
    settings::Settings,
    ticker::TickerService,
    token_info,
};

#[derive(Debug, Parser)]
#[command(name = "ticker_bot", about = "DEX market-cap ticker bot")]
struct Args {
    /// Ticker entry from the config file to run; defaults to the only one
    #[arg(long)]
    ticker: Option<String>,

    /// Path to the configuration file
    #[arg(long, default_value = "Config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let settings = Settings::from_file(&args.config)
        .with_context(|| format!("failed to load {}", args.config))?;

    let ticker_cfg = match &args.ticker {
        Some(name) => settings
            .ticker(name)
            .with_context(|| format!("no ticker named '{}' in {}", name, args.config))?
            .clone(),
        None => {
            if settings.tickers.len() != 1 {
                bail!(
                    "{} defines {} tickers, pick one with --ticker",
                    args.config,
                    settings.tickers.len()
                );
            }
            settings.tickers[0].clone()
        }
    };

    let bot_token = env::var(&ticker_cfg.bot_token_env).with_context(|| {
        format!(
            "bot credential env var {} is not set",
            ticker_cfg.bot_token_env
        )
    })?;

    let provider = rpc::connect(&settings.rpc).await?;

    if let Some(token) = settings.tokens.get(&ticker_cfg.token) {
        match token_info::symbol(Arc::clone(&provider), token.address).await {
            Ok(symbol) => info!("tracking {} at {:?}", symbol, token.address),
            Err(e) => warn!("symbol lookup failed for {:?}: {}", token.address, e),
        }
    }

    let rest = DiscordRest::new(bot_token.clone(), settings.discord.api_base_url.clone())?;
    let me = rest
        .current_user()
        .await
        .context("bot credential rejected by the API")?;
    info!("authenticated as {} ({})", me.username, me.id);

    let gateway =
        DiscordGateway::new(bot_token, &settings.discord, settings.poll.activity).spawn();
    if !gateway.wait_until_ready(Duration::from_secs(30)).await {
        warn!("gateway not ready after 30s, starting loop anyway");
    }

    let chat = DiscordChat::new(rest, gateway);
    let service = TickerService::new(provider, chat, Arc::new(settings), ticker_cfg);

    tokio::select! {
        _ = service.run() => {}
        _ = signal::ctrl_c() => {
            info!("shutting down");
        }
    }

    Ok(())
}
