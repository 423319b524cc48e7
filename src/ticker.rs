// Ticker loop: poll pool prices and token supply, publish market cap and
// price through the chat client.

use std::sync::Arc;
use std::time::Duration;

use ethers::prelude::Middleware;
use log::{info, warn};
use tokio::time::interval;

use crate::chat_client::ChatClient;
use crate::format::{compact_number, grouped_price};
use crate::pricing::{self, QuoteError};
use crate::settings::{Settings, TickerConfig};
use crate::token_info;

/// One tick's market data, computed in full before anything is published.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketSnapshot {
    pub price: f64,
    pub supply: f64,
    pub market_cap: f64,
}

pub struct TickerService<M: Middleware, C: ChatClient> {
    provider: Arc<M>,
    chat: C,
    settings: Arc<Settings>,
    config: TickerConfig,
    update_interval: Duration,
}

impl<M: Middleware + 'static, C: ChatClient> TickerService<M, C> {
    pub fn new(provider: Arc<M>, chat: C, settings: Arc<Settings>, config: TickerConfig) -> Self {
        let update_interval = Duration::from_secs(settings.poll.update_interval_seconds);
        Self {
            provider,
            chat,
            settings,
            config,
            update_interval,
        }
    }

    /// Run the polling loop forever. Ticks never overlap: each one is
    /// awaited to completion before the next is scheduled, and a failed
    /// tick is simply skipped with no retry.
    pub async fn run(self) {
        info!(
            "starting ticker '{}': {} route hop(s), every {:?}",
            self.config.name,
            self.config.route.len(),
            self.update_interval
        );

        let mut ticker = interval(self.update_interval);
        let mut iteration = 0u64;

        loop {
            ticker.tick().await;
            iteration += 1;
            self.tick(iteration).await;
        }
    }

    async fn tick(&self, iteration: u64) {
        let snapshot = self.snapshot().await;
        if let Ok(s) = &snapshot {
            info!(
                "[tick #{}] {} price=${} mcap=${}",
                iteration,
                self.config.name,
                grouped_price(s.price),
                compact_number(s.market_cap)
            );
        }
        publish_or_skip(&self.chat, &self.config.name, snapshot).await;
    }

    /// Compute the composed route price and the tracked token's supply.
    /// Either failure makes the whole tick unavailable.
    pub async fn snapshot(&self) -> Result<MarketSnapshot, QuoteError> {
        let price =
            pricing::route_price(Arc::clone(&self.provider), &self.settings, &self.config.route)
                .await?;

        let token = self
            .settings
            .tokens
            .get(&self.config.token)
            .ok_or_else(|| QuoteError::UnknownToken(self.config.token.clone()))?;
        let supply =
            token_info::total_supply(Arc::clone(&self.provider), token.address, Some(token.decimals))
                .await?;

        Ok(MarketSnapshot {
            price,
            supply,
            market_cap: price * supply,
        })
    }
}

/// Publish one tick's fields, or nothing at all. An unavailable snapshot
/// skips the tick without touching the chat client. A rejected display-name
/// push also skips the status push for that tick.
pub(crate) async fn publish_or_skip<C: ChatClient>(
    chat: &C,
    name: &str,
    snapshot: Result<MarketSnapshot, QuoteError>,
) {
    let snapshot = match snapshot {
        Ok(s) => s,
        Err(e) => {
            warn!("market data unavailable, skipping update: {}", e);
            return;
        }
    };

    let display_name = format!("{} MCap: ${}", name, compact_number(snapshot.market_cap));
    if !chat.set_display_name(&display_name).await {
        warn!("display name update rejected, skipping status update for this tick");
        return;
    }

    let status = format!("{} Price: ${}", name, grouped_price(snapshot.price));
    if !chat.set_status(&status).await {
        warn!("status update rejected");
    }
}
