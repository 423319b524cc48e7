//! # mcap-ticker
//!
//! A small service that prices DEX-listed tokens from on-chain liquidity
//! pools on Base and publishes the resulting market cap and spot price as a
//! Discord bot's display name and status text.
//!
//! ## Overview
//!
//! Every polling tick the service:
//!
//! - **Prices**: reads pool state (constant-product reserves, a
//!   concentrated-liquidity sqrt price, or an Aerodrome spot quote) and
//!   chains hops into a composed spot price
//! - **Measures**: reads the tracked token's total supply
//! - **Publishes**: formats `price * supply` compactly and pushes a
//!   display-name plus status-text update through the chat client
//!
//! A tick whose market data is unavailable is skipped outright; the next
//! tick is attempted independently.

// Core types
/// Pool price calculation and multi-hop route composition
pub mod pricing;
/// ERC-20 supply and balance readers
pub mod token_info;
/// Compact magnitude and grouped price formatting
pub mod format;
/// Raw integer -> f64 conversion helpers
pub mod numeric;

// Orchestration
/// Polling loop publishing market data to the chat client
pub mod ticker;
/// Chat platform capability seam
pub mod chat_client;

// Infrastructure
/// Discord REST + gateway implementation of the chat seam
pub mod discord;
/// RPC provider construction
pub mod rpc;
/// Smart contract ABIs (read-only)
pub mod contracts;

// Settings & Configuration
/// Configuration management
pub mod settings;

// Re-exports for convenience
pub use chat_client::ChatClient;
pub use pricing::QuoteError;
pub use settings::Settings;
pub use ticker::{MarketSnapshot, TickerService};
