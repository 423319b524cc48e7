// RPC provider construction.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use ethers::prelude::*;
use ethers::providers::Http;
use log::info;
use url::Url;

use crate::settings::Rpc;

/// Build an HTTP provider with a request timeout and verify it fronts the
/// expected chain. Individual reads have no retry policy; a slow endpoint
/// fails the tick via the timeout instead of wedging the loop.
pub async fn connect(cfg: &Rpc) -> Result<Arc<Provider<Http>>> {
    let url = Url::parse(&cfg.http_url)
        .with_context(|| format!("invalid RPC url '{}'", cfg.http_url))?;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.request_timeout_seconds))
        .build()
        .context("failed to build HTTP client")?;
    let provider = Provider::new(Http::new_with_client(url, client));

    let chain_id = provider
        .get_chainid()
        .await
        .with_context(|| format!("RPC endpoint {} unreachable", cfg.http_url))?;
    if chain_id.as_u64() != cfg.expected_chain_id {
        bail!(
            "RPC endpoint {} serves chain {} (expected {})",
            cfg.http_url,
            chain_id,
            cfg.expected_chain_id
        );
    }

    info!("connected to chain {} via {}", chain_id, cfg.http_url);
    Ok(Arc::new(provider))
}
