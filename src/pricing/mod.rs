// Pool price calculation: constant-product reserves, concentrated-liquidity
// sqrt prices, and Aerodrome spot quotes chained into multi-hop routes.

pub mod aerodrome;
pub mod concentrated;
pub mod constant_product;

use std::sync::Arc;

use ethers::prelude::Middleware;

use crate::settings::{HopConfig, PoolKind, Settings};

/// Uniform "price unavailable" taxonomy. Every variant means the same thing
/// to callers: skip this tick. The variants exist so the cause can be logged
/// before the tick is dropped, not to drive control flow.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("contract call failed: {0}")]
    Call(String),
    #[error("pool has zero reserve1, price undefined")]
    ZeroReserve,
    #[error("route references unknown pool '{0}'")]
    UnknownPool(String),
    #[error("route references unknown token '{0}'")]
    UnknownToken(String),
}

/// Invert a price with an explicit zero guard. A zero spot price inverts to
/// zero, never to a division error; downstream multiplication then yields a
/// zero composed price, which formats harmlessly.
pub fn invert(price: f64) -> f64 {
    if price == 0.0 {
        0.0
    } else {
        1.0 / price
    }
}

/// Compose a spot price across a chain of pool hops:
/// price(A in C) = price(A in B) * price(B in C). Each hop is quoted
/// independently against its pool kind and optionally inverted, and the
/// chain is the product of the hop prices, so any token reachable through a
/// sequence of pools can be priced without a direct pool for the pair.
pub async fn route_price<M: Middleware + 'static>(
    provider: Arc<M>,
    settings: &Settings,
    route: &[HopConfig],
) -> Result<f64, QuoteError> {
    let mut price = 1.0;

    for hop in route {
        let pool = settings
            .pools
            .get(&hop.pool)
            .ok_or_else(|| QuoteError::UnknownPool(hop.pool.clone()))?;
        let token_in = settings
            .tokens
            .get(&hop.token_in)
            .ok_or_else(|| QuoteError::UnknownToken(hop.token_in.clone()))?;

        let hop_price = match pool.kind {
            PoolKind::Aerodrome => {
                aerodrome::spot_price(
                    Arc::clone(&provider),
                    token_in.address,
                    pool.address,
                    token_in.decimals,
                )
                .await?
            }
            PoolKind::ConstantProduct => {
                let decimals0 = settings.token_decimals(&pool.token0)?;
                constant_product::pool_price(
                    Arc::clone(&provider),
                    pool.address,
                    decimals0 as u32,
                    1.0,
                )
                .await?
            }
            PoolKind::Concentrated => {
                let decimals0 = settings.token_decimals(&pool.token0)?;
                let decimals1 = settings.token_decimals(&pool.token1)?;
                concentrated::pool_price(
                    Arc::clone(&provider),
                    pool.address,
                    decimals0 as u32,
                    decimals1 as u32,
                    1.0,
                )
                .await?
            }
        };

        price *= if hop.invert {
            invert(hop_price)
        } else {
            hop_price
        };
    }

    Ok(price)
}
