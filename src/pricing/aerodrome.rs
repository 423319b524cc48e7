// Aerodrome (Solidly-style) pool spot quotes.

use std::sync::Arc;

use ethers::prelude::Middleware;
use ethers::types::{Address, U256};

use super::QuoteError;
use crate::contracts::{Erc20, IAerodromePool};
use crate::numeric::u256_div_10_pow;

/// Spot price of one whole unit of `token_in` through an Aerodrome pool,
/// expressed in whole units of the pool's other token.
///
/// Quotes `getAmountOut(10^token_in_decimals, token_in)` so the pool's own
/// curve (stable or volatile) does the pricing, then normalizes the raw
/// output by the counter token's decimals, resolved on-chain from
/// `token0`/`token1`.
pub async fn spot_price<M: Middleware + 'static>(
    provider: Arc<M>,
    token_in: Address,
    pool: Address,
    token_in_decimals: u8,
) -> Result<f64, QuoteError> {
    let pool_contract = IAerodromePool::new(pool, Arc::clone(&provider));

    let unit_in = U256::exp10(token_in_decimals as usize);
    let amount_out = pool_contract
        .get_amount_out(unit_in, token_in)
        .call()
        .await
        .map_err(|e| QuoteError::Call(e.to_string()))?;

    let token0 = pool_contract
        .token_0()
        .call()
        .await
        .map_err(|e| QuoteError::Call(e.to_string()))?;
    let token1 = pool_contract
        .token_1()
        .call()
        .await
        .map_err(|e| QuoteError::Call(e.to_string()))?;
    let token_out = if token_in == token0 { token1 } else { token0 };

    let out_decimals = Erc20::new(token_out, provider)
        .decimals()
        .call()
        .await
        .map_err(|e| QuoteError::Call(e.to_string()))?;

    Ok(u256_div_10_pow(amount_out, out_decimals as u32))
}
