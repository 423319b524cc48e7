// Constant-product (x*y=k) pool pricing from raw reserves.

use std::sync::Arc;

use ethers::prelude::Middleware;
use ethers::types::{Address, U256};

use super::QuoteError;
use crate::contracts::IUniswapV2Pair;
use crate::numeric::u256_to_f64_lossy;

/// Price of one unit of token1 expressed in token0, scaled to token0's
/// decimal precision: `reserve0 * base_price * 10^decimals0 / reserve1`.
/// `base_price` chains a previous hop's price through this pool.
pub fn price_from_reserves(
    reserve0: U256,
    reserve1: U256,
    decimals0: u32,
    base_price: f64,
) -> Result<f64, QuoteError> {
    if reserve1.is_zero() {
        return Err(QuoteError::ZeroReserve);
    }
    let reserve0 = u256_to_f64_lossy(reserve0);
    let reserve1 = u256_to_f64_lossy(reserve1);
    Ok(reserve0 * base_price * 10f64.powi(decimals0 as i32) / reserve1)
}

/// Fetch `getReserves` from a constant-product pair and price it.
pub async fn pool_price<M: Middleware + 'static>(
    provider: Arc<M>,
    pool: Address,
    decimals0: u32,
    base_price: f64,
) -> Result<f64, QuoteError> {
    let pair = IUniswapV2Pair::new(pool, provider);
    let (reserve0, reserve1, _last_update) = pair
        .get_reserves()
        .call()
        .await
        .map_err(|e| QuoteError::Call(e.to_string()))?;

    price_from_reserves(
        U256::from(reserve0),
        U256::from(reserve1),
        decimals0,
        base_price,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_formula() {
        // reserve0=1000, reserve1=500, decimals0=6 -> 1000 * 10^6 / 500
        let price = price_from_reserves(U256::from(1000u64), U256::from(500u64), 6, 1.0)
            .expect("non-zero reserve1");
        assert_eq!(price, 2_000_000.0);
    }

    #[test]
    fn test_base_price_chaining() {
        let direct = price_from_reserves(U256::from(1000u64), U256::from(500u64), 6, 2.0)
            .expect("non-zero reserve1");
        let unchained = price_from_reserves(U256::from(1000u64), U256::from(500u64), 6, 1.0)
            .expect("non-zero reserve1");
        assert_eq!(direct, unchained * 2.0);
    }

    #[test]
    fn test_zero_reserve1_is_unavailable() {
        let result = price_from_reserves(U256::from(1000u64), U256::zero(), 6, 1.0);
        assert!(matches!(result, Err(QuoteError::ZeroReserve)));
    }

    #[test]
    fn test_zero_reserve0_is_zero_price() {
        let price = price_from_reserves(U256::zero(), U256::from(500u64), 6, 1.0)
            .expect("non-zero reserve1");
        assert_eq!(price, 0.0);
    }
}
