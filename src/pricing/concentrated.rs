// Concentrated-liquidity (tick-based) pool pricing from sqrtPriceX96.

use std::sync::Arc;

use ethers::prelude::Middleware;
use ethers::types::{Address, U256};

use super::QuoteError;
use crate::contracts::IUniswapV3Pool;
use crate::numeric::u256_to_f64_lossy;

/// 2^96, the fixed-point scale of sqrtPriceX96.
const Q96_F64: f64 = 79228162514264337593543950336.0;

/// Recover the linear token1/token0 price from the square-root fixed-point
/// encoding: `((sqrtPriceX96 / 2^96)^2) * 10^decimals0 / 10^decimals1`,
/// chained through `base_price`. A zero sqrt price is a zero price, not an
/// error.
pub fn price_from_sqrt_price_x96(
    sqrt_price_x96: U256,
    decimals0: u32,
    decimals1: u32,
    base_price: f64,
) -> f64 {
    if sqrt_price_x96.is_zero() {
        return 0.0;
    }
    let ratio = u256_to_f64_lossy(sqrt_price_x96) / Q96_F64;
    let price_1_per_0 = ratio * ratio;
    price_1_per_0 * 10f64.powi(decimals0 as i32) / 10f64.powi(decimals1 as i32) * base_price
}

/// Fetch `slot0` from a concentrated-liquidity pool and price it. Read
/// failures are logged here before propagating; this path historically runs
/// against third-party pools whose failures are worth a diagnostic line.
pub async fn pool_price<M: Middleware + 'static>(
    provider: Arc<M>,
    pool: Address,
    decimals0: u32,
    decimals1: u32,
    base_price: f64,
) -> Result<f64, QuoteError> {
    let contract = IUniswapV3Pool::new(pool, provider);
    match contract.slot_0().call().await {
        Ok((sqrt_price_x96, _tick, _, _, _, _, _)) => Ok(price_from_sqrt_price_x96(
            sqrt_price_x96,
            decimals0,
            decimals1,
            base_price,
        )),
        Err(e) => {
            tracing::warn!("slot0 read failed for pool {:?}: {}", pool, e);
            Err(QuoteError::Call(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q96() -> U256 {
        U256::from(2u64).pow(U256::from(96u64))
    }

    #[test]
    fn test_zero_sqrt_price_is_zero() {
        assert_eq!(price_from_sqrt_price_x96(U256::zero(), 18, 18, 1.0), 0.0);
        assert_eq!(price_from_sqrt_price_x96(U256::zero(), 6, 18, 3.5), 0.0);
    }

    #[test]
    fn test_unit_price() {
        // sqrtPriceX96 == 2^96 encodes a 1:1 price
        let price = price_from_sqrt_price_x96(q96(), 18, 18, 1.0);
        assert!((price - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_double_sqrt_is_quadruple_price() {
        let price = price_from_sqrt_price_x96(q96() * U256::from(2u64), 18, 18, 1.0);
        assert!((price - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_decimal_adjustment() {
        // token0 has 6 decimals, token1 has 18: raw 1:1 sqrt price scales by
        // 10^6 / 10^18
        let price = price_from_sqrt_price_x96(q96(), 6, 18, 1.0);
        assert!((price - 1e-12).abs() < 1e-24);
    }

    #[test]
    fn test_base_price_multiplies() {
        let unit = price_from_sqrt_price_x96(q96(), 18, 18, 1.0);
        let chained = price_from_sqrt_price_x96(q96(), 18, 18, 2500.0);
        assert!((chained - unit * 2500.0).abs() < 1e-6);
    }
}
