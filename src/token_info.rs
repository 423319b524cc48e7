// ERC-20 supply and balance readers.

use std::sync::Arc;

use ethers::prelude::Middleware;
use ethers::types::Address;

use crate::contracts::Erc20;
use crate::numeric::u256_div_10_pow;
use crate::pricing::QuoteError;

/// Total supply of a token in whole units. When `decimals` is not supplied
/// it is read from the contract first.
pub async fn total_supply<M: Middleware + 'static>(
    provider: Arc<M>,
    token: Address,
    decimals: Option<u8>,
) -> Result<f64, QuoteError> {
    let contract = Erc20::new(token, provider);
    let decimals = match decimals {
        Some(d) => d,
        None => contract
            .decimals()
            .call()
            .await
            .map_err(|e| QuoteError::Call(e.to_string()))?,
    };
    let raw = contract
        .total_supply()
        .call()
        .await
        .map_err(|e| QuoteError::Call(e.to_string()))?;
    Ok(u256_div_10_pow(raw, decimals as u32))
}

/// Balance of `holder` in whole units of the token.
pub async fn balance_of<M: Middleware + 'static>(
    provider: Arc<M>,
    token: Address,
    holder: Address,
    decimals: Option<u8>,
) -> Result<f64, QuoteError> {
    let contract = Erc20::new(token, provider);
    let decimals = match decimals {
        Some(d) => d,
        None => contract
            .decimals()
            .call()
            .await
            .map_err(|e| QuoteError::Call(e.to_string()))?,
    };
    let raw = contract
        .balance_of(holder)
        .call()
        .await
        .map_err(|e| QuoteError::Call(e.to_string()))?;
    Ok(u256_div_10_pow(raw, decimals as u32))
}

/// Token symbol, used for log lines only.
pub async fn symbol<M: Middleware + 'static>(
    provider: Arc<M>,
    token: Address,
) -> Result<String, QuoteError> {
    Erc20::new(token, provider)
        .symbol()
        .call()
        .await
        .map_err(|e| QuoteError::Call(e.to_string()))
}
