// Contracts Module - Public ABIs Only

pub mod erc20;
pub mod i_aerodrome_pool;
pub mod i_uniswap_v2_pair;
pub mod i_uniswap_v3_pool;

// Public exports
pub use erc20::Erc20;
pub use i_aerodrome_pool::IAerodromePool;
pub use i_uniswap_v2_pair::IUniswapV2Pair;
pub use i_uniswap_v3_pool::IUniswapV3Pool;
