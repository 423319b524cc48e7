use ethers::prelude::abigen;

// Aerodrome (Solidly-style) pool. getAmountOut quotes a swap against the
// pool's own curve, stable or volatile, which is what makes it usable as a
// spot-price oracle without knowing the curve variant.
abigen!(
    IAerodromePool,
    r#"[
        function getAmountOut(uint256 amountIn, address tokenIn) external view returns (uint256)
        function token0() external view returns (address)
        function token1() external view returns (address)
        function stable() external view returns (bool)
    ]"#,
);
