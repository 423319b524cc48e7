use ethers::prelude::abigen;

// Reserve fields are uint112 in the Solidity contract. Declaring them as
// uint256 makes the generated decoder reject valid responses, so the exact
// widths are kept here.
abigen!(
    IUniswapV2Pair,
    r#"[
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast)
        function token0() external view returns (address)
        function token1() external view returns (address)
    ]"#,
);
