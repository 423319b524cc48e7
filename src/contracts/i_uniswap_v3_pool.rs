use ethers::prelude::*;

// slot0 uses the exact Solidity widths: uint160 for sqrtPriceX96, int24 for
// tick. Widening them to uint256/int256 makes abigen decode garbage
// silently, so the full JSON ABI is kept instead of the human-readable form.
abigen!(
    IUniswapV3Pool,
    r#"[
        {
            "inputs": [],
            "name": "slot0",
            "outputs": [
                {
                    "internalType": "uint160",
                    "name": "sqrtPriceX96",
                    "type": "uint160"
                },
                {
                    "internalType": "int24",
                    "name": "tick",
                    "type": "int24"
                },
                {
                    "internalType": "uint16",
                    "name": "observationIndex",
                    "type": "uint16"
                },
                {
                    "internalType": "uint16",
                    "name": "observationCardinality",
                    "type": "uint16"
                },
                {
                    "internalType": "uint16",
                    "name": "observationCardinalityNext",
                    "type": "uint16"
                },
                {
                    "internalType": "uint8",
                    "name": "feeProtocol",
                    "type": "uint8"
                },
                {
                    "internalType": "bool",
                    "name": "unlocked",
                    "type": "bool"
                }
            ],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "token0",
            "outputs": [
                {
                    "internalType": "address",
                    "name": "",
                    "type": "address"
                }
            ],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "token1",
            "outputs": [
                {
                    "internalType": "address",
                    "name": "",
                    "type": "address"
                }
            ],
            "stateMutability": "view",
            "type": "function"
        }
    ]"#
);
