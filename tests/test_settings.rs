//! Integration tests for configuration loading and reference validation

use std::io::Write;

use mcap_ticker::settings::{ActivityKind, PoolKind, Settings};

const BASE_CONFIG: &str = r#"
[rpc]
http_url = "http://127.0.0.1:8545"

[tokens.usdc]
address = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"
decimals = 6

[tokens.gov]
address = "0x4200000000000000000000000000000000000006"
decimals = 18

[pools.gov_usdc]
address = "0xcDAC0d6c6C59727a65F871236188350531885C43"
kind = "aerodrome"
token0 = "gov"
token1 = "usdc"

[[tickers]]
name = "GOV"
token = "gov"
bot_token_env = "DISCORD_BOT_TOKEN_GOV"
route = [{ pool = "gov_usdc", token_in = "usdc", invert = true }]
"#;

fn load(contents: &str) -> Result<Settings, config::ConfigError> {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp config");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp config");
    let path = file.path().to_str().expect("temp path is utf-8").to_string();
    Settings::from_file(&path)
}

#[test]
fn test_shipped_config_loads() {
    let settings = Settings::from_file("Config.toml").expect("Failed to load settings");

    assert_eq!(settings.poll.update_interval_seconds, 15);
    assert_eq!(settings.poll.activity, ActivityKind::Watching);
    assert_eq!(settings.rpc.expected_chain_id, 8453);
    assert!(!settings.tickers.is_empty());

    // Every route hop must resolve against the token/pool tables
    for ticker in &settings.tickers {
        assert!(settings.tokens.contains_key(&ticker.token));
        for hop in &ticker.route {
            let pool = settings.pools.get(&hop.pool).expect("pool exists");
            assert!(settings.tokens.contains_key(&hop.token_in));
            assert!(hop.token_in == pool.token0 || hop.token_in == pool.token1);
        }
    }
}

#[test]
fn test_defaults_applied() {
    let settings = load(BASE_CONFIG).expect("Failed to load settings");

    assert_eq!(settings.poll.update_interval_seconds, 15);
    assert_eq!(settings.poll.activity, ActivityKind::Watching);
    assert_eq!(settings.rpc.request_timeout_seconds, 10);
    assert_eq!(settings.rpc.expected_chain_id, 8453);
    assert_eq!(settings.discord.api_base_url, "https://discord.com/api/v10");
    assert!(!settings.discord.members_intent);

    let pool = &settings.pools["gov_usdc"];
    assert_eq!(pool.kind, PoolKind::Aerodrome);
    assert!(settings.tickers[0].route[0].invert);
}

#[test]
fn test_ticker_lookup() {
    let settings = load(BASE_CONFIG).expect("Failed to load settings");
    assert!(settings.ticker("GOV").is_some());
    assert!(settings.ticker("NOPE").is_none());
    assert_eq!(settings.token_decimals("usdc").expect("known token"), 6);
    assert!(settings.token_decimals("nope").is_err());
}

#[test]
fn test_invalid_activity_is_rejected() {
    let broken = format!("{}\n[loop]\nactivity = \"streaming\"\n", BASE_CONFIG);
    assert!(load(&broken).is_err());
}

#[test]
fn test_unknown_pool_reference_is_rejected() {
    let broken = BASE_CONFIG.replace("pool = \"gov_usdc\"", "pool = \"missing\"");
    assert!(load(&broken).is_err());
}

#[test]
fn test_unknown_token_reference_is_rejected() {
    let broken = BASE_CONFIG.replace("token = \"gov\"", "token = \"missing\"");
    assert!(load(&broken).is_err());
}

#[test]
fn test_hop_token_must_be_a_pool_side() {
    let broken = BASE_CONFIG.replace("token_in = \"usdc\"", "token_in = \"gov2\"");
    // gov2 does not exist at all; also cover a real token that is not a side
    assert!(load(&broken).is_err());

    let with_extra = format!(
        "{}\n[tokens.other]\naddress = \"0x940181a94A35A4569E4529A3CDfB74e38FD98631\"\ndecimals = 18\n",
        BASE_CONFIG.replace("token_in = \"usdc\"", "token_in = \"other\"")
    );
    assert!(load(&with_extra).is_err());
}

#[test]
fn test_empty_route_is_rejected() {
    let broken = BASE_CONFIG.replace(
        "route = [{ pool = \"gov_usdc\", token_in = \"usdc\", invert = true }]",
        "route = []",
    );
    assert!(load(&broken).is_err());
}
