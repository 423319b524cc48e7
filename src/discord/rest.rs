// Discord REST API client (the small read/patch surface this bot needs).

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("discord api returned {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Deserialize)]
pub struct BotUser {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct Guild {
    pub id: String,
    pub name: String,
}

pub struct DiscordRest {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl DiscordRest {
    pub fn new(token: String, base_url: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("mcap-ticker (https://github.com/mig-labs/mcap-ticker, 0.1.0)")
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Validate the credential and identify the bot account.
    pub async fn current_user(&self) -> Result<BotUser, ChatError> {
        let resp = self
            .http
            .get(format!("{}/users/@me", self.base_url))
            .header("Authorization", format!("Bot {}", self.token))
            .send()
            .await?;
        Self::check(resp).await?.json().await.map_err(ChatError::from)
    }

    /// Guilds the bot account is currently a member of.
    pub async fn guilds(&self) -> Result<Vec<Guild>, ChatError> {
        let resp = self
            .http
            .get(format!("{}/users/@me/guilds", self.base_url))
            .header("Authorization", format!("Bot {}", self.token))
            .send()
            .await?;
        Self::check(resp).await?.json().await.map_err(ChatError::from)
    }

    /// Change the bot's own nickname inside one guild.
    pub async fn set_own_nickname(&self, guild_id: &str, nick: &str) -> Result<(), ChatError> {
        let resp = self
            .http
            .patch(format!("{}/guilds/{}/members/@me", self.base_url, guild_id))
            .header("Authorization", format!("Bot {}", self.token))
            .json(&serde_json::json!({ "nick": nick }))
            .send()
            .await?;
        Self::check(resp).await?;
        debug!("nickname set in guild {}", guild_id);
        Ok(())
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ChatError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ChatError::Api {
            status: status.as_u16(),
            body,
        })
    }
}
