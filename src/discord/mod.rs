// Discord chat integration: REST for per-guild nicknames, gateway for
// presence.

pub mod gateway;
pub mod rest;

use async_trait::async_trait;
use log::warn;

use crate::chat_client::ChatClient;

pub use gateway::{DiscordGateway, GatewayHandle};
pub use rest::{BotUser, ChatError, DiscordRest, Guild};

/// ChatClient over a Discord bot account: display names are per-guild
/// nicknames applied through REST, status text is a gateway presence.
pub struct DiscordChat {
    rest: DiscordRest,
    gateway: GatewayHandle,
}

impl DiscordChat {
    pub fn new(rest: DiscordRest, gateway: GatewayHandle) -> Self {
        Self { rest, gateway }
    }
}

#[async_trait]
impl ChatClient for DiscordChat {
    async fn set_display_name(&self, name: &str) -> bool {
        let guilds = match self.rest.guilds().await {
            Ok(guilds) => guilds,
            Err(e) => {
                warn!("guild listing failed: {}", e);
                return false;
            }
        };
        for guild in guilds {
            if let Err(e) = self.rest.set_own_nickname(&guild.id, name).await {
                warn!("nickname update rejected in guild '{}': {}", guild.name, e);
                return false;
            }
        }
        true
    }

    async fn set_status(&self, text: &str) -> bool {
        self.gateway.set_presence(text).await
    }
}
