//! # Discord Gateway Session
//!
//! Maintains the bot's gateway connection so presence (status text) updates
//! can be pushed. Handles the Hello/Identify/Heartbeat handshake, tracks
//! heartbeat ACKs, and reconnects with exponential backoff when the session
//! drops. Presence pushes are routed to the session task over a channel; a
//! push while disconnected reports failure instead of queueing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use futures_util::{SinkExt, Stream, StreamExt};
use log::{debug, error, info, warn};
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use crate::settings::{ActivityKind, Discord};

// Gateway opcodes
const OP_DISPATCH: u8 = 0;
const OP_HEARTBEAT: u8 = 1;
const OP_IDENTIFY: u8 = 2;
const OP_PRESENCE_UPDATE: u8 = 3;
const OP_RECONNECT: u8 = 7;
const OP_INVALID_SESSION: u8 = 9;
const OP_HELLO: u8 = 10;
const OP_HEARTBEAT_ACK: u8 = 11;

// Intent bits
const INTENT_GUILDS: u64 = 1 << 0;
const INTENT_GUILD_MEMBERS: u64 = 1 << 1;
const INTENT_GUILD_PRESENCES: u64 = 1 << 8;
const INTENT_MESSAGE_CONTENT: u64 = 1 << 15;

/// Gateway intents from the three privileged-intent toggles. GUILDS is
/// always requested; everything privileged defaults off.
pub fn intent_bits(cfg: &Discord) -> u64 {
    let mut bits = INTENT_GUILDS;
    if cfg.members_intent {
        bits |= INTENT_GUILD_MEMBERS;
    }
    if cfg.presences_intent {
        bits |= INTENT_GUILD_PRESENCES;
    }
    if cfg.message_content_intent {
        bits |= INTENT_MESSAGE_CONTENT;
    }
    bits
}

struct PresenceRequest {
    text: String,
    done: oneshot::Sender<bool>,
}

/// Cheap clonable handle to the running session task.
#[derive(Clone)]
pub struct GatewayHandle {
    tx: mpsc::UnboundedSender<PresenceRequest>,
    connected: Arc<AtomicBool>,
}

impl GatewayHandle {
    /// Push a presence update through the live session. Reports false when
    /// the session is down or the socket write fails.
    pub async fn set_presence(&self, text: &str) -> bool {
        if !self.connected.load(Ordering::SeqCst) {
            warn!("presence update dropped: gateway not connected");
            return false;
        }
        let (done_tx, done_rx) = oneshot::channel();
        let request = PresenceRequest {
            text: text.to_string(),
            done: done_tx,
        };
        if self.tx.send(request).is_err() {
            return false;
        }
        done_rx.await.unwrap_or(false)
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Block until the session has seen READY, up to `timeout`.
    pub async fn wait_until_ready(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while !self.is_connected() {
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            sleep(Duration::from_millis(100)).await;
        }
        true
    }
}

pub struct DiscordGateway {
    token: String,
    gateway_url: String,
    intents: u64,
    activity_type: u8,
    reconnect_delay: Duration,
    max_reconnect_delay: Duration,
}

impl DiscordGateway {
    pub fn new(token: String, cfg: &Discord, activity: ActivityKind) -> Self {
        Self {
            token,
            gateway_url: cfg.gateway_url.clone(),
            intents: intent_bits(cfg),
            activity_type: activity.type_code(),
            reconnect_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(60),
        }
    }

    /// Start the session task and return its handle. The task reconnects
    /// forever; it only stops with the process.
    pub fn spawn(self) -> GatewayHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let connected = Arc::new(AtomicBool::new(false));
        let handle = GatewayHandle {
            tx,
            connected: Arc::clone(&connected),
        };

        tokio::spawn(async move {
            let mut rx = rx;
            let mut delay = self.reconnect_delay;
            loop {
                match self.run_session(&mut rx, &connected).await {
                    Ok(()) => {
                        delay = self.reconnect_delay;
                        warn!("gateway session ended, reconnecting");
                    }
                    Err(e) => {
                        error!("gateway session failed: {}. reconnecting in {:?}", e, delay);
                    }
                }
                connected.store(false, Ordering::SeqCst);

                // Exponential backoff with jitter
                let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..250));
                sleep(delay + jitter).await;
                delay = (delay * 2).min(self.max_reconnect_delay);
            }
        });

        handle
    }

    async fn run_session(
        &self,
        rx: &mut mpsc::UnboundedReceiver<PresenceRequest>,
        connected: &AtomicBool,
    ) -> Result<()> {
        let url = Url::parse(&self.gateway_url).context("invalid gateway url")?;
        info!("connecting to gateway {}", url);
        let (ws, _) = connect_async(url).await.context("gateway connect failed")?;
        let (mut write, mut read) = ws.split();

        // The first frame must be Hello with our heartbeat interval.
        let heartbeat_interval = loop {
            let frame = next_frame(&mut read).await?;
            if frame.op == OP_HELLO {
                let ms = frame
                    .d
                    .get("heartbeat_interval")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| anyhow!("hello frame missing heartbeat_interval"))?;
                break Duration::from_millis(ms);
            }
        };
        debug!("gateway hello received, heartbeat every {:?}", heartbeat_interval);

        write
            .send(Message::Text(
                identify_payload(&self.token, self.intents).to_string(),
            ))
            .await
            .context("identify send failed")?;

        let mut heartbeat = tokio::time::interval(heartbeat_interval);
        let mut last_seq: Option<u64> = None;
        let mut acked = true;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    if !acked {
                        return Err(anyhow!("heartbeat ack missed, connection is stale"));
                    }
                    acked = false;
                    write
                        .send(Message::Text(json!({ "op": OP_HEARTBEAT, "d": last_seq }).to_string()))
                        .await
                        .context("heartbeat send failed")?;
                }
                Some(request) = rx.recv() => {
                    let payload = presence_payload(&request.text, self.activity_type);
                    let sent = write.send(Message::Text(payload.to_string())).await.is_ok();
                    let _ = request.done.send(sent);
                    if !sent {
                        return Err(anyhow!("presence send failed"));
                    }
                }
                incoming = read.next() => {
                    let message = match incoming {
                        Some(Ok(m)) => m,
                        Some(Err(e)) => return Err(e).context("gateway read failed"),
                        None => return Ok(()),
                    };
                    match message {
                        Message::Text(text) => {
                            let frame: GatewayFrame = match serde_json::from_str(&text) {
                                Ok(f) => f,
                                Err(e) => {
                                    debug!("unparseable gateway frame: {}", e);
                                    continue;
                                }
                            };
                            if let Some(s) = frame.s {
                                last_seq = Some(s);
                            }
                            match frame.op {
                                OP_DISPATCH => {
                                    if frame.t.as_deref() == Some("READY") {
                                        let user = frame
                                            .d
                                            .pointer("/user/username")
                                            .and_then(Value::as_str)
                                            .unwrap_or("unknown");
                                        info!("logged in as {}", user);
                                        connected.store(true, Ordering::SeqCst);
                                    }
                                }
                                OP_HEARTBEAT => {
                                    // Server-requested immediate heartbeat
                                    write
                                        .send(Message::Text(json!({ "op": OP_HEARTBEAT, "d": last_seq }).to_string()))
                                        .await
                                        .context("heartbeat send failed")?;
                                    acked = false;
                                }
                                OP_HEARTBEAT_ACK => {
                                    acked = true;
                                }
                                OP_RECONNECT | OP_INVALID_SESSION => {
                                    warn!("gateway requested reconnect (op {})", frame.op);
                                    return Ok(());
                                }
                                _ => {}
                            }
                        }
                        Message::Ping(data) => {
                            write.send(Message::Pong(data)).await.ok();
                        }
                        Message::Close(frame) => {
                            warn!("gateway closed: {:?}", frame);
                            return Ok(());
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}

async fn next_frame<S>(read: &mut S) -> Result<GatewayFrame>
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        match read.next().await {
            Some(Ok(Message::Text(text))) => {
                if let Ok(frame) = serde_json::from_str(&text) {
                    return Ok(frame);
                }
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e).context("gateway read failed"),
            None => return Err(anyhow!("gateway closed during handshake")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GatewayFrame {
    op: u8,
    #[serde(default)]
    s: Option<u64>,
    #[serde(default)]
    t: Option<String>,
    #[serde(default)]
    d: Value,
}

fn identify_payload(token: &str, intents: u64) -> Value {
    json!({
        "op": OP_IDENTIFY,
        "d": {
            "token": token,
            "intents": intents,
            "properties": {
                "os": "linux",
                "browser": "mcap-ticker",
                "device": "mcap-ticker"
            }
        }
    })
}

fn presence_payload(text: &str, activity_type: u8) -> Value {
    json!({
        "op": OP_PRESENCE_UPDATE,
        "d": {
            "since": null,
            "activities": [{ "name": text, "type": activity_type }],
            "status": "online",
            "afk": false
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Discord;

    #[test]
    fn test_intent_bits_default_is_guilds_only() {
        assert_eq!(intent_bits(&Discord::default()), 1);
    }

    #[test]
    fn test_intent_bits_toggles() {
        let cfg = Discord {
            members_intent: true,
            presences_intent: true,
            message_content_intent: true,
            ..Discord::default()
        };
        assert_eq!(
            intent_bits(&cfg),
            INTENT_GUILDS | INTENT_GUILD_MEMBERS | INTENT_GUILD_PRESENCES | INTENT_MESSAGE_CONTENT
        );
    }

    #[test]
    fn test_identify_payload_shape() {
        let payload = identify_payload("secret", 1);
        assert_eq!(payload["op"], OP_IDENTIFY);
        assert_eq!(payload["d"]["token"], "secret");
        assert_eq!(payload["d"]["intents"], 1);
        assert_eq!(payload["d"]["properties"]["os"], "linux");
    }

    #[test]
    fn test_presence_payload_shape() {
        let payload = presence_payload("AERO Price: $1.2345", 3);
        assert_eq!(payload["op"], OP_PRESENCE_UPDATE);
        assert_eq!(payload["d"]["status"], "online");
        assert_eq!(payload["d"]["afk"], false);
        assert_eq!(payload["d"]["since"], Value::Null);
        let activity = &payload["d"]["activities"][0];
        assert_eq!(activity["name"], "AERO Price: $1.2345");
        assert_eq!(activity["type"], 3);
    }

    #[test]
    fn test_gateway_frame_parsing() {
        let hello = r#"{"op":10,"d":{"heartbeat_interval":41250},"s":null,"t":null}"#;
        let frame: GatewayFrame = serde_json::from_str(hello).expect("valid frame");
        assert_eq!(frame.op, OP_HELLO);
        assert_eq!(frame.d["heartbeat_interval"], 41250);
        assert!(frame.s.is_none());
        assert!(frame.t.is_none());
    }
}
