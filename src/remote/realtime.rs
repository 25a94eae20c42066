use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::time::{Instant, interval_at, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::config::RemoteSettings;
use crate::errors::RemoteServiceError;
use crate::remote::query::ChangeFilter;
use crate::remote::subscription::{ChangeCallback, LossNotifier, Subscription};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type SocketSink = futures_util::stream::SplitSink<Socket, Message>;
type SocketStream = futures_util::stream::SplitStream<Socket>;

const JOIN_TIMEOUT: Duration = Duration::from_secs(10);
const PHOENIX_TOPIC: &str = "phoenix";
const ALL_EVENTS: &str = "*";

/// Phoenix channel frame as spoken by the realtime endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_ref: Option<String>,
}

impl ChannelMessage {
    pub fn join(filter: &ChangeFilter, access_token: &str, reference: String) -> Self {
        Self {
            topic: filter.topic(),
            event: "phx_join".to_string(),
            payload: json!({
                "config": {
                    "broadcast": { "self": false },
                    "presence": { "key": "" },
                    "postgres_changes": [{
                        "event": ALL_EVENTS,
                        "schema": filter.schema,
                        "table": filter.table,
                    }],
                },
                "access_token": access_token,
            }),
            join_ref: Some(reference.clone()),
            reference: Some(reference),
        }
    }

    pub fn leave(topic: &str, reference: String) -> Self {
        Self {
            topic: topic.to_string(),
            event: "phx_leave".to_string(),
            payload: json!({}),
            reference: Some(reference),
            join_ref: None,
        }
    }

    pub fn heartbeat(reference: String) -> Self {
        Self {
            topic: PHOENIX_TOPIC.to_string(),
            event: "heartbeat".to_string(),
            payload: json!({}),
            reference: Some(reference),
            join_ref: None,
        }
    }

    pub fn is_change_on(&self, topic: &str) -> bool {
        self.topic == topic && self.event == "postgres_changes"
    }

    pub fn is_reply_to(&self, reference: &str) -> bool {
        self.event == "phx_reply" && self.reference.as_deref() == Some(reference)
    }

    /// Status of a `phx_reply`, with the service's reason when it refused
    pub fn reply_status(&self) -> Result<(), String> {
        let status = self.payload.get("status").and_then(Value::as_str);
        if status == Some("ok") {
            return Ok(());
        }
        let reason = self
            .payload
            .pointer("/response/reason")
            .and_then(Value::as_str)
            .or_else(|| self.payload.get("response").and_then(Value::as_str))
            .unwrap_or("Subscription rejected");
        Err(reason.to_string())
    }

    fn encode(&self) -> Result<Message, RemoteServiceError> {
        Ok(Message::Text(serde_json::to_string(self)?.into()))
    }
}

/// Opens one websocket channel per subscription
pub struct RealtimeClient {
    settings: RemoteSettings,
    next_ref: AtomicU64,
}

impl RealtimeClient {
    pub fn new(settings: RemoteSettings) -> Self {
        Self {
            settings,
            next_ref: AtomicU64::new(1),
        }
    }

    pub async fn subscribe(
        &self,
        filter: ChangeFilter,
        on_change: ChangeCallback,
    ) -> Result<Subscription, RemoteServiceError> {
        let topic = filter.topic();
        let (socket, _) = connect_async(self.settings.realtime_url()).await?;
        let (mut sink, mut stream) = socket.split();

        let join_ref = self.next_reference();
        let join = ChannelMessage::join(&filter, &self.settings.anon_key, join_ref.clone());
        sink.send(join.encode()?).await?;

        timeout(JOIN_TIMEOUT, Self::await_join_reply(&mut stream, &join_ref))
            .await
            .map_err(|_| RemoteServiceError::channel(format!("Timed out joining {topic}")))??;
        info!("Subscribed to changes on {}", filter.table);

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let subscription = Subscription::new(topic.clone(), move || {
            let _ = stop_tx.send(());
        });
        let on_change = subscription.gate(on_change);

        let channel = ChannelTask {
            topic,
            heartbeat: Duration::from_secs(self.settings.heartbeat_secs.max(1)),
            next_ref: self.next_ref.fetch_add(1, Ordering::Relaxed),
            lost: subscription.loss_notifier(),
        };
        tokio::spawn(channel.run(sink, stream, on_change, stop_rx));

        Ok(subscription)
    }

    fn next_reference(&self) -> String {
        self.next_ref.fetch_add(1, Ordering::Relaxed).to_string()
    }

    async fn await_join_reply(
        stream: &mut SocketStream,
        join_ref: &str,
    ) -> Result<(), RemoteServiceError> {
        while let Some(frame) = stream.next().await {
            let Message::Text(text) = frame? else {
                continue;
            };
            let Ok(message) = serde_json::from_str::<ChannelMessage>(&text) else {
                continue;
            };
            if message.is_reply_to(join_ref) {
                return message.reply_status().map_err(RemoteServiceError::channel);
            }
        }
        Err(RemoteServiceError::channel(
            "Realtime channel closed before the subscription was confirmed",
        ))
    }
}

struct ChannelTask {
    topic: String,
    heartbeat: Duration,
    next_ref: u64,
    lost: LossNotifier,
}

impl ChannelTask {
    async fn run(
        mut self,
        mut sink: SocketSink,
        mut stream: SocketStream,
        on_change: ChangeCallback,
        mut stop: oneshot::Receiver<()>,
    ) {
        let mut heartbeat = interval_at(Instant::now() + self.heartbeat, self.heartbeat);

        let ended = loop {
            tokio::select! {
                _ = &mut stop => {
                    self.close(&mut sink).await;
                    break Ok(());
                }
                _ = heartbeat.tick() => {
                    let beat = ChannelMessage::heartbeat(self.reference());
                    if let Err(e) = Self::send(&mut sink, &beat).await {
                        warn!("Heartbeat on {} failed: {}", self.topic, e);
                        break Err(e);
                    }
                }
                frame = stream.next() => {
                    if let Err(e) = self.handle_frame(frame, &on_change) {
                        break Err(e);
                    }
                }
            }
        };

        if let Err(e) = ended {
            self.lost.lost(e);
        }
        debug!("Realtime channel {} finished", self.topic);
    }

    /// Errors once the channel is gone
    fn handle_frame(
        &self,
        frame: Option<Result<Message, tokio_tungstenite::tungstenite::Error>>,
        on_change: &ChangeCallback,
    ) -> Result<(), RemoteServiceError> {
        match frame {
            Some(Ok(Message::Text(text))) => {
                match serde_json::from_str::<ChannelMessage>(&text) {
                    Ok(message) if message.is_change_on(&self.topic) => on_change(),
                    Ok(message) if message.event == "phx_error" || message.event == "phx_close" => {
                        warn!("Realtime channel {} closed by service: {}", self.topic, message.event);
                        return Err(RemoteServiceError::channel(format!(
                            "Live updates for {} stopped ({})",
                            self.topic, message.event
                        )));
                    }
                    Ok(_) => {}
                    Err(e) => debug!("Ignoring unparsable realtime frame: {}", e),
                }
                Ok(())
            }
            Some(Ok(Message::Close(_))) | None => {
                warn!("Realtime socket for {} closed", self.topic);
                Err(RemoteServiceError::channel(format!(
                    "Live updates for {} stopped: connection closed",
                    self.topic
                )))
            }
            Some(Ok(_)) => Ok(()),
            Some(Err(e)) => {
                warn!("Realtime socket for {} failed: {}", self.topic, e);
                Err(e.into())
            }
        }
    }

    async fn close(&mut self, sink: &mut SocketSink) {
        let reference = self.reference();
        let leave = ChannelMessage::leave(&self.topic, reference);
        if let Err(e) = Self::send(sink, &leave).await {
            debug!("Leaving {} failed: {}", self.topic, e);
        }
        let _ = sink.close().await;
    }

    async fn send(sink: &mut SocketSink, message: &ChannelMessage) -> Result<(), RemoteServiceError> {
        sink.send(message.encode()?).await?;
        Ok(())
    }

    fn reference(&mut self) -> String {
        self.next_ref += 1;
        self.next_ref.to_string()
    }
}
