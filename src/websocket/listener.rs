// websocket/listener.rs

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::types::{LiveUpdate, RefreshHint};

#[derive(Error, Debug)]
pub enum LiveUpdateError {
    #[error("Failed to connect to the live-update channel: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Listens on the backend's per-user WebSocket and turns `new_message`
/// pushes into refresh hints. Dropping the listener tears the reader
/// task down along with the connection.
pub struct LiveUpdates {
    events: mpsc::UnboundedReceiver<RefreshHint>,
    reader: JoinHandle<()>,
}

impl LiveUpdates {
    /// Connects to the URL produced by `ClientConfig::ws_url`.
    pub async fn connect(url: &str) -> Result<Self, LiveUpdateError> {
        let (stream, _) = connect_async(url).await?;
        log::info!("Live-update channel connected");

        let (events_tx, events) = mpsc::unbounded_channel();
        let reader = tokio::spawn(read_loop(stream, events_tx));
        Ok(Self { events, reader })
    }

    /// The next refresh hint, or None once the connection has closed.
    pub async fn next(&mut self) -> Option<RefreshHint> {
        self.events.recv().await
    }
}

impl Drop for LiveUpdates {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_loop(
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    events: mpsc::UnboundedSender<RefreshHint>,
) {
    let (mut writer, mut reader) = stream.split();

    while let Some(frame) = reader.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => match serde_json::from_str::<LiveUpdate>(&text) {
                Ok(LiveUpdate::NewMessage { message }) => {
                    let hint = message
                        .and_then(|hint| hint.match_id)
                        .map(RefreshHint::Conversation)
                        .unwrap_or(RefreshHint::ConversationList);
                    if events.send(hint).is_err() {
                        // receiver gone, nobody left to refresh
                        break;
                    }
                }
                Ok(LiveUpdate::Unknown) => {
                    log::debug!("Ignoring unrecognized live-update frame");
                }
                Err(e) => {
                    log::debug!("Ignoring unparseable live-update frame: {}", e);
                }
            },
            Ok(WsMessage::Ping(payload)) => {
                let _ = writer.send(WsMessage::Pong(payload)).await;
            }
            Ok(WsMessage::Close(_)) => {
                log::info!("Live-update channel closed by the backend");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                log::warn!("Live-update connection error: {}", e);
                break;
            }
        }
    }
}
