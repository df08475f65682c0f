//! CDP WebSocket connection implementation
//!
//! Commands are written through a shared sink; a reader task routes each
//! response back to its caller by request id.

use super::traits::{CdpConnection, CdpError, CdpResponse};
use super::types::{CdpRequest, CdpRpcResponse};
use crate::Error;
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<CdpResponse>>>>;

/// Per-command response deadlines
#[derive(Debug, Clone)]
struct CommandTimeouts {
    default: Duration,
    navigation: Duration,
}

impl Default for CommandTimeouts {
    fn default() -> Self {
        Self {
            default: Duration::from_secs(30),
            navigation: Duration::from_secs(60),
        }
    }
}

impl CommandTimeouts {
    fn for_method(&self, method: &str) -> Duration {
        if method == "Page.navigate" || method == "Page.reload" {
            self.navigation
        } else {
            self.default
        }
    }
}

/// CDP WebSocket connection implementation
pub struct CdpWebSocketConnection {
    url: String,
    sink: Mutex<SplitSink<WsStream, Message>>,
    pending: PendingMap,
    next_id: AtomicU64,
    is_active: Arc<AtomicBool>,
    timeouts: CommandTimeouts,
}

impl std::fmt::Debug for CdpWebSocketConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdpWebSocketConnection")
            .field("url", &self.url)
            .field("is_active", &self.is_active())
            .finish()
    }
}

impl CdpWebSocketConnection {
    /// Connect to a target WebSocket URL
    /// (e.g. "ws://localhost:9222/devtools/page/ABC123")
    pub async fn connect<S: Into<String>>(url: S) -> Result<Arc<Self>, Error> {
        let url = url.into();
        info!("Connecting to WebSocket: {}", url);

        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| Error::websocket(format!("Failed to connect to {}: {}", url, e)))?;
        let (sink, stream) = ws_stream.split();

        let connection = Arc::new(Self {
            url,
            sink: Mutex::new(sink),
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            is_active: Arc::new(AtomicBool::new(true)),
            timeouts: CommandTimeouts::default(),
        });

        tokio::spawn(Self::read_loop(
            stream,
            Arc::clone(&connection.pending),
            Arc::clone(&connection.is_active),
        ));

        info!("WebSocket connection established");
        Ok(connection)
    }

    async fn read_loop(mut stream: SplitStream<WsStream>, pending: PendingMap, is_active: Arc<AtomicBool>) {
        while let Some(message) = stream.next().await {
            match message {
                Ok(Message::Text(text)) => Self::route(&text, &pending).await,
                Ok(Message::Close(_)) => {
                    info!("WebSocket close frame received");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("WebSocket error: {}", e);
                    break;
                }
            }
        }

        is_active.store(false, Ordering::SeqCst);
        // Dropping the senders wakes every waiting caller with a channel error.
        pending.lock().await.clear();
        debug!("CDP read loop exited");
    }

    async fn route(text: &str, pending: &PendingMap) {
        let response = match serde_json::from_str::<CdpRpcResponse>(text) {
            Ok(response) => response,
            Err(_) => {
                debug!("Ignoring CDP event: {}", text);
                return;
            }
        };

        let Some(sender) = pending.lock().await.remove(&response.id) else {
            warn!("Response for unknown command id {}", response.id);
            return;
        };

        let _ = sender.send(CdpResponse {
            id: response.id,
            result: Some(response.result),
            error: response.error.map(|e| CdpError {
                code: e.code,
                message: e.message,
            }),
        });
    }
}

#[async_trait]
impl CdpConnection for CdpWebSocketConnection {
    async fn send_command(&self, method: &str, params: serde_json::Value) -> Result<CdpResponse, Error> {
        if !self.is_active() {
            return Err(Error::cdp("Connection is closed"));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (sender, receiver) = oneshot::channel();
        self.pending.lock().await.insert(id, sender);

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params: Some(params),
        };
        let text = serde_json::to_string(&request)?;
        debug!("Sending CDP command {} ({})", id, method);

        if let Err(e) = self.sink.lock().await.send(Message::Text(text)).await {
            self.pending.lock().await.remove(&id);
            return Err(Error::websocket(format!("Failed to send {}: {}", method, e)));
        }

        match tokio::time::timeout(self.timeouts.for_method(method), receiver).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(Error::websocket(format!(
                "Connection closed before {} returned",
                method
            ))),
            Err(_) => {
                self.pending.lock().await.remove(&id);
                Err(Error::cdp(format!("Command {} ({}) timed out", id, method)))
            }
        }
    }

    async fn close(&self) -> Result<(), Error> {
        if !self.is_active.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        info!("Closing WebSocket connection to {}", self.url);
        self.sink
            .lock()
            .await
            .close()
            .await
            .map_err(|e| Error::websocket(format!("Failed to close: {}", e)))
    }

    fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }
}
