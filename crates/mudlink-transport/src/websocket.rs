//! WebSocket transport over tokio-tungstenite.

use std::sync::{Arc, Mutex, RwLock};

use futures::{SinkExt, StreamExt};
use mudlink_core::{
    RawEvent,
    traits::{ConnectionState, SendError, Transport},
};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::frame::{self, ClientCommand};

/// Connection error.
#[derive(Debug, thiserror::Error)]
pub enum WsError {
    /// The socket could not be established.
    #[error("websocket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Client side of the persistent game connection.
///
/// Delivers inbound events to a caller-supplied sink and drains an
/// outbound command queue. Reconnection policy belongs to the caller;
/// a closed client stays closed.
pub struct WsClient {
    state: Arc<RwLock<ConnectionState>>,
    outbound: Mutex<Option<mpsc::UnboundedSender<ClientCommand>>>,
}

impl WsClient {
    /// Create a client. It reports `Closed` until `connect` succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ConnectionState::Closed)),
            outbound: Mutex::new(None),
        }
    }

    /// Connect and start the read/write loops.
    ///
    /// `on_event` receives every inbound event, including the
    /// synthesized connection_open/connection_close pair. Events are
    /// delivered in arrival order, one at a time.
    ///
    /// # Errors
    /// Returns an error when the socket cannot be established.
    pub async fn connect<F>(&self, url: &str, on_event: F) -> Result<(), WsError>
    where
        F: Fn(RawEvent) + Send + Sync + 'static,
    {
        self.set_state(ConnectionState::Connecting);
        let (socket, _response) = match connect_async(url).await {
            Ok(ok) => ok,
            Err(e) => {
                self.set_state(ConnectionState::Closed);
                return Err(e.into());
            }
        };
        tracing::info!(%url, "connected");
        self.set_state(ConnectionState::Open);

        let (mut sink, mut stream) = socket.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<ClientCommand>();
        *self.outbound.lock().unwrap() = Some(tx);

        // Forward queued commands to the socket.
        let send_task = tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                if sink.send(Message::Text(command.to_frame())).await.is_err() {
                    break;
                }
            }
        });

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            on_event(RawEvent::connection_open());

            while let Some(message) = stream.next().await {
                let text = match message {
                    Ok(Message::Text(text)) => text,
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::error!("websocket error: {e}");
                        break;
                    }
                };

                match frame::parse_frame(&text) {
                    Ok(events) => {
                        for event in events {
                            on_event(event);
                        }
                    }
                    Err(e) => tracing::warn!("dropping malformed frame: {e}"),
                }
            }

            *state.write().unwrap() = ConnectionState::Closed;
            send_task.abort();
            on_event(RawEvent::connection_close());
        });

        Ok(())
    }

    fn set_state(&self, state: ConnectionState) {
        *self.state.write().unwrap() = state;
    }
}

impl Default for WsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for WsClient {
    fn state(&self) -> ConnectionState {
        *self.state.read().unwrap()
    }

    fn send_command(&self, command: &str) -> Result<(), SendError> {
        if self.state() != ConnectionState::Open {
            return Err(SendError::NotConnected);
        }
        let outbound = self.outbound.lock().unwrap();
        outbound
            .as_ref()
            .ok_or(SendError::NotConnected)?
            .send(ClientCommand::text(command))
            .map_err(|_| SendError::NotConnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_starts_closed() {
        let client = WsClient::new();
        assert_eq!(client.state(), ConnectionState::Closed);
    }

    #[test]
    fn test_send_before_connect_fails() {
        let client = WsClient::new();
        assert!(matches!(
            client.send_command("look"),
            Err(SendError::NotConnected)
        ));
    }
}
