//! Transport layer for the Mudlink game client.
//!
//! Provides:
//! - Evennia-style wire framing (`[channel, args, kwargs]` triples)
//! - `TransportAdapter` - bridges connection events into dispatch and
//!   owns the idle keep-alive
//! - WebSocket client (feature: websocket)

pub mod adapter;
pub mod frame;

#[cfg(feature = "websocket")]
pub mod websocket;

pub use adapter::{AdapterError, KEEPALIVE_PERIOD, TransportAdapter};
pub use frame::{ClientCommand, FrameError, IDLE_COMMAND, parse_frame};

#[cfg(feature = "websocket")]
pub use websocket::{WsClient, WsError};
