//! Transport events and their normalization.

use serde::{Deserialize, Serialize};

/// Transport channel an inbound event arrived on.
///
/// `text` carries ordinary game output; the remaining message channels
/// are side-bands the server may use for untagged output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Ordinary game output.
    Text,
    /// Error report.
    Err,
    /// System notice.
    Sys,
    /// Input prompt update.
    Prompt,
    /// Debug output.
    Debug,
    /// Connection established.
    ConnectionOpen,
    /// Connection lost.
    ConnectionClose,
}

impl Channel {
    /// Parse a wire channel name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Self::Text),
            "err" => Some(Self::Err),
            "sys" => Some(Self::Sys),
            "prompt" => Some(Self::Prompt),
            "debug" => Some(Self::Debug),
            "connection_open" => Some(Self::ConnectionOpen),
            "connection_close" => Some(Self::ConnectionClose),
            _ => None,
        }
    }
}

/// One transport-level event, as delivered by the connection layer.
///
/// Created per inbound frame, never mutated, consumed immediately by
/// [`RawEvent::normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Channel the event arrived on.
    pub channel: Channel,
    /// String payload for message channels; absent for connection events.
    pub payload: Option<String>,
}

impl RawEvent {
    /// A message event on the given channel.
    #[must_use]
    pub fn message<S: Into<String>>(channel: Channel, payload: S) -> Self {
        Self {
            channel,
            payload: Some(payload.into()),
        }
    }

    /// The connection came up.
    #[must_use]
    pub const fn connection_open() -> Self {
        Self {
            channel: Channel::ConnectionOpen,
            payload: None,
        }
    }

    /// The connection went away.
    #[must_use]
    pub const fn connection_close() -> Self {
        Self {
            channel: Channel::ConnectionClose,
            payload: None,
        }
    }

    /// Classify this event for the dispatch engine.
    ///
    /// A message channel with no payload normalizes to an empty payload;
    /// connection channels discard any payload they carry.
    #[must_use]
    pub fn normalize(self) -> NormalizedEvent {
        let kind = match self.channel {
            Channel::Text => MessageKind::Out,
            Channel::Err => MessageKind::Err,
            Channel::Sys => MessageKind::Sys,
            Channel::Prompt => MessageKind::Prompt,
            Channel::Debug => MessageKind::Debug,
            Channel::ConnectionOpen => return NormalizedEvent::ConnectionOpen,
            Channel::ConnectionClose => return NormalizedEvent::ConnectionClose,
        };
        NormalizedEvent::Message {
            kind,
            payload: self.payload.unwrap_or_default(),
        }
    }
}

/// Message classification. Fully determines the decode strategy: `Out`
/// runs the envelope decode chain, every other kind passes its payload
/// through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Ordinary game output, possibly envelope-wrapped.
    Out,
    /// Error text, passed through as-is.
    Err,
    /// System text, passed through as-is.
    Sys,
    /// Prompt text, passed through as-is.
    Prompt,
    /// Debug text, passed through as-is.
    Debug,
}

/// Internal classification of a transport event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedEvent {
    /// A game message carrying a payload to decode and route.
    Message {
        /// Decode strategy selector.
        kind: MessageKind,
        /// Original string payload.
        payload: String,
    },
    /// The connection came up.
    ConnectionOpen,
    /// The connection went away.
    ConnectionClose,
}
