//! Evennia-style wire framing.
//!
//! Every frame on the socket is a JSON array `[channel, args, kwargs]`.
//! Inbound frames fan out to one [`RawEvent`] per arg; outbound commands
//! are the same triple on the `text` channel.

use mudlink_core::{Channel, RawEvent};
use serde_json::{Map, Value, json};
use thiserror::Error;

/// Keep-alive marker command.
pub const IDLE_COMMAND: &str = "idle";

/// Frame decode error.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The frame is not a `[channel, args, kwargs]` array.
    #[error("not a [channel, args, kwargs] frame: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Parse one inbound text frame into routable events.
///
/// Unknown channels produce no events. Args that are not strings pass
/// through as their JSON rendering, since the decode chain downstream
/// works on text.
///
/// # Errors
/// Returns an error when the frame is not a `[channel, args, kwargs]`
/// array.
pub fn parse_frame(text: &str) -> Result<Vec<RawEvent>, FrameError> {
    let (channel, args, _kwargs): (String, Vec<Value>, Map<String, Value>) =
        serde_json::from_str(text)?;

    let Some(channel) = Channel::from_name(&channel) else {
        tracing::debug!(%channel, "ignoring frame on unknown channel");
        return Ok(Vec::new());
    };

    match channel {
        Channel::ConnectionOpen => Ok(vec![RawEvent::connection_open()]),
        Channel::ConnectionClose => Ok(vec![RawEvent::connection_close()]),
        _ => Ok(args
            .into_iter()
            .map(|arg| {
                let payload = match arg {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                RawEvent::message(channel, payload)
            })
            .collect()),
    }
}

/// One outbound command, framed for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCommand {
    command: String,
}

impl ClientCommand {
    /// An ordinary player command.
    #[must_use]
    pub fn text<S: Into<String>>(command: S) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// The keep-alive marker.
    #[must_use]
    pub fn idle() -> Self {
        Self::text(IDLE_COMMAND)
    }

    /// Serialize as a `["text", [command], {}]` frame.
    #[must_use]
    pub fn to_frame(&self) -> String {
        json!(["text", [self.command], {}]).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_frame_fans_out_in_order() {
        let events = parse_frame(r#"["text", ["a", "b"], {}]"#).unwrap();
        assert_eq!(
            events,
            vec![
                RawEvent::message(Channel::Text, "a"),
                RawEvent::message(Channel::Text, "b"),
            ]
        );
    }

    #[test]
    fn test_side_channel_keeps_its_name() {
        let events = parse_frame(r#"["err", ["oops"], {}]"#).unwrap();
        assert_eq!(events, vec![RawEvent::message(Channel::Err, "oops")]);
    }

    #[test]
    fn test_unknown_channel_yields_nothing() {
        let events = parse_frame(r#"["telemetry", ["x"], {}]"#).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_malformed_frame_is_an_error() {
        assert!(parse_frame("not a frame").is_err());
        assert!(parse_frame(r#"{"channel": "text"}"#).is_err());
        assert!(parse_frame(r#"["text"]"#).is_err());
    }

    #[test]
    fn test_non_string_arg_passes_as_json_text() {
        let events = parse_frame(r#"["text", [{"data": {"a": 1}}], {}]"#).unwrap();
        assert_eq!(
            events,
            vec![RawEvent::message(Channel::Text, r#"{"data":{"a":1}}"#)]
        );
    }

    #[test]
    fn test_connection_close_frame_normalizes() {
        let events = parse_frame(r#"["connection_close", [], {}]"#).unwrap();
        assert_eq!(events, vec![RawEvent::connection_close()]);
    }

    #[test]
    fn test_idle_command_frame() {
        assert_eq!(
            ClientCommand::idle().to_frame(),
            r#"["text",["idle"],{}]"#
        );
    }

    #[test]
    fn test_player_command_frame() {
        assert_eq!(
            ClientCommand::text("look").to_frame(),
            r#"["text",["look"],{}]"#
        );
    }
}
