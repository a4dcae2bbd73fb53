//! Decoded logical messages.
//!
//! The decode chain is deliberately forgiving: the server does not
//! guarantee that every payload is JSON, so anything that fails to
//! decode degrades to a plain text message instead of an error.

use serde_json::{Map, Value};

use crate::event::MessageKind;

/// Envelope key for plain text messages.
pub const MSG_KEY: &str = "msg";

/// A decoded logical message: a keyed data mapping plus an optional
/// context tag telling a handler how to present generic data.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Semantic key → value. Iterates in the order the decoded object
    /// listed its keys.
    pub data: Map<String, Value>,
    /// Optional display context, e.g. which panel requested a lookup.
    pub context: Option<String>,
}

impl Envelope {
    /// Single-key envelope with no context.
    #[must_use]
    pub fn single<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut data = Map::new();
        data.insert(key.into(), value.into());
        Self {
            data,
            context: None,
        }
    }

    /// Plain text message envelope.
    #[must_use]
    pub fn plain<S: Into<String>>(text: S) -> Self {
        Self::single(MSG_KEY, Value::String(text.into()))
    }

    /// Decode a message payload into an envelope.
    ///
    /// `Out` payloads run the chain below, first match wins; every other
    /// kind passes its payload through unchanged under a key named after
    /// the kind, with no decode attempt.
    ///
    /// 1. Payload parses to a JSON object: take its `data` and `context`
    ///    fields. A string `data` wraps as `{msg: data}`; an object
    ///    `data` is used as-is; anything else carries no keys to route.
    /// 2. Payload parses to a JSON string: `{msg: <parsed string>}`.
    /// 3. Payload parses to any other JSON type, or does not parse at
    ///    all: `{msg: <original raw payload>}`, never a
    ///    re-serialization of the parsed value.
    #[must_use]
    pub fn decode(kind: MessageKind, payload: &str) -> Self {
        match kind {
            MessageKind::Out => Self::decode_out(payload),
            MessageKind::Err => Self::single("err", payload),
            MessageKind::Sys => Self::single("sys", payload),
            MessageKind::Prompt => Self::single("prompt", payload),
            MessageKind::Debug => Self::single("debug", payload),
        }
    }

    fn decode_out(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(mut fields)) => {
                // Only a string tag can ever match a display panel.
                let context = match fields.remove("context") {
                    Some(Value::String(tag)) => Some(tag),
                    _ => None,
                };
                let data = match fields.remove("data") {
                    Some(Value::Object(map)) => map,
                    Some(Value::String(text)) => {
                        let mut map = Map::new();
                        map.insert(MSG_KEY.to_string(), Value::String(text));
                        map
                    }
                    // A non-mapping `data` carries no keys to route.
                    _ => Map::new(),
                };
                Self { data, context }
            }
            Ok(Value::String(text)) => Self::plain(text),
            Ok(_) | Err(_) => Self::plain(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::event::MessageKind;

    fn decode_out(payload: &str) -> Envelope {
        Envelope::decode(MessageKind::Out, payload)
    }

    #[test]
    fn test_non_json_payload_becomes_plain_message() {
        let envelope = decode_out("not json at all");
        assert_eq!(envelope, Envelope::plain("not json at all"));
        assert_eq!(envelope.context, None);
    }

    #[test]
    fn test_object_with_string_data_wraps_as_msg() {
        let envelope = decode_out(r#"{"data": "hello", "context": "x"}"#);
        assert_eq!(envelope.data.get(MSG_KEY), Some(&json!("hello")));
        assert_eq!(envelope.context.as_deref(), Some("x"));
    }

    #[test]
    fn test_object_with_mapping_data_used_as_is() {
        let envelope = decode_out(r#"{"data": {"a": 1, "b": 2}}"#);
        let keys: Vec<&str> = envelope.data.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(envelope.data.get("a"), Some(&json!(1)));
        assert_eq!(envelope.data.get("b"), Some(&json!(2)));
        assert_eq!(envelope.context, None);
    }

    #[test]
    fn test_data_keys_keep_wire_order() {
        let envelope = decode_out(r#"{"data": {"zeta": 1, "alpha": 2, "mid": 3}}"#);
        let keys: Vec<&str> = envelope.data.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_bare_json_string_unwraps() {
        let envelope = decode_out(r#""hi""#);
        assert_eq!(envelope, Envelope::plain("hi"));
    }

    #[test]
    fn test_json_number_keeps_original_raw_text() {
        // The parsed value is discarded; the raw text is what the player
        // sees.
        let envelope = decode_out("42");
        assert_eq!(envelope, Envelope::plain("42"));
    }

    #[test]
    fn test_json_array_keeps_original_raw_text() {
        let envelope = decode_out("[1, 2]");
        assert_eq!(envelope, Envelope::plain("[1, 2]"));
    }

    #[test]
    fn test_non_mapping_data_field_routes_nothing() {
        for payload in [r#"{"data": 5}"#, r#"{"data": null}"#, r#"{"nothing": 1}"#] {
            let envelope = decode_out(payload);
            assert!(envelope.data.is_empty(), "payload: {payload}");
        }
    }

    #[test]
    fn test_non_string_context_is_dropped() {
        let envelope = decode_out(r#"{"data": {"a": 1}, "context": 3}"#);
        assert_eq!(envelope.context, None);
        assert_eq!(envelope.data.get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_side_band_kinds_never_decode() {
        let raw = r#"{"data": "x"}"#;
        for (kind, key) in [
            (MessageKind::Err, "err"),
            (MessageKind::Sys, "sys"),
            (MessageKind::Prompt, "prompt"),
            (MessageKind::Debug, "debug"),
        ] {
            let envelope = Envelope::decode(kind, raw);
            assert_eq!(envelope.data.get(key), Some(&json!(raw)), "kind: {key}");
            assert_eq!(envelope.data.len(), 1);
            assert_eq!(envelope.context, None);
        }
    }
}
