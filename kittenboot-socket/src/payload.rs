//! Message body encoding and decoding.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Decoded body of an inbound message.
///
/// The server may push either JSON documents or opaque strings on the same
/// topic, so decoding never fails: anything that is not valid JSON is kept as
/// the raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Body parsed as JSON
    Json(Value),
    /// Body that did not parse as JSON, passed through unchanged
    Text(String),
}

impl Payload {
    /// Decode a message body.
    pub fn decode(body: &str) -> Self {
        match serde_json::from_str(body) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Text(body.to_string()),
        }
    }

    /// Get the JSON value, if the body was JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    /// Get the raw text, if the body was not JSON.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Json(_) => None,
            Payload::Text(text) => Some(text),
        }
    }

    /// Check if the body was JSON.
    pub fn is_json(&self) -> bool {
        matches!(self, Payload::Json(_))
    }

    /// Deserialize a JSON body into a typed value.
    ///
    /// Text bodies are offered to the deserializer as a JSON string, so a
    /// `String` target accepts both shapes.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self {
            Payload::Json(value) => serde_json::from_value(value.clone()),
            Payload::Text(text) => serde_json::from_value(Value::String(text.clone())),
        }
    }

    /// Consume the payload, returning a JSON value for either shape.
    pub fn into_value(self) -> Value {
        match self {
            Payload::Json(value) => value,
            Payload::Text(text) => Value::String(text),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Json(value) => write!(f, "{}", value),
            Payload::Text(text) => f.write_str(text),
        }
    }
}

/// Serialize an outbound body.
///
/// Values that are JSON-falsy (`null`, `false`, `0`, `""`) are sent as an
/// empty object, so servers always receive a JSON document.
pub fn encode_body<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(data)?;
    if is_falsy(&value) {
        return Ok(empty_body());
    }
    serde_json::to_string(&value)
}

/// The body sent when there is nothing to send.
pub fn empty_body() -> String {
    "{}".to_string()
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
