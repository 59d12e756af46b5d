//! JSON codec for Kafka payloads.
//!
//! Serialization drops null object entries at every nesting depth, so
//! optional fields absent on one side stay absent on the wire. Deserialization is
//! tolerant of fields unknown to the caller's target type, since typed
//! decoding happens at the edge via [`from_json_bytes`].

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use kafka_plus_core::serialization::{
    Deserializer, SerializationError, Serializer, registry,
};

/// Registry name both codecs are installed under.
pub const CODEC_NAME: &str = "json";

/// How incoming bytes are interpreted before JSON parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    /// Reject payloads that are not valid UTF-8.
    #[default]
    Utf8,
    /// Replace invalid UTF-8 sequences instead of failing.
    Utf8Lossy,
}

/// Serializes [`Value`]s as compact JSON bytes.
#[derive(Debug, Default)]
pub struct JsonSerializer;

impl JsonSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, topic: &str, value: &Value) -> Result<Vec<u8>, SerializationError> {
        let stripped = strip_null_entries(value);
        serde_json::to_vec(&stripped).map_err(|e| {
            SerializationError::wrap(format!("json codec: encoding for topic '{topic}' failed"), e)
        })
    }
}

/// Parses JSON bytes back into a [`Value`].
#[derive(Debug, Default)]
pub struct JsonDeserializer {
    encoding: Encoding,
}

impl JsonDeserializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoding(encoding: Encoding) -> Self {
        Self { encoding }
    }
}

impl Deserializer for JsonDeserializer {
    fn deserialize(&self, topic: &str, bytes: &[u8]) -> Result<Value, SerializationError> {
        let text = match self.encoding {
            Encoding::Utf8 => std::str::from_utf8(bytes)
                .map_err(|e| {
                    SerializationError::wrap(
                        format!("json codec: payload from topic '{topic}' is not UTF-8"),
                        e,
                    )
                })?
                .to_string(),
            Encoding::Utf8Lossy => String::from_utf8_lossy(bytes).into_owned(),
        };
        serde_json::from_str(&text).map_err(|e| {
            SerializationError::wrap(format!("json codec: decoding from topic '{topic}' failed"), e)
        })
    }
}

// Null object entries are dropped at every depth; null array elements are
// positional and stay.
fn strip_null_entries(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), strip_null_entries(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(strip_null_entries).collect()),
        other => other.clone(),
    }
}

/// Encode any serializable value as compact JSON bytes.
pub fn to_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    serde_json::to_vec(value).map_err(|e| SerializationError::wrap("json encoding failed", e))
}

/// Decode JSON bytes into the caller's target type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::wrap("json decoding failed", e))
}

/// Install both codecs in the process-wide registry under [`CODEC_NAME`].
pub fn register_codecs() {
    registry().register_serializer(CODEC_NAME, Arc::new(JsonSerializer::new()));
    registry().register_deserializer(CODEC_NAME, Arc::new(JsonDeserializer::new()));
}
