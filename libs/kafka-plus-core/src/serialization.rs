//! Codec seam between builders and the byte-oriented client library.
//!
//! Codecs work on [`serde_json::Value`] so that they stay object-safe; typed
//! helpers live with the concrete codec implementations. A codec can be
//! referenced either by a registered name (resolved lazily at build time) or
//! by a live instance; see [`CodecRef`].

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use serde_json::Value;

use crate::error::KafkaPlusError;

/// Error raised on encode/decode failure, wrapping the underlying codec error.
#[derive(Debug, thiserror::Error)]
#[error("serialization error: {message}")]
pub struct SerializationError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SerializationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), source: None }
    }

    pub fn wrap(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Encodes a value into wire bytes for `topic`.
pub trait Serializer: Send + Sync {
    fn serialize(&self, topic: &str, value: &Value) -> Result<Vec<u8>, SerializationError>;
}

/// Decodes wire bytes received from `topic` back into a value.
pub trait Deserializer: Send + Sync {
    fn deserialize(&self, topic: &str, bytes: &[u8]) -> Result<Value, SerializationError>;
}

/// Reference to a codec: a registered name resolved at build time, or a
/// pre-constructed instance supplied directly.
#[derive(Clone)]
pub enum CodecRef<T: ?Sized> {
    Name(String),
    Instance(Arc<T>),
}

impl<T: ?Sized> std::fmt::Debug for CodecRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecRef::Name(name) => f.debug_tuple("Name").field(name).finish(),
            CodecRef::Instance(_) => f.debug_tuple("Instance").finish(),
        }
    }
}

impl<T: ?Sized> From<&str> for CodecRef<T> {
    fn from(name: &str) -> Self {
        CodecRef::Name(name.to_string())
    }
}

impl<T: ?Sized> From<String> for CodecRef<T> {
    fn from(name: String) -> Self {
        CodecRef::Name(name)
    }
}

impl<T: ?Sized> From<Arc<T>> for CodecRef<T> {
    fn from(instance: Arc<T>) -> Self {
        CodecRef::Instance(instance)
    }
}

impl CodecRef<dyn Serializer> {
    /// Resolve to a concrete serializer, consulting the registry for names.
    pub fn resolve(&self) -> Result<Arc<dyn Serializer>, KafkaPlusError> {
        match self {
            CodecRef::Instance(codec) => Ok(codec.clone()),
            CodecRef::Name(name) => registry().resolve_serializer(name),
        }
    }
}

impl CodecRef<dyn Deserializer> {
    /// Resolve to a concrete deserializer, consulting the registry for names.
    pub fn resolve(&self) -> Result<Arc<dyn Deserializer>, KafkaPlusError> {
        match self {
            CodecRef::Instance(codec) => Ok(codec.clone()),
            CodecRef::Name(name) => registry().resolve_deserializer(name),
        }
    }
}

// ---------------------------------------------------------------------------
// Name registry
// ---------------------------------------------------------------------------

/// Registry name of the built-in UTF-8 string codec.
pub const STRING_CODEC_NAME: &str = "string";

/// Process-wide name→codec registry. [`STRING_CODEC_NAME`] is built in;
/// adapters register additional names at startup.
pub struct CodecRegistry {
    serializers: RwLock<HashMap<String, Arc<dyn Serializer>>>,
    deserializers: RwLock<HashMap<String, Arc<dyn Deserializer>>>,
}

impl CodecRegistry {
    fn with_builtins() -> Self {
        let registry = Self {
            serializers: RwLock::new(HashMap::new()),
            deserializers: RwLock::new(HashMap::new()),
        };
        registry.register_serializer(STRING_CODEC_NAME, Arc::new(StringCodec));
        registry.register_deserializer(STRING_CODEC_NAME, Arc::new(StringCodec));
        registry
    }

    pub fn register_serializer(&self, name: &str, codec: Arc<dyn Serializer>) {
        let mut guard = match self.serializers.write() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("codec registry write lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        guard.insert(name.to_string(), codec);
    }

    pub fn register_deserializer(&self, name: &str, codec: Arc<dyn Deserializer>) {
        let mut guard = match self.deserializers.write() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("codec registry write lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        guard.insert(name.to_string(), codec);
    }

    pub fn resolve_serializer(&self, name: &str) -> Result<Arc<dyn Serializer>, KafkaPlusError> {
        let guard = match self.serializers.read() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("codec registry read lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        guard
            .get(name)
            .cloned()
            .ok_or_else(|| KafkaPlusError::missing_field(format!("serializer '{name}'")))
    }

    pub fn resolve_deserializer(&self, name: &str) -> Result<Arc<dyn Deserializer>, KafkaPlusError> {
        let guard = match self.deserializers.read() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("codec registry read lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        guard
            .get(name)
            .cloned()
            .ok_or_else(|| KafkaPlusError::missing_field(format!("deserializer '{name}'")))
    }
}

/// The process-wide codec registry.
pub fn registry() -> &'static CodecRegistry {
    static REGISTRY: OnceLock<CodecRegistry> = OnceLock::new();
    REGISTRY.get_or_init(CodecRegistry::with_builtins)
}

// ---------------------------------------------------------------------------
// Built-in string codec
// ---------------------------------------------------------------------------

/// UTF-8 string codec: `Value::String` ↔ its raw bytes.
pub struct StringCodec;

impl Serializer for StringCodec {
    fn serialize(&self, _topic: &str, value: &Value) -> Result<Vec<u8>, SerializationError> {
        match value {
            Value::String(s) => Ok(s.clone().into_bytes()),
            other => Err(SerializationError::new(format!(
                "string codec: expected a string value, got {other}"
            ))),
        }
    }
}

impl Deserializer for StringCodec {
    fn deserialize(&self, _topic: &str, bytes: &[u8]) -> Result<Value, SerializationError> {
        let s = std::str::from_utf8(bytes)
            .map_err(|e| SerializationError::wrap("string codec: payload is not UTF-8", e))?;
        Ok(Value::String(s.to_string()))
    }
}
