use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use rdkafka::producer::FutureProducer;

use crate::builder::ConfigSource;
use crate::checker::check_not_blank;
use crate::config;
use crate::config::Acks;
use crate::error::KafkaPlusError;
use crate::serialization::{CodecRef, Serializer};

/// Built producer: the underlying async client plus the resolved key and
/// value codecs, when any were supplied.
///
/// Derefs to [`FutureProducer`], so send/flush/transaction calls go straight
/// to the client library.
pub struct Producer {
    inner: FutureProducer,
    key_serializer: Option<Arc<dyn Serializer>>,
    value_serializer: Option<Arc<dyn Serializer>>,
}

impl Producer {
    pub fn key_serializer(&self) -> Option<&Arc<dyn Serializer>> {
        self.key_serializer.as_ref()
    }

    pub fn value_serializer(&self) -> Option<&Arc<dyn Serializer>> {
        self.value_serializer.as_ref()
    }

    pub fn inner(&self) -> &FutureProducer {
        &self.inner
    }
}

impl Deref for Producer {
    type Target = FutureProducer;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::fmt::Debug for Producer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Producer")
            .field("key_serializer", &self.key_serializer.is_some())
            .field("value_serializer", &self.value_serializer.is_some())
            .finish()
    }
}

/// Fluent builder for [`Producer`].
#[derive(Debug, Default)]
pub struct ProducerBuilder {
    source: ConfigSource,
    key_serializer: Option<CodecRef<dyn Serializer>>,
    value_serializer: Option<CodecRef<dyn Serializer>>,
}

impl ProducerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bootstrap_servers(mut self, servers: impl Into<String>) -> Result<Self, KafkaPlusError> {
        let servers = servers.into();
        check_not_blank(config::bootstrap::SERVERS, &servers)?;
        self.source.set(config::bootstrap::SERVERS, servers);

        Ok(self)
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Result<Self, KafkaPlusError> {
        let client_id = client_id.into();
        check_not_blank(config::producer::CLIENT_ID, &client_id)?;
        self.source.set(config::producer::CLIENT_ID, client_id);

        Ok(self)
    }

    pub fn acks(mut self, acks: Acks) -> Self {
        self.source.set(config::producer::ACKS, acks.as_str());
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.source
            .set(config::producer::RETRIES, retries.to_string());
        self
    }

    pub fn batch_size(mut self, bytes: u64) -> Self {
        self.source
            .set(config::producer::BATCH_SIZE, bytes.to_string());
        self
    }

    pub fn linger_ms(mut self, linger_ms: u64) -> Self {
        self.source
            .set(config::producer::LINGER_MS, linger_ms.to_string());
        self
    }

    pub fn request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.source
            .set(config::producer::REQUEST_TIMEOUT_MS, timeout_ms.to_string());
        self
    }

    pub fn delivery_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.source
            .set(config::producer::DELIVERY_TIMEOUT_MS, timeout_ms.to_string());
        self
    }

    pub fn idempotence(mut self, enabled: bool) -> Self {
        self.source
            .set(config::producer::ENABLE_IDEMPOTENCE, enabled.to_string());
        self
    }

    pub fn partitioner(mut self, partitioner: impl Into<String>) -> Result<Self, KafkaPlusError> {
        let partitioner = partitioner.into();
        check_not_blank(config::producer::PARTITIONER, &partitioner)?;
        self.source.set(config::producer::PARTITIONER, partitioner);

        Ok(self)
    }

    pub fn compression_type(mut self, codec: impl Into<String>) -> Result<Self, KafkaPlusError> {
        let codec = codec.into();
        check_not_blank(config::producer::COMPRESSION_TYPE, &codec)?;
        self.source.set(config::producer::COMPRESSION_TYPE, codec);

        Ok(self)
    }

    // ----------------------------------------------------------------

    /// Key codec, by registered name or live instance. Bypasses the option
    /// map entirely.
    pub fn key_serializer(mut self, codec: impl Into<CodecRef<dyn Serializer>>) -> Self {
        self.key_serializer = Some(codec.into());
        self
    }

    /// Value codec, by registered name or live instance. Bypasses the
    /// option map entirely.
    pub fn value_serializer(mut self, codec: impl Into<CodecRef<dyn Serializer>>) -> Self {
        self.value_serializer = Some(codec.into());
        self
    }

    // ----------------------------------------------------------------

    /// Use a pre-assembled configuration block instead of the option map.
    pub fn props(mut self, props: HashMap<String, String>) -> Self {
        self.source.set_props(props);
        self
    }

    /// Replace the option map wholesale.
    pub fn configs(mut self, configs: HashMap<String, String>) -> Self {
        self.source.set_configs(configs);
        self
    }

    /// Inspect the accumulated property set before building.
    pub fn check_props(self, f: impl FnOnce(Option<&HashMap<String, String>>)) -> Self {
        f(self.source.props());
        self
    }

    /// Inspect the accumulated option map before building.
    pub fn check_configs(self, f: impl FnOnce(Option<&HashMap<String, String>>)) -> Self {
        f(self.source.configs());
        self
    }

    // ----------------------------------------------------------------

    /// Construct the producer from the property set or the option map.
    pub fn build(self) -> Result<Producer, KafkaPlusError> {
        let config = self.source.client_config()?;

        // Codec names resolve before the client is constructed.
        let key_serializer = match &self.key_serializer {
            Some(codec) => Some(codec.resolve()?),
            None => None,
        };
        let value_serializer = match &self.value_serializer {
            Some(codec) => Some(codec.resolve()?),
            None => None,
        };

        let inner: FutureProducer = config.create()?;

        Ok(Producer {
            inner,
            key_serializer,
            value_serializer,
        })
    }
}
