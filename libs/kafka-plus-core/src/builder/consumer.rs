use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use rdkafka::consumer::{Consumer as RdConsumer, StreamConsumer};

use crate::builder::ConfigSource;
use crate::checker::check_not_blank;
use crate::config;
use crate::config::{AutoOffsetReset, IsolationLevel};
use crate::error::KafkaPlusError;
use crate::serialization::{CodecRef, Deserializer};

/// Built consumer: the underlying streaming client plus the resolved key and
/// value codecs, when any were supplied.
///
/// Derefs to [`StreamConsumer`], so poll/commit/assignment calls go straight
/// to the client library.
pub struct Consumer {
    inner: StreamConsumer,
    key_deserializer: Option<Arc<dyn Deserializer>>,
    value_deserializer: Option<Arc<dyn Deserializer>>,
}

impl Consumer {
    pub fn key_deserializer(&self) -> Option<&Arc<dyn Deserializer>> {
        self.key_deserializer.as_ref()
    }

    pub fn value_deserializer(&self) -> Option<&Arc<dyn Deserializer>> {
        self.value_deserializer.as_ref()
    }

    pub fn inner(&self) -> &StreamConsumer {
        &self.inner
    }
}

impl Deref for Consumer {
    type Target = StreamConsumer;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::fmt::Debug for Consumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Consumer")
            .field("key_deserializer", &self.key_deserializer.is_some())
            .field("value_deserializer", &self.value_deserializer.is_some())
            .finish()
    }
}

/// Fluent builder for [`Consumer`].
///
/// When a topic set was supplied through [`ConsumerBuilder::subscribe`], the
/// freshly built client is subscribed to it before being returned.
#[derive(Debug, Default)]
pub struct ConsumerBuilder {
    source: ConfigSource,
    key_deserializer: Option<CodecRef<dyn Deserializer>>,
    value_deserializer: Option<CodecRef<dyn Deserializer>>,
    topics: Vec<String>,
}

impl ConsumerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bootstrap_servers(mut self, servers: impl Into<String>) -> Result<Self, KafkaPlusError> {
        let servers = servers.into();
        check_not_blank(config::bootstrap::SERVERS, &servers)?;
        self.source.set(config::bootstrap::SERVERS, servers);

        Ok(self)
    }

    pub fn group_id(mut self, group_id: impl Into<String>) -> Result<Self, KafkaPlusError> {
        let group_id = group_id.into();
        check_not_blank(config::consumer::GROUP_ID, &group_id)?;
        self.source.set(config::consumer::GROUP_ID, group_id);

        Ok(self)
    }

    pub fn auto_offset_reset(mut self, reset: AutoOffsetReset) -> Self {
        self.source
            .set(config::consumer::AUTO_OFFSET_RESET, reset.as_str());
        self
    }

    pub fn auto_commit_enabled(mut self, enabled: bool) -> Self {
        self.source
            .set(config::consumer::ENABLE_AUTO_COMMIT, enabled.to_string());
        self
    }

    pub fn isolation_level(mut self, level: IsolationLevel) -> Self {
        self.source
            .set(config::consumer::ISOLATION_LEVEL, level.as_str());
        self
    }

    pub fn instance_id(mut self, instance_id: impl Into<String>) -> Result<Self, KafkaPlusError> {
        let instance_id = instance_id.into();
        check_not_blank(config::consumer::GROUP_INSTANCE_ID, &instance_id)?;
        self.source
            .set(config::consumer::GROUP_INSTANCE_ID, instance_id);

        Ok(self)
    }

    pub fn strategy(mut self, strategy: impl Into<String>) -> Result<Self, KafkaPlusError> {
        let strategy = strategy.into();
        check_not_blank(config::consumer::PARTITION_ASSIGNMENT_STRATEGY, &strategy)?;
        self.source
            .set(config::consumer::PARTITION_ASSIGNMENT_STRATEGY, strategy);

        Ok(self)
    }

    // ----------------------------------------------------------------

    /// Key codec, by registered name or live instance. Bypasses the option
    /// map entirely.
    pub fn key_deserializer(mut self, codec: impl Into<CodecRef<dyn Deserializer>>) -> Self {
        self.key_deserializer = Some(codec.into());
        self
    }

    /// Value codec, by registered name or live instance. Bypasses the
    /// option map entirely.
    pub fn value_deserializer(mut self, codec: impl Into<CodecRef<dyn Deserializer>>) -> Self {
        self.value_deserializer = Some(codec.into());
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

    /// Topic set the built client subscribes to before being returned.
    pub fn subscribe<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    // ----------------------------------------------------------------

    /// Construct the consumer from the property set or the option map.
    pub fn build(self) -> Result<Consumer, KafkaPlusError> {
        let config = self.source.client_config()?;

        // Codec names resolve before the client is constructed.
        let key_deserializer = match &self.key_deserializer {
            Some(codec) => Some(codec.resolve()?),
            None => None,
        };
        let value_deserializer = match &self.value_deserializer {
            Some(codec) => Some(codec.resolve()?),
            None => None,
        };

        let inner: StreamConsumer = config.create()?;

        if !self.topics.is_empty() {
            let topics: Vec<&str> = self.topics.iter().map(String::as_str).collect();
            inner.subscribe(&topics)?;
        }

        Ok(Consumer {
            inner,
            key_deserializer,
            value_deserializer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_any_source_fails() {
        let err = ConsumerBuilder::new().build().unwrap_err();
        assert!(matches!(err, KafkaPlusError::Precondition(_)));
    }

    #[test]
    fn test_blank_group_id_rejected() {
        let err = ConsumerBuilder::new().group_id("").unwrap_err();
        assert_eq!(err.field(), Some("group.id"));
    }

    #[test]
    fn test_blank_instance_id_rejected() {
        let err = ConsumerBuilder::new().instance_id("  ").unwrap_err();
        assert_eq!(err.field(), Some("group.instance.id"));
    }

    #[test]
    fn test_option_map_accumulates_registry_keys() {
        ConsumerBuilder::new()
            .bootstrap_servers(config::bootstrap::DEFAULT_LOCALHOST)
            .unwrap()
            .group_id("orders-group")
            .unwrap()
            .auto_offset_reset(AutoOffsetReset::Earliest)
            .auto_commit_enabled(true)
            .isolation_level(IsolationLevel::ReadCommitted)
            .instance_id("orders-0")
            .unwrap()
            .strategy("cooperative-sticky")
            .unwrap()
            .check_configs(|configs| {
                let configs = configs.expect("option map populated");
                assert_eq!(
                    configs.get(config::consumer::GROUP_ID).map(String::as_str),
                    Some("orders-group")
                );
                assert_eq!(
                    configs
                        .get(config::consumer::AUTO_OFFSET_RESET)
                        .map(String::as_str),
                    Some("earliest")
                );
                assert_eq!(
                    configs
                        .get(config::consumer::ENABLE_AUTO_COMMIT)
                        .map(String::as_str),
                    Some("true")
                );
                assert_eq!(
                    configs
                        .get(config::consumer::ISOLATION_LEVEL)
                        .map(String::as_str),
                    Some("read_committed")
                );
                assert_eq!(
                    configs
                        .get(config::consumer::GROUP_INSTANCE_ID)
                        .map(String::as_str),
                    Some("orders-0")
                );
                assert_eq!(
                    configs
                        .get(config::consumer::PARTITION_ASSIGNMENT_STRATEGY)
                        .map(String::as_str),
                    Some("cooperative-sticky")
                );
            });
    }

    #[tokio::test]
    async fn test_build_from_props_with_resolved_codecs() {
        let mut props = HashMap::new();
        props.insert(
            config::bootstrap::SERVERS.to_string(),
            config::bootstrap::DEFAULT_LOCALHOST.to_string(),
        );
        props.insert(config::consumer::GROUP_ID.to_string(), "probe".to_string());

        let consumer = ConsumerBuilder::new()
            .props(props)
            .key_deserializer("string")
            .value_deserializer("string")
            .build()
            .unwrap();

        assert!(consumer.key_deserializer().is_some());
        assert!(consumer.value_deserializer().is_some());
    }

    #[test]
    fn test_unknown_codec_name_fails_build() {
        let mut props = HashMap::new();
        props.insert(
            config::bootstrap::SERVERS.to_string(),
            config::bootstrap::DEFAULT_LOCALHOST.to_string(),
        );

        let err = ConsumerBuilder::new()
            .props(props)
            .value_deserializer("no-such-codec")
            .build()
            .unwrap_err();

        assert!(matches!(err, KafkaPlusError::MissingField { .. }));
    }
}
