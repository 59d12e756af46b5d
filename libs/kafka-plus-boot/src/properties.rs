//! Typed binding of the `kafka.plus` configuration block.
//!
//! Properties are read from a TOML document and bound from the table at
//! [`PREFIX`]; everything outside that table is ignored, so the block can sit
//! inside a larger application config. Bound values seed the role builders
//! through [`KafkaPlusProperties::consumer_builder`],
//! [`KafkaPlusProperties::producer_builder`] and
//! [`KafkaPlusProperties::topic_specs`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use kafka_plus_core::builder::consumer::ConsumerBuilder;
use kafka_plus_core::builder::producer::ProducerBuilder;
use kafka_plus_core::builder::topic::{NewTopicBuilder, TopicSpec};
use kafka_plus_core::config::{Acks, AutoOffsetReset, Mode};
use kafka_plus_core::error::KafkaPlusError;

/// Table the binding is rooted at.
pub const PREFIX: &str = "kafka.plus";

#[derive(Debug, thiserror::Error)]
pub enum PropertiesError {
    #[error("failed to read properties file '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse properties")]
    Parse(#[from] toml::de::Error),
    #[error("no 'kafka.plus' table found")]
    MissingPrefix,
}

/// Root of the bound configuration block. Fields are public so callers can
/// adjust the binding before handing it to the bootstrap glue.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KafkaPlusProperties {
    pub mode: ModeProperties,
    pub bootstrap: BootstrapProperties,
    pub admin: AdminProperties,
    pub consumer: ConsumerProperties,
    pub producer: ProducerProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModeProperties {
    pub mode: Mode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BootstrapProperties {
    pub servers: String,
}

impl Default for BootstrapProperties {
    fn default() -> Self {
        Self {
            servers: default_servers(),
        }
    }
}

fn default_servers() -> String {
    kafka_plus_core::config::bootstrap::DEFAULT_LOCALHOST.to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminProperties {
    pub topics: Vec<TopicProperties>,
}

/// Declarative definition of one topic to create at startup.
///
/// Assignment keys are partition numbers; TOML table keys are strings, so
/// they are parsed when the definition is turned into a [`TopicSpec`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TopicProperties {
    pub topic: String,
    #[serde(alias = "numPartitions")]
    pub num_partitions: Option<i32>,
    #[serde(alias = "replicationFactor")]
    pub replication_factor: Option<i32>,
    #[serde(alias = "replicasAssignments")]
    pub replicas_assignments: BTreeMap<String, Vec<i32>>,
}

impl TopicProperties {
    fn to_spec(&self) -> Result<TopicSpec, KafkaPlusError> {
        let mut builder = NewTopicBuilder::new().topic(self.topic.as_str())?;

        if let Some(num_partitions) = self.num_partitions {
            builder = builder.num_partitions(num_partitions);
        }
        if let Some(replication_factor) = self.replication_factor {
            builder = builder.replication_factor(replication_factor);
        }

        if !self.replicas_assignments.is_empty() {
            let mut assignments = BTreeMap::new();
            for (partition, replicas) in &self.replicas_assignments {
                let partition: i32 = partition.parse().map_err(|_| {
                    KafkaPlusError::precondition(format!(
                        "partition '{partition}' of topic '{}' is not a number",
                        self.topic
                    ))
                })?;
                assignments.insert(partition, replicas.clone());
            }
            builder = builder.replicas_assignments(assignments);
        }

        builder.build()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsumerProperties {
    #[serde(alias = "keyDeserializer")]
    pub key_deserializer: Option<String>,
    #[serde(alias = "valueDeserializer")]
    pub value_deserializer: Option<String>,
    #[serde(alias = "autoOffsetReset")]
    pub auto_offset_reset: Option<AutoOffsetReset>,
    #[serde(alias = "groupId")]
    pub group_id: Option<String>,
    #[serde(alias = "autoCommit")]
    pub auto_commit: Option<bool>,
    /// Comma-separated list of topics to subscribe to.
    pub subscribes: Option<String>,
}

impl Default for ConsumerProperties {
    fn default() -> Self {
        Self {
            key_deserializer: default_codec(),
            value_deserializer: default_codec(),
            auto_offset_reset: None,
            group_id: None,
            auto_commit: None,
            subscribes: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProducerProperties {
    #[serde(alias = "keySerializer")]
    pub key_serializer: Option<String>,
    #[serde(alias = "valueSerializer")]
    pub value_serializer: Option<String>,
    pub partitioner: Option<String>,
    pub interceptor: Option<String>,
    pub acks: Option<Acks>,
    pub retries: Option<u32>,
    #[serde(alias = "batchSize")]
    pub batch_size: Option<u64>,
    #[serde(alias = "bufferMemorySize")]
    pub buffer_memory_size: Option<u64>,
    #[serde(alias = "lingerMs")]
    pub linger_ms: Option<u64>,
    #[serde(alias = "maxBlockMs")]
    pub max_block_ms: Option<u64>,
    #[serde(alias = "requestTimeoutMs")]
    pub request_timeout_ms: Option<u64>,
    #[serde(alias = "deliveryTimeoutMs")]
    pub delivery_timeout_ms: Option<u64>,
    pub idempotence: Option<bool>,
}

impl Default for ProducerProperties {
    fn default() -> Self {
        Self {
            key_serializer: default_codec(),
            value_serializer: default_codec(),
            partitioner: None,
            interceptor: None,
            acks: None,
            retries: None,
            batch_size: None,
            buffer_memory_size: None,
            linger_ms: None,
            max_block_ms: None,
            request_timeout_ms: None,
            delivery_timeout_ms: None,
            idempotence: None,
        }
    }
}

fn default_codec() -> Option<String> {
    Some(kafka_plus_core::serialization::STRING_CODEC_NAME.to_string())
}

impl KafkaPlusProperties {
    /// Read and bind the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PropertiesError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PropertiesError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Bind from an in-memory TOML document.
    pub fn parse(input: &str) -> Result<Self, PropertiesError> {
        let doc: toml::Value = toml::from_str(input)?;
        let section = PREFIX
            .split('.')
            .try_fold(&doc, |table, key| table.get(key))
            .ok_or(PropertiesError::MissingPrefix)?;

        Ok(section.clone().try_into()?)
    }

    // ----------------------------------------------------------------

    /// Built topic descriptors for every declared topic.
    pub fn topic_specs(&self) -> Result<Vec<TopicSpec>, KafkaPlusError> {
        self.admin.topics.iter().map(TopicProperties::to_spec).collect()
    }

    /// Consumer builder seeded with the bound defaults, subscription
    /// included.
    pub fn consumer_builder(&self) -> Result<ConsumerBuilder, KafkaPlusError> {
        let mut builder =
            ConsumerBuilder::new().bootstrap_servers(self.bootstrap.servers.as_str())?;

        if let Some(group_id) = &self.consumer.group_id {
            builder = builder.group_id(group_id.as_str())?;
        }
        if let Some(reset) = self.consumer.auto_offset_reset {
            builder = builder.auto_offset_reset(reset);
        }
        if let Some(auto_commit) = self.consumer.auto_commit {
            builder = builder.auto_commit_enabled(auto_commit);
        }
        if let Some(codec) = &self.consumer.key_deserializer {
            builder = builder.key_deserializer(codec.as_str());
        }
        if let Some(codec) = &self.consumer.value_deserializer {
            builder = builder.value_deserializer(codec.as_str());
        }

        let topics = self.subscribe_topics();
        if !topics.is_empty() {
            builder = builder.subscribe(topics);
        }

        Ok(builder)
    }

    /// Producer builder seeded with the bound defaults.
    ///
    /// `buffer_memory_size`, `max_block_ms` and `interceptor` stay on the
    /// binding only; the underlying client has no matching option.
    pub fn producer_builder(&self) -> Result<ProducerBuilder, KafkaPlusError> {
        let mut builder =
            ProducerBuilder::new().bootstrap_servers(self.bootstrap.servers.as_str())?;

        if let Some(partitioner) = &self.producer.partitioner {
            builder = builder.partitioner(partitioner.as_str())?;
        }
        if let Some(acks) = self.producer.acks {
            builder = builder.acks(acks);
        }
        if let Some(retries) = self.producer.retries {
            builder = builder.retries(retries);
        }
        if let Some(batch_size) = self.producer.batch_size {
            builder = builder.batch_size(batch_size);
        }
        if let Some(linger_ms) = self.producer.linger_ms {
            builder = builder.linger_ms(linger_ms);
        }
        if let Some(timeout) = self.producer.request_timeout_ms {
            builder = builder.request_timeout_ms(timeout);
        }
        if let Some(timeout) = self.producer.delivery_timeout_ms {
            builder = builder.delivery_timeout_ms(timeout);
        }
        if let Some(idempotence) = self.producer.idempotence {
            builder = builder.idempotence(idempotence);
        }
        if let Some(codec) = &self.producer.key_serializer {
            builder = builder.key_serializer(codec.as_str());
        }
        if let Some(codec) = &self.producer.value_serializer {
            builder = builder.value_serializer(codec.as_str());
        }

        Ok(builder)
    }

    /// The `subscribes` list split on commas, trimmed, empties dropped.
    pub fn subscribe_topics(&self) -> Vec<String> {
        self.consumer
            .subscribes
            .as_deref()
            .map(|subscribes| {
                subscribes
                    .split(',')
                    .map(str::trim)
                    .filter(|topic| !topic.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kafka_plus_core::config;

    const FULL: &str = r#"
[kafka.plus.mode]
mode = "CLUSTER"

[kafka.plus.bootstrap]
servers = "broker-1:9092,broker-2:9092"

[[kafka.plus.admin.topics]]
topic = "orders"
numPartitions = 3
replicationFactor = 2

[[kafka.plus.admin.topics]]
topic = "payments"

[kafka.plus.consumer]
groupId = "orders-group"
autoOffsetReset = "EARLIEST"
autoCommit = false
valueDeserializer = "json"
subscribes = "orders, payments"

[kafka.plus.producer]
acks = "all"
retries = 5
lingerMs = 20
idempotence = true
valueSerializer = "json"
interceptor = "audit"
"#;

    #[test]
    fn test_binding_under_prefix() {
        let props = KafkaPlusProperties::parse(FULL).unwrap();

        assert_eq!(props.mode.mode, Mode::Cluster);
        assert_eq!(props.bootstrap.servers, "broker-1:9092,broker-2:9092");
        assert_eq!(props.consumer.group_id.as_deref(), Some("orders-group"));
        assert_eq!(props.consumer.auto_offset_reset, Some(AutoOffsetReset::Earliest));
        assert_eq!(props.producer.acks, Some(Acks::All));
        assert_eq!(props.producer.linger_ms, Some(20));
        assert_eq!(props.producer.interceptor.as_deref(), Some("audit"));
        assert_eq!(props.producer.value_serializer.as_deref(), Some("json"));
        assert_eq!(props.producer.key_serializer.as_deref(), Some("string"));
        assert_eq!(props.subscribe_topics(), vec!["orders", "payments"]);
    }

    #[test]
    fn test_missing_prefix_is_an_error() {
        let err = KafkaPlusProperties::parse("[something.else]\nx = 1\n").unwrap_err();
        assert!(matches!(err, PropertiesError::MissingPrefix));
    }

    #[test]
    fn test_empty_block_binds_defaults() {
        let props = KafkaPlusProperties::parse("[kafka.plus]\n").unwrap();

        assert_eq!(props.mode.mode, Mode::Standalone);
        assert_eq!(props.bootstrap.servers, config::bootstrap::DEFAULT_LOCALHOST);
        assert!(props.admin.topics.is_empty());
        assert!(props.subscribe_topics().is_empty());
        assert_eq!(props.consumer.key_deserializer.as_deref(), Some("string"));
        assert_eq!(props.consumer.value_deserializer.as_deref(), Some("string"));
        assert_eq!(props.producer.key_serializer.as_deref(), Some("string"));
        assert_eq!(props.producer.value_serializer.as_deref(), Some("string"));
    }

    #[test]
    fn test_topic_specs_from_declarations() {
        let props = KafkaPlusProperties::parse(FULL).unwrap();

        let specs = props.topic_specs().unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name(), "orders");
        assert_eq!(specs[0].num_partitions(), 3);
        assert_eq!(specs[0].replication_factor(), 2);
        assert_eq!(specs[1].num_partitions(), 1);
    }

    #[test]
    fn test_topic_assignment_keys_are_parsed() {
        let input = r#"
[[kafka.plus.admin.topics]]
topic = "orders"

[kafka.plus.admin.topics.replicasAssignments]
0 = [1, 2]
1 = [2, 3]
"#;
        let props = KafkaPlusProperties::parse(input).unwrap();

        let specs = props.topic_specs().unwrap();
        let assignments = specs[0].replicas_assignments().unwrap();
        assert_eq!(assignments.get(&0), Some(&vec![1, 2]));
        assert_eq!(assignments.get(&1), Some(&vec![2, 3]));
    }

    #[test]
    fn test_non_numeric_assignment_key_fails() {
        let input = r#"
[[kafka.plus.admin.topics]]
topic = "orders"

[kafka.plus.admin.topics.replicasAssignments]
first = [1, 2]
"#;
        let props = KafkaPlusProperties::parse(input).unwrap();

        let err = props.topic_specs().unwrap_err();
        assert!(matches!(err, KafkaPlusError::Precondition(_)));
    }

    #[test]
    fn test_consumer_builder_carries_bound_options() {
        let props = KafkaPlusProperties::parse(FULL).unwrap();

        props.consumer_builder().unwrap().check_configs(|configs| {
            let configs = configs.expect("option map populated");
            assert_eq!(
                configs.get(config::bootstrap::SERVERS).map(String::as_str),
                Some("broker-1:9092,broker-2:9092")
            );
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
                Some("false")
            );
        });
    }

    #[test]
    fn test_producer_builder_carries_bound_options() {
        let props = KafkaPlusProperties::parse(FULL).unwrap();

        props.producer_builder().unwrap().check_configs(|configs| {
            let configs = configs.expect("option map populated");
            assert_eq!(
                configs.get(config::producer::ACKS).map(String::as_str),
                Some("all")
            );
            assert_eq!(
                configs.get(config::producer::RETRIES).map(String::as_str),
                Some("5")
            );
            assert_eq!(
                configs.get(config::producer::LINGER_MS).map(String::as_str),
                Some("20")
            );
            assert_eq!(
                configs
                    .get(config::producer::ENABLE_IDEMPOTENCE)
                    .map(String::as_str),
                Some("true")
            );
        });
    }
}
