//! Recognized configuration option names and default values.
//!
//! Keys are the literal property names understood by the underlying client
//! library, grouped by client role. Pure data, no runtime behavior beyond
//! lookup.

use std::fmt;

use serde::Deserialize;

/// Property names shared by every client role, plus the default addresses.
pub mod bootstrap {
    /// Comma-separated list of `host:port` broker addresses.
    pub const SERVERS: &str = "bootstrap.servers";

    /// Default broker address for local development.
    pub const DEFAULT_LOCALHOST: &str = "localhost:9092";

    /// Loopback variant of [`DEFAULT_LOCALHOST`].
    pub const DEFAULT_LOOPBACK: &str = "127.0.0.1:9092";
}

/// Property names recognized by the admin builder.
pub mod admin {
    /// Logical client identifier reported to the broker.
    pub const CLIENT_ID: &str = "client.id";

    /// How long an admin request may wait for a broker response.
    pub const REQUEST_TIMEOUT_MS: &str = "request.timeout.ms";
}

/// Property names recognized by the consumer builder.
pub mod consumer {
    /// Consumer group the client joins for coordinated consumption.
    pub const GROUP_ID: &str = "group.id";

    /// Where to start when the group has no committed offset.
    pub const AUTO_OFFSET_RESET: &str = "auto.offset.reset";

    /// If true the consumer's offset is periodically committed in the
    /// background.
    pub const ENABLE_AUTO_COMMIT: &str = "enable.auto.commit";

    /// Whether to read past the last stable offset of open transactions.
    pub const ISOLATION_LEVEL: &str = "isolation.level";

    /// Static member id for static group membership.
    pub const GROUP_INSTANCE_ID: &str = "group.instance.id";

    /// Strategy the group coordinator uses to assign partitions to members.
    pub const PARTITION_ASSIGNMENT_STRATEGY: &str = "partition.assignment.strategy";
}

/// Property names recognized by the producer builder.
pub mod producer {
    /// Logical client identifier reported to the broker.
    pub const CLIENT_ID: &str = "client.id";

    /// Number of broker acknowledgments required per record.
    pub const ACKS: &str = "acks";

    /// How many times a failed send is retried.
    pub const RETRIES: &str = "retries";

    /// Maximum size in bytes of a record batch.
    pub const BATCH_SIZE: &str = "batch.size";

    /// How long to wait for more records before sending a batch.
    pub const LINGER_MS: &str = "linger.ms";

    /// How long a produce request may wait for a broker response.
    pub const REQUEST_TIMEOUT_MS: &str = "request.timeout.ms";

    /// Upper bound on time to report success or failure of a send.
    pub const DELIVERY_TIMEOUT_MS: &str = "delivery.timeout.ms";

    /// Exactly-once, in-order delivery per partition.
    pub const ENABLE_IDEMPOTENCE: &str = "enable.idempotence";

    /// Partitioner the client uses to map records to partitions.
    pub const PARTITIONER: &str = "partitioner";

    /// Compression codec applied to record batches.
    pub const COMPRESSION_TYPE: &str = "compression.type";
}

// ---------------------------------------------------------------------------
// Closed enumerations
// ---------------------------------------------------------------------------

/// Client running mode.
///
/// Declared for configuration binding; no logic consumes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    #[serde(alias = "STANDALONE")]
    Standalone,
    #[serde(alias = "CLUSTER")]
    Cluster,
}

/// Consumer offset-reset policy: where to start when no committed offset
/// exists for the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoOffsetReset {
    /// Automatically reset the offset to the earliest offset.
    #[serde(alias = "EARLIEST")]
    Earliest,
    /// Automatically reset the offset to the latest offset.
    #[serde(alias = "LATEST")]
    Latest,
    /// Surface an error to the consumer when no previous offset is found.
    #[serde(alias = "none", alias = "NONE", alias = "ERROR")]
    Error,
}

impl AutoOffsetReset {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutoOffsetReset::Earliest => "earliest",
            AutoOffsetReset::Latest => "latest",
            AutoOffsetReset::Error => "error",
        }
    }
}

impl fmt::Display for AutoOffsetReset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consumer transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    /// Return all messages, even those from aborted transactions.
    ReadUncommitted,
    /// Only return messages from committed transactions.
    ReadCommitted,
}

impl IsolationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => "read_uncommitted",
            IsolationLevel::ReadCommitted => "read_committed",
        }
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Producer acknowledgment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acks {
    /// Fire and forget; the producer does not wait for any acknowledgment.
    #[serde(alias = "0")]
    None,
    /// Wait for the partition leader only.
    #[serde(alias = "1")]
    Leader,
    /// Wait for the full set of in-sync replicas.
    All,
}

impl Acks {
    pub fn as_str(&self) -> &'static str {
        match self {
            Acks::None => "0",
            Acks::Leader => "1",
            Acks::All => "all",
        }
    }
}

impl fmt::Display for Acks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
