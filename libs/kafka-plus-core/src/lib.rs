pub mod builder;
pub mod checker;
pub mod config;
pub mod error;
pub mod serialization;

pub use builder::admin::AdminBuilder;
pub use builder::consumer::{Consumer, ConsumerBuilder};
pub use builder::producer::{Producer, ProducerBuilder};
pub use builder::record::{OutboundRecord, OutboundRecordBuilder};
pub use builder::topic::{NewTopicBuilder, TopicSpec};
pub use error::KafkaPlusError;
