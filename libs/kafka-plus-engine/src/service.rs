//! Factory services, one per client role, each handing out a fresh builder.

use kafka_plus_core::builder::admin::AdminBuilder;
use kafka_plus_core::builder::consumer::ConsumerBuilder;
use kafka_plus_core::builder::producer::ProducerBuilder;
use kafka_plus_core::builder::record::OutboundRecordBuilder;
use kafka_plus_core::builder::topic::NewTopicBuilder;

/// Admin-side factory: admin clients and new-topic descriptors.
#[derive(Debug, Default)]
pub struct AdminService;

impl AdminService {
    pub fn new() -> Self {
        Self
    }

    pub fn create_admin(&self) -> AdminBuilder {
        AdminBuilder::new()
    }

    pub fn create_topic(&self) -> NewTopicBuilder {
        NewTopicBuilder::new()
    }
}

/// Consumer-side factory.
#[derive(Debug, Default)]
pub struct ConsumerService;

impl ConsumerService {
    pub fn new() -> Self {
        Self
    }

    pub fn create_consumer(&self) -> ConsumerBuilder {
        ConsumerBuilder::new()
    }
}

/// Producer-side factory: producer clients and outbound records.
#[derive(Debug, Default)]
pub struct ProducerService;

impl ProducerService {
    pub fn new() -> Self {
        Self
    }

    pub fn create_producer(&self) -> ProducerBuilder {
        ProducerBuilder::new()
    }

    pub fn create_record(&self) -> OutboundRecordBuilder {
        OutboundRecordBuilder::new()
    }
}
