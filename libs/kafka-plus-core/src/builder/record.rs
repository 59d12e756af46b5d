use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::FutureRecord;

use crate::checker::check_not_blank;
use crate::error::KafkaPlusError;

/// Owned outbound record descriptor produced by [`OutboundRecordBuilder`].
///
/// The key is nullable; the value is required. [`OutboundRecord::as_future_record`]
/// yields the borrowed send request for `FutureProducer::send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRecord {
    topic: String,
    partition: Option<i32>,
    key: Option<Vec<u8>>,
    value: Vec<u8>,
    headers: Vec<(String, Vec<u8>)>,
    timestamp: Option<i64>,
}

impl OutboundRecord {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn partition(&self) -> Option<i32> {
        self.partition
    }

    pub fn key(&self) -> Option<&[u8]> {
        self.key.as_deref()
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn headers(&self) -> &[(String, Vec<u8>)] {
        &self.headers
    }

    /// Record timestamp in milliseconds since the epoch, when set.
    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    /// Borrowed send request over this record's buffers.
    pub fn as_future_record(&self) -> FutureRecord<'_, [u8], [u8]> {
        let mut record: FutureRecord<'_, [u8], [u8]> =
            FutureRecord::to(&self.topic).payload(self.value.as_slice());

        if let Some(partition) = self.partition {
            record = record.partition(partition);
        }
        if let Some(key) = &self.key {
            record = record.key(key.as_slice());
        }
        if let Some(timestamp) = self.timestamp {
            record = record.timestamp(timestamp);
        }
        if !self.headers.is_empty() {
            let mut headers = OwnedHeaders::new();
            for (key, value) in &self.headers {
                headers = headers.insert(Header {
                    key,
                    value: Some(value.as_slice()),
                });
            }
            record = record.headers(headers);
        }

        record
    }
}

/// Fluent builder for [`OutboundRecord`].
#[derive(Debug, Default)]
pub struct OutboundRecordBuilder {
    topic: Option<String>,
    partition: Option<i32>,
    key: Option<Vec<u8>>,
    value: Option<Vec<u8>>,
    headers: Vec<(String, Vec<u8>)>,
    timestamp: Option<i64>,
}

impl OutboundRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Result<Self, KafkaPlusError> {
        let topic = topic.into();
        check_not_blank("topic", &topic)?;
        self.topic = Some(topic);

        Ok(self)
    }

    pub fn partition(mut self, partition: i32) -> Self {
        self.partition = Some(partition);
        self
    }

    /// Record key. Optional; a record without a key is valid.
    pub fn key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn value(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Append one header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Replace the header collection wholesale.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Record timestamp in milliseconds since the epoch.
    pub fn timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp = Some(timestamp_ms);
        self
    }

    pub fn build(self) -> Result<OutboundRecord, KafkaPlusError> {
        let topic = self
            .topic
            .ok_or_else(|| KafkaPlusError::missing_field("topic"))?;

        // Key stays nullable; only the value is required.
        let value = self
            .value
            .ok_or_else(|| KafkaPlusError::missing_field("value"))?;

        Ok(OutboundRecord {
            topic,
            partition: self.partition,
            key: self.key,
            value,
            headers: self.headers,
            timestamp: self.timestamp,
        })
    }
}
