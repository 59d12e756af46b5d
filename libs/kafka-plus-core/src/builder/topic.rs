use std::collections::{BTreeMap, HashMap};

use rdkafka::admin::{NewTopic, TopicReplication};

use crate::error::KafkaPlusError;

/// Owned new-topic descriptor produced by [`NewTopicBuilder`].
///
/// Bridges to the borrowed [`NewTopic`] admin request via
/// [`TopicSpec::with_new_topic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSpec {
    name: String,
    num_partitions: i32,
    replication_factor: i32,
    replicas_assignments: Option<BTreeMap<i32, Vec<i32>>>,
    configs: Option<HashMap<String, String>>,
}

impl TopicSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_partitions(&self) -> i32 {
        self.num_partitions
    }

    pub fn replication_factor(&self) -> i32 {
        self.replication_factor
    }

    /// Explicit partition→replica-list assignment, when one was supplied.
    pub fn replicas_assignments(&self) -> Option<&BTreeMap<i32, Vec<i32>>> {
        self.replicas_assignments.as_ref()
    }

    pub fn configs(&self) -> Option<&HashMap<String, String>> {
        self.configs.as_ref()
    }

    /// Run `f` with the borrowed admin request for this descriptor.
    ///
    /// `NewTopic` borrows its name, config entries and replica assignment,
    /// so the request only exists inside this scope. Pass the yielded
    /// reference straight to `AdminClient::create_topics`.
    pub fn with_new_topic<R>(&self, f: impl FnOnce(&NewTopic<'_>) -> R) -> R {
        let assignment: Option<Vec<&[i32]>> = self
            .replicas_assignments
            .as_ref()
            .map(|a| a.values().map(Vec::as_slice).collect());

        let replication = match &assignment {
            Some(view) => TopicReplication::Variable(view.as_slice()),
            None => TopicReplication::Fixed(self.replication_factor),
        };

        let mut topic = NewTopic::new(&self.name, self.num_partitions, replication);
        if let Some(configs) = &self.configs {
            for (key, value) in configs {
                topic = topic.set(key, value);
            }
        }

        f(&topic)
    }
}

/// Fluent builder for a [`TopicSpec`].
///
/// An explicit replica assignment takes priority over partition count and
/// replication factor, which are then ignored.
#[derive(Debug, Default)]
pub struct NewTopicBuilder {
    name: Option<String>,
    num_partitions: Option<i32>,
    replication_factor: Option<i32>,
    replicas_assignments: Option<BTreeMap<i32, Vec<i32>>>,
    configs: Option<HashMap<String, String>>,
}

impl NewTopicBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Result<Self, KafkaPlusError> {
        let topic = topic.into();
        crate::checker::check_not_blank("topic", &topic)?;
        self.name = Some(topic);

        Ok(self)
    }

    pub fn num_partitions(mut self, num_partitions: i32) -> Self {
        self.num_partitions = Some(num_partitions);
        self
    }

    pub fn replication_factor(mut self, replication_factor: i32) -> Self {
        self.replication_factor = Some(replication_factor);
        self
    }

    /// Explicit partition→replica-list assignment. Keys must form the
    /// contiguous range `0..n`; the admin request carries the replica lists
    /// positionally.
    pub fn replicas_assignments(mut self, assignments: BTreeMap<i32, Vec<i32>>) -> Self {
        self.replicas_assignments = Some(assignments);
        self
    }

    /// Per-topic config overrides (e.g. `cleanup.policy`).
    pub fn configs(mut self, configs: HashMap<String, String>) -> Self {
        self.configs = Some(configs);
        self
    }

    pub fn build(self) -> Result<TopicSpec, KafkaPlusError> {
        let name = self
            .name
            .ok_or_else(|| KafkaPlusError::missing_field("topic"))?;

        if let Some(assignments) = &self.replicas_assignments {
            if assignments.is_empty() {
                return Err(KafkaPlusError::precondition(
                    "the replicas assignments can't be empty",
                ));
            }

            for (expected, partition) in assignments.keys().enumerate() {
                if *partition != expected as i32 {
                    return Err(KafkaPlusError::precondition(format!(
                        "the replicas assignments must cover partitions 0..{} contiguously",
                        assignments.len()
                    )));
                }
            }

            // Explicit assignment wins; count and factor are ignored.
            return Ok(TopicSpec {
                name,
                num_partitions: assignments.len() as i32,
                replication_factor: -1,
                replicas_assignments: self.replicas_assignments,
                configs: self.configs,
            });
        }

        Ok(TopicSpec {
            name,
            num_partitions: self.num_partitions.unwrap_or(1),
            replication_factor: self.replication_factor.unwrap_or(1),
            replicas_assignments: None,
            configs: self.configs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_one_partition_one_replica() {
        let spec = NewTopicBuilder::new().topic("orders").unwrap().build().unwrap();

        assert_eq!(spec.name(), "orders");
        assert_eq!(spec.num_partitions(), 1);
        assert_eq!(spec.replication_factor(), 1);
        assert!(spec.replicas_assignments().is_none());
    }

    #[test]
    fn test_missing_topic_name_fails() {
        let err = NewTopicBuilder::new().num_partitions(3).build().unwrap_err();
        assert_eq!(err.field(), Some("topic"));
    }

    #[test]
    fn test_blank_topic_name_fails() {
        let err = NewTopicBuilder::new().topic("").unwrap_err();
        assert_eq!(err.field(), Some("topic"));
    }

    #[test]
    fn test_assignment_wins_over_partition_count() {
        let mut assignments = BTreeMap::new();
        assignments.insert(0, vec![1, 2]);
        assignments.insert(1, vec![2, 3]);

        let spec = NewTopicBuilder::new()
            .topic("orders")
            .unwrap()
            .num_partitions(10)
            .replication_factor(5)
            .replicas_assignments(assignments.clone())
            .build()
            .unwrap();

        assert_eq!(spec.replicas_assignments(), Some(&assignments));
        assert_eq!(spec.num_partitions(), 2);
    }

    #[test]
    fn test_non_contiguous_assignment_fails() {
        let mut assignments = BTreeMap::new();
        assignments.insert(0, vec![1]);
        assignments.insert(2, vec![2]);

        let err = NewTopicBuilder::new()
            .topic("orders")
            .unwrap()
            .replicas_assignments(assignments)
            .build()
            .unwrap_err();

        assert!(matches!(err, KafkaPlusError::Precondition(_)));
    }

    #[test]
    fn test_empty_assignment_fails() {
        let err = NewTopicBuilder::new()
            .topic("orders")
            .unwrap()
            .replicas_assignments(BTreeMap::new())
            .build()
            .unwrap_err();

        assert!(matches!(err, KafkaPlusError::Precondition(_)));
    }

    #[test]
    fn test_with_new_topic_carries_config_overrides() {
        let mut configs = HashMap::new();
        configs.insert("cleanup.policy".to_string(), "compact".to_string());

        let spec = NewTopicBuilder::new()
            .topic("orders")
            .unwrap()
            .num_partitions(4)
            .configs(configs)
            .build()
            .unwrap();

        spec.with_new_topic(|topic| {
            assert_eq!(topic.name, "orders");
            assert_eq!(topic.num_partitions, 4);
        });
    }
}
