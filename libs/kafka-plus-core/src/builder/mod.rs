//! Fluent builders for the admin, consumer, producer, topic and outbound
//! record objects of the underlying client library.

use std::collections::HashMap;

use rdkafka::ClientConfig;

use crate::error::KafkaPlusError;

pub mod admin;
pub mod consumer;
pub mod producer;
pub mod record;
pub mod topic;

/// Shared builder state: the string-keyed option map populated by fluent
/// setters, and the alternate raw property set (a pre-assembled configuration
/// block, e.g. loaded from a file).
///
/// At build time the property set is checked first and wins when both are
/// populated; the option map is the fallback. Neither populated is a
/// precondition failure.
#[derive(Debug, Default)]
pub struct ConfigSource {
    configs: Option<HashMap<String, String>>,
    props: Option<HashMap<String, String>>,
}

impl ConfigSource {
    /// Write one option under `key`, lazily allocating the option map.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.configs
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value.into());
    }

    /// Replace the option map wholesale.
    pub fn set_configs(&mut self, configs: HashMap<String, String>) {
        self.configs = Some(configs);
    }

    /// Replace the raw property set wholesale.
    pub fn set_props(&mut self, props: HashMap<String, String>) {
        self.props = Some(props);
    }

    pub fn configs(&self) -> Option<&HashMap<String, String>> {
        self.configs.as_ref()
    }

    pub fn props(&self) -> Option<&HashMap<String, String>> {
        self.props.as_ref()
    }

    /// Fail unless the raw property set is populated.
    pub fn ensure_props(&self) -> Result<&HashMap<String, String>, KafkaPlusError> {
        match &self.props {
            Some(props) if !props.is_empty() => Ok(props),
            _ => Err(KafkaPlusError::precondition("the props can't be null/empty")),
        }
    }

    /// Fail unless the option map is populated.
    pub fn ensure_configs(&self) -> Result<&HashMap<String, String>, KafkaPlusError> {
        match &self.configs {
            Some(configs) if !configs.is_empty() => Ok(configs),
            _ => Err(KafkaPlusError::precondition(
                "the configs can't be null/empty",
            )),
        }
    }

    /// Assemble the client configuration from whichever source is populated.
    ///
    /// The property set takes precedence when present; otherwise the option
    /// map is used. Errors when the chosen source is empty or neither was
    /// ever populated.
    pub fn client_config(&self) -> Result<ClientConfig, KafkaPlusError> {
        let source = if self.props.is_some() {
            self.ensure_props()?
        } else {
            self.ensure_configs()?
        };

        let mut config = ClientConfig::new();
        for (key, value) in source {
            config.set(key.as_str(), value.as_str());
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_before_any_source_fails() {
        let source = ConfigSource::default();
        let err = source.client_config().unwrap_err();
        assert!(matches!(err, KafkaPlusError::Precondition(_)));
    }

    #[test]
    fn test_empty_props_fail_even_with_configs_present() {
        // Props are checked first; an explicitly supplied empty set is a
        // precondition failure, not a silent fallback.
        let mut source = ConfigSource::default();
        source.set("bootstrap.servers", "localhost:9092");
        source.set_props(HashMap::new());

        assert!(source.client_config().is_err());
    }

    #[test]
    fn test_props_win_over_configs_when_both_populated() {
        // Props-first is the shipped precedence; pinned here.
        let mut source = ConfigSource::default();
        source.set("bootstrap.servers", "from-configs:9092");

        let mut props = HashMap::new();
        props.insert("bootstrap.servers".to_string(), "from-props:9092".to_string());
        source.set_props(props);

        let config = source.client_config().unwrap();
        assert_eq!(config.get("bootstrap.servers"), Some("from-props:9092"));
    }

    #[test]
    fn test_option_map_is_the_fallback() {
        let mut source = ConfigSource::default();
        source.set("bootstrap.servers", "localhost:9092");

        let config = source.client_config().unwrap();
        assert_eq!(config.get("bootstrap.servers"), Some("localhost:9092"));
    }
}
