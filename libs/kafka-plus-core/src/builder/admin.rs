use std::collections::HashMap;

use rdkafka::admin::AdminClient;
use rdkafka::client::DefaultClientContext;

use crate::builder::ConfigSource;
use crate::checker::check_not_blank;
use crate::config;
use crate::error::KafkaPlusError;

/// Fluent builder for the admin client.
///
/// Setters taking caller strings validate up front and return `Result`, so a
/// chain reads `AdminBuilder::new().bootstrap_servers(..)?.build()?`.
#[derive(Debug, Default)]
pub struct AdminBuilder {
    source: ConfigSource,
}

impl AdminBuilder {
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
        check_not_blank(config::admin::CLIENT_ID, &client_id)?;
        self.source.set(config::admin::CLIENT_ID, client_id);

        Ok(self)
    }

    pub fn request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.source
            .set(config::admin::REQUEST_TIMEOUT_MS, timeout_ms.to_string());
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

    /// Construct the admin client from the property set or the option map.
    pub fn build(self) -> Result<AdminClient<DefaultClientContext>, KafkaPlusError> {
        let admin = self.source.client_config()?.create()?;
        Ok(admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_any_source_fails() {
        let err = AdminBuilder::new().build().err().unwrap();
        assert!(matches!(err, KafkaPlusError::Precondition(_)));
    }

    #[test]
    fn test_blank_bootstrap_servers_rejected() {
        let err = AdminBuilder::new().bootstrap_servers("  ").unwrap_err();
        assert_eq!(err.field(), Some("bootstrap.servers"));
    }

    #[test]
    fn test_build_from_single_entry_props() {
        let mut props = HashMap::new();
        props.insert(
            config::bootstrap::SERVERS.to_string(),
            config::bootstrap::DEFAULT_LOCALHOST.to_string(),
        );

        let admin = AdminBuilder::new().props(props).build();
        assert!(admin.is_ok());
    }

    #[test]
    fn test_check_configs_sees_accumulated_options() {
        AdminBuilder::new()
            .bootstrap_servers(config::bootstrap::DEFAULT_LOOPBACK)
            .unwrap()
            .check_configs(|configs| {
                let configs = configs.expect("option map populated");
                assert_eq!(
                    configs.get(config::bootstrap::SERVERS).map(String::as_str),
                    Some(config::bootstrap::DEFAULT_LOOPBACK)
                );
            });
    }
}
