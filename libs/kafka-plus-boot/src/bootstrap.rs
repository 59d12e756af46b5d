//! Startup glue: turns a bound configuration into a running engine.

use std::sync::Arc;

use kafka_plus_engine::{KafkaEngine, KafkaEngineHolder};

use crate::properties::KafkaPlusProperties;

/// Construct an engine from `props` and install it as the global engine.
///
/// The JSON codecs are registered first, so codec names bound in the
/// configuration resolve once builders run. The properties end up in the
/// engine's shared-object cache where downstream code can read them back.
/// Installation overwrites any previously registered engine.
pub fn bootstrap(props: KafkaPlusProperties) -> Arc<KafkaEngine> {
    kafka_plus_json::register_codecs();

    tracing::info!(
        servers = %props.bootstrap.servers,
        topics = props.admin.topics.len(),
        "bootstrapping kafka engine"
    );

    let engine = Arc::new(KafkaEngine::new());
    engine.shared_objects().set(props);
    KafkaEngineHolder::global().set_with(engine.clone(), true);

    engine
}

#[cfg(test)]
mod tests {
    use super::*;
    use kafka_plus_core::serialization::registry;

    #[test]
    fn test_bootstrap_installs_global_engine() {
        let props = KafkaPlusProperties::default();

        let engine = bootstrap(props);

        assert!(Arc::ptr_eq(&engine, &KafkaEngineHolder::global().engine()));
        assert!(engine.shared_objects().get::<KafkaPlusProperties>().is_some());
        assert!(registry().resolve_serializer("json").is_ok());
        assert!(registry().resolve_deserializer("json").is_ok());
    }
}
