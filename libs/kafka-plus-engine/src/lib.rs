pub mod engine;
pub mod holder;
pub mod service;

pub use engine::{KafkaEngine, SharedObjects};
pub use holder::KafkaEngineHolder;
pub use service::{AdminService, ConsumerService, ProducerService};
