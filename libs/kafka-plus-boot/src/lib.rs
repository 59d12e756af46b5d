pub mod bootstrap;
pub mod properties;

pub use bootstrap::bootstrap;
pub use properties::{KafkaPlusProperties, PropertiesError, PREFIX};
