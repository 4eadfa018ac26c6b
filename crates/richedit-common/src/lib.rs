pub mod errors;

pub use errors::{BridgeError, ConfigError};

pub type Result<T> = std::result::Result<T, BridgeError>;
