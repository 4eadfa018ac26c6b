//! Richedit bridge configuration.
//!
//! TOML-based settings for a bridge session: the content pushed when the
//! surface loads, the minimum display height, protocol timings and the log
//! filter. Every section uses serde defaults so partial files work.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{BridgeConfig, LoggingConfig, SessionConfig, TimingConfig};
pub use toml_loader::{create_default_config, default_config_path, load_default, load_from_path};
pub use validation::validate;
