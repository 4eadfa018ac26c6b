//! Config schema. All sections are `#[serde(default)]`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root of `bridge.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub session: SessionConfig,
    pub timing: TimingConfig,
    pub logging: LoggingConfig,
}

/// What the session pushes into the surface and how the host sizes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// HTML sent with `content/setHtml` once the surface reports loaded.
    pub initial_content: String,
    /// Height used by the host container while the surface reports 0.
    pub min_height: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_content: String::new(),
            min_height: 200.0,
        }
    }
}

/// Protocol timings, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long `getContentHtml` waits for `CONTENT_HTML_RESPONSE`.
    pub request_timeout_ms: u64,
    /// Period of the `updateHeight` poll.
    pub height_poll_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5000,
            height_poll_interval_ms: 200,
        }
    }
}

impl TimingConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn height_poll_interval(&self) -> Duration {
        Duration::from_millis(self.height_poll_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "richedit=info".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_protocol_constants() {
        let config = BridgeConfig::default();
        assert_eq!(config.timing.request_timeout(), Duration::from_millis(5000));
        assert_eq!(
            config.timing.height_poll_interval(),
            Duration::from_millis(200)
        );
        assert_eq!(config.session.min_height, 200.0);
        assert!(config.session.initial_content.is_empty());
        assert_eq!(config.logging.level, "richedit=info");
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config: BridgeConfig = toml::from_str("").unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: BridgeConfig = toml::from_str(
            r#"
[timing]
request_timeout_ms = 750
"#,
        )
        .unwrap();
        assert_eq!(config.timing.request_timeout_ms, 750);
        assert_eq!(config.timing.height_poll_interval_ms, 200);
    }
}
