//! Config validation. Collects every problem into one `ConfigError`.

use richedit_common::ConfigError;

use crate::schema::BridgeConfig;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &BridgeConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_nonzero(
        &mut errors,
        "timing.request_timeout_ms",
        config.timing.request_timeout_ms,
    );
    validate_nonzero(
        &mut errors,
        "timing.height_poll_interval_ms",
        config.timing.height_poll_interval_ms,
    );

    let min_height = config.session.min_height;
    if !min_height.is_finite() || min_height < 0.0 {
        errors.push(format!(
            "session.min_height = {min_height} must be a finite value >= 0"
        ));
    }

    if config.logging.level.trim().is_empty() {
        errors.push("logging.level must not be empty".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_nonzero(errors: &mut Vec<String>, name: &str, value: u64) {
    if value == 0 {
        errors.push(format!("{name} = 0 must be > 0"));
    }
}
