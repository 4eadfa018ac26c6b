//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r#"# Richedit bridge configuration
# Only override what you want to change -- missing fields use defaults.

[session]
# HTML pushed into the surface once it reports loaded.
# initial_content = ""
# Host container height while the surface reports a height of 0.
# min_height = 200.0

[timing]
# How long getContentHtml waits for a response.
# request_timeout_ms = 5000
# Period of the updateHeight poll.
# height_poll_interval_ms = 200

[logging]
# level = "richedit=info"
"#
}
