// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of configuration values.

use crate::diagnostic::ConfigError;
use crate::model::ZapsendConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for every `*_secs` setting: one day.
pub const MAX_SECS: u64 = 86_400;

/// Checks semantic constraints serde cannot express.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &ZapsendConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::validation(format!(
            "logging.level `{}` must be one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        )));
    }

    let base_url = config.gateway.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::validation(format!(
            "gateway.base_url `{base_url}` must start with http:// or https://"
        )));
    }

    if config
        .gateway
        .api_key
        .as_deref()
        .is_some_and(|key| key.trim().is_empty())
    {
        errors.push(ConfigError::validation(
            "gateway.api_key must not be empty when set",
        ));
    }

    check_secs(
        &mut errors,
        "gateway.request_timeout_secs",
        config.gateway.request_timeout_secs,
    );

    if config.session.name.trim().is_empty() {
        errors.push(ConfigError::validation("session.name must not be empty"));
    }

    for (key, value) in [
        ("session.connect_timeout_secs", config.session.connect_timeout_secs),
        ("session.poll_interval_secs", config.session.poll_interval_secs),
        ("session.pairing_retry_delay_secs", config.session.pairing_retry_delay_secs),
    ] {
        check_secs(&mut errors, key, value);
    }

    if config.session.pairing_attempts == 0 {
        errors.push(ConfigError::validation(
            "session.pairing_attempts must be at least 1",
        ));
    }

    let delay = config.dispatch.delay_secs;
    if !delay.is_finite() || !(0.0..=MAX_SECS as f64).contains(&delay) {
        errors.push(ConfigError::validation(format!(
            "dispatch.delay_secs must be between 0 and {MAX_SECS}, got {delay}"
        )));
    }

    let country_code = &config.dispatch.country_code;
    if country_code.is_empty()
        || country_code.len() > 3
        || !country_code.chars().all(|c| c.is_ascii_digit())
    {
        errors.push(ConfigError::validation(format!(
            "dispatch.country_code `{country_code}` must be 1 to 3 digits"
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_secs(errors: &mut Vec<ConfigError>, key: &str, value: u64) {
    if value == 0 {
        errors.push(ConfigError::validation(format!("{key} must be greater than 0")));
    } else if value > MAX_SECS {
        errors.push(ConfigError::validation(format!(
            "{key} must be at most {MAX_SECS}, got {value}"
        )));
    }
}
