// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `/etc/zapsend/zapsend.toml` < `~/.config/zapsend/zapsend.toml`
//! < `./zapsend.toml`, with `ZAPSEND_*` environment variables on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ZapsendConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/zapsend/zapsend.toml";

/// Configuration file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "zapsend.toml";

/// Sections that environment variables may target.
const ENV_SECTIONS: &[&str] = &["logging", "gateway", "session", "dispatch"];

/// Returns the per-user configuration path, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("zapsend").join("zapsend.toml"))
}

/// Builds the Figment for the standard hierarchy without extracting it.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ZapsendConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Loads configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<ZapsendConfig, figment::Error> {
    build_figment().extract()
}

/// Loads configuration from a single explicit file, with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ZapsendConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ZapsendConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Loads configuration from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<ZapsendConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ZapsendConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Maps `ZAPSEND_GATEWAY_API_KEY` to `gateway.api_key`.
///
/// Only the first underscore after the section name becomes a dot, so keys
/// that themselves contain underscores survive intact.
fn env_provider() -> Env {
    Env::prefixed("ZAPSEND_").map(|key| env_key_to_path(&key.as_str().to_ascii_lowercase()).into())
}

fn env_key_to_path(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_section_paths() {
        assert_eq!(env_key_to_path("gateway_api_key"), "gateway.api_key");
        assert_eq!(
            env_key_to_path("session_connect_timeout_secs"),
            "session.connect_timeout_secs"
        );
        assert_eq!(env_key_to_path("dispatch_delay_secs"), "dispatch.delay_secs");
        assert_eq!(env_key_to_path("logging_level"), "logging.level");
    }

    #[test]
    fn unknown_section_is_left_alone() {
        assert_eq!(env_key_to_path("mystery_key"), "mystery_key");
    }
}
