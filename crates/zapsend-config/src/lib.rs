// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the zapsend client.
//!
//! TOML parsing with strict `deny_unknown_fields` checking, XDG file
//! hierarchy lookup, `ZAPSEND_*` environment overrides, and miette
//! diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use zapsend_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("session: {}", config.session.name);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::ZapsendConfig;
pub use validation::MAX_SECS;

/// Loads configuration from the XDG hierarchy and validates it.
pub fn load_and_validate() -> Result<ZapsendConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Loads a single explicit config file (plus env overrides) and validates it.
pub fn load_and_validate_path(path: &Path) -> Result<ZapsendConfig, Vec<ConfigError>> {
    if !path.exists() {
        return Err(vec![ConfigError::Other(format!(
            "config file not found: {}",
            path.display()
        ))]);
    }
    tracing::debug!(path = %path.display(), "loading explicit config file");
    finish(loader::load_config_from_path(path), || read_sources([path]))
}

/// Loads configuration from a TOML string and validates it.
pub fn load_and_validate_str(toml_content: &str) -> Result<ZapsendConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<ZapsendConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<ZapsendConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Reads every config file in the hierarchy that exists, for span lookup.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|d| d.join(loader::LOCAL_CONFIG_PATH))
        .unwrap_or_else(|_| loader::LOCAL_CONFIG_PATH.into());

    let mut paths = vec![local];
    paths.extend(loader::user_config_path());
    paths.push(loader::SYSTEM_CONFIG_PATH.into());
    read_sources(paths)
}

fn read_sources<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Vec<(String, String)> {
    paths
        .into_iter()
        .filter_map(|path| {
            let path = path.as_ref();
            std::fs::read_to_string(path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
