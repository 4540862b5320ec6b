// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so typos are reported at
//! startup instead of being silently ignored.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level zapsend configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ZapsendConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Remote gateway connection settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Session naming and pairing behavior.
    #[serde(default)]
    pub session: SessionConfig,

    /// Delivery pacing and message defaults.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level for zapsend crates (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Gateway connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Base URL of the gateway, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent in the `apikey` header. Usually supplied through
    /// `ZAPSEND_GATEWAY_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Web manager URL shown when pairing has to be done by hand.
    /// Defaults to `{base_url}/manager`.
    #[serde(default)]
    pub manager_url: Option<String>,
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn manager_url(&self) -> String {
        self.manager_url
            .clone()
            .unwrap_or_else(|| format!("{}/manager", self.base_url.trim_end_matches('/')))
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
            manager_url: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Session naming and pairing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Name of the gateway session to create or reuse.
    #[serde(default = "default_session_name")]
    pub name: String,

    /// Overall time allowed for setup, pairing retries included.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Interval between connection-state polls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// How many times to ask for a pairing artifact before giving up.
    #[serde(default = "default_pairing_attempts")]
    pub pairing_attempts: u32,

    /// Delay between pairing artifact requests.
    #[serde(default = "default_pairing_retry_delay_secs")]
    pub pairing_retry_delay_secs: u64,

    /// Where the QR image is written. Defaults to the user data directory.
    #[serde(default)]
    pub qr_image_path: Option<PathBuf>,

    /// Open the saved QR image, or the manager URL when no code is
    /// available, with the desktop's default handler.
    #[serde(default)]
    pub open_pairing: bool,
}

impl SessionConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn pairing_retry_delay(&self) -> Duration {
        Duration::from_secs(self.pairing_retry_delay_secs)
    }

    pub fn qr_image_path(&self) -> PathBuf {
        self.qr_image_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("zapsend"))
                .unwrap_or_else(|| PathBuf::from("."))
                .join("qrcode.png")
        })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: default_session_name(),
            connect_timeout_secs: default_connect_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            pairing_attempts: default_pairing_attempts(),
            pairing_retry_delay_secs: default_pairing_retry_delay_secs(),
            qr_image_path: None,
            open_pairing: false,
        }
    }
}

fn default_session_name() -> String {
    "business_sender".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    180
}

fn default_poll_interval_secs() -> u64 {
    2
}

fn default_pairing_attempts() -> u32 {
    5
}

fn default_pairing_retry_delay_secs() -> u64 {
    2
}

/// Delivery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Pause between consecutive sends, in seconds.
    #[serde(default = "default_delay_secs")]
    pub delay_secs: f64,

    /// Check that each recipient can receive messages before sending.
    #[serde(default = "default_verify_recipients")]
    pub verify_recipients: bool,

    /// Country code prepended to numbers without one.
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Inline message template. Overridden by `template_file` if both are set.
    #[serde(default)]
    pub template: Option<String>,

    /// Path to a file holding the message template.
    #[serde(default)]
    pub template_file: Option<PathBuf>,
}

impl DispatchConfig {
    /// The inter-send delay. Negative or NaN values collapse to zero and
    /// values too large for a `Duration` saturate.
    pub fn delay(&self) -> Duration {
        if self.delay_secs.is_nan() || self.delay_secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(self.delay_secs).unwrap_or(Duration::MAX)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            delay_secs: default_delay_secs(),
            verify_recipients: default_verify_recipients(),
            country_code: default_country_code(),
            template: None,
            template_file: None,
        }
    }
}

fn default_delay_secs() -> f64 {
    5.0
}

fn default_verify_recipients() -> bool {
    true
}

fn default_country_code() -> String {
    "55".to_string()
}
