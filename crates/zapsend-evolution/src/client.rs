// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Evolution API.
//!
//! [`EvolutionClient`] implements [`Gateway`] by translating each logical
//! operation into one request. Transport failures, error statuses, and
//! unreadable bodies are all folded into [`GatewayError`] here so nothing
//! above this layer sees reqwest types.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use zapsend_config::model::GatewayConfig;
use zapsend_core::{
    Gateway, GatewayError, GatewayResponse, MediaKind, PairingArtifact, SessionInfo,
    SessionState, ZapsendError, normalize_phone_with,
};

use crate::types::{
    CheckNumbersRequest, ConnectResponse, ConnectionStateResponse, CreateInstanceRequest,
    INTEGRATION_BAILEYS, NumberCheck, SendMediaRequest, SendTextRequest, TextMessage,
    classify_failure, parse_session_list, parse_session_state,
};

/// Evolution API client.
///
/// Cheap to clone; the inner `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct EvolutionClient {
    client: reqwest::Client,
    base_url: Url,
    country_code: String,
}

impl EvolutionClient {
    /// Creates a client from gateway settings.
    ///
    /// `country_code` is prepended to phone numbers that carry none.
    pub fn new(config: &GatewayConfig, country_code: &str) -> Result<Self, ZapsendError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ZapsendError::Config(
                    "gateway.api_key is required (set ZAPSEND_GATEWAY_API_KEY)".into(),
                )
            })?;

        let base_url = Url::parse(config.base_url.trim()).map_err(|e| {
            ZapsendError::Config(format!("invalid gateway.base_url `{}`: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ZapsendError::Config(format!(
                "gateway.base_url `{}` cannot carry a path",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(api_key)
                .map_err(|e| ZapsendError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ZapsendError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            country_code: country_code.to_string(),
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn phone(&self, raw: &str) -> String {
        normalize_phone_with(raw, &self.country_code)
    }

    /// Performs one request and returns the JSON body.
    ///
    /// An empty 2xx body is returned as `{}`.
    async fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> GatewayResponse<Value> {
        let url = self.endpoint(segments);
        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%method, path = url.path(), error = %e, "gateway request failed");
            GatewayError::transport(e.to_string())
        })?;

        let status = response.status();
        debug!(%method, path = url.path(), status = %status, "gateway response received");

        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(classify_failure(status.as_u16(), &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }

        serde_json::from_str(&text)
            .map_err(|e| GatewayError::malformed(format!("invalid JSON from gateway: {e}")))
    }

    async fn call_empty(&self, method: Method, segments: &[&str]) -> GatewayResponse<Value> {
        self.call::<Value>(method, segments, None).await
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> GatewayResponse<T> {
    serde_json::from_value(value)
        .map_err(|e| GatewayError::malformed(format!("unexpected response shape: {e}")))
}

/// Decodes the `base64` field of a connect response, tolerating a data-URL
/// prefix. A broken image is dropped rather than failing the whole artifact.
fn decode_qr_image(raw: &str) -> Option<Vec<u8>> {
    let payload = raw.rsplit(',').next().unwrap_or(raw).trim();
    if payload.is_empty() {
        return None;
    }
    match BASE64.decode(payload) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!(error = %e, "discarding undecodable QR image");
            None
        }
    }
}

#[async_trait]
impl Gateway for EvolutionClient {
    async fn create_session(&self, name: &str) -> GatewayResponse<()> {
        let body = CreateInstanceRequest {
            instance_name: name,
            qrcode: true,
            integration: INTEGRATION_BAILEYS,
        };
        self.call(Method::POST, &["instance", "create"], Some(&body))
            .await
            .map(drop)
    }

    async fn list_sessions(&self) -> GatewayResponse<Vec<SessionInfo>> {
        let value = self
            .call_empty(Method::GET, &["instance", "fetchInstances"])
            .await?;
        parse_session_list(&value)
    }

    async fn delete_session(&self, name: &str) -> GatewayResponse<()> {
        self.call_empty(Method::DELETE, &["instance", "delete", name])
            .await
            .map(drop)
    }

    async fn logout_session(&self, name: &str) -> GatewayResponse<()> {
        self.call_empty(Method::DELETE, &["instance", "logout", name])
            .await
            .map(drop)
    }

    async fn restart_session(&self, name: &str) -> GatewayResponse<()> {
        self.call_empty(Method::POST, &["instance", "restart", name])
            .await
            .map(drop)
    }

    async fn fetch_pairing_artifact(&self, name: &str) -> GatewayResponse<PairingArtifact> {
        let value = self
            .call_empty(Method::GET, &["instance", "connect", name])
            .await?;
        let connect: ConnectResponse = decode(value)?;
        Ok(PairingArtifact {
            qr_payload: connect.code.filter(|c| !c.is_empty()),
            pairing_code: connect.pairing_code.filter(|c| !c.is_empty()),
            image: connect.base64.as_deref().and_then(decode_qr_image),
        })
    }

    async fn connection_state(&self, name: &str) -> GatewayResponse<SessionState> {
        let value = match self
            .call_empty(Method::GET, &["instance", "connectionState", name])
            .await
        {
            Ok(value) => value,
            Err(GatewayError::NotFound { .. }) => return Ok(SessionState::NonExistent),
            Err(e) => return Err(e),
        };
        let response: ConnectionStateResponse = decode(value)?;
        Ok(response
            .instance
            .state
            .as_deref()
            .map(parse_session_state)
            .unwrap_or(SessionState::Created))
    }

    async fn send_text(&self, name: &str, phone: &str, text: &str) -> GatewayResponse<()> {
        let number = self.phone(phone);
        let body = SendTextRequest {
            number: &number,
            text_message: TextMessage { text },
        };
        self.call(Method::POST, &["message", "sendText", name], Some(&body))
            .await
            .map(drop)
    }

    async fn send_media(
        &self,
        name: &str,
        phone: &str,
        url: &str,
        kind: MediaKind,
        caption: &str,
    ) -> GatewayResponse<()> {
        let number = self.phone(phone);
        let mediatype = kind.to_string();
        let body = SendMediaRequest {
            number: &number,
            mediatype: &mediatype,
            media: url,
            caption,
        };
        self.call(Method::POST, &["message", "sendMedia", name], Some(&body))
            .await
            .map(drop)
    }

    async fn validate_recipient(&self, name: &str, phone: &str) -> bool {
        let number = self.phone(phone);
        let body = CheckNumbersRequest { numbers: [&number] };
        let value = match self
            .call(Method::POST, &["chat", "whatsappNumbers", name], Some(&body))
            .await
        {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    phone = %number,
                    error = %e,
                    "recipient check failed, treating as unreachable"
                );
                return false;
            }
        };

        let first = value.as_array().and_then(|items| items.first()).cloned();
        match first.map(serde_json::from_value::<NumberCheck>) {
            Some(Ok(check)) => check.exists,
            _ => {
                debug!(phone = %number, "recipient check returned no usable result");
                false
            }
        }
    }
}
