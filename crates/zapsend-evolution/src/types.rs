// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Evolution API request/response bodies and the translations from raw
//! gateway values into core types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use zapsend_core::{GatewayError, SessionInfo, SessionState};

/// Baileys-backed integration, the one that supports QR pairing.
pub const INTEGRATION_BAILEYS: &str = "WHATSAPP-BAILEYS";

// --- Request types ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstanceRequest<'a> {
    pub instance_name: &'a str,
    pub qrcode: bool,
    pub integration: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTextRequest<'a> {
    pub number: &'a str,
    pub text_message: TextMessage<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextMessage<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendMediaRequest<'a> {
    pub number: &'a str,
    pub mediatype: &'a str,
    pub media: &'a str,
    pub caption: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckNumbersRequest<'a> {
    pub numbers: [&'a str; 1],
}

// --- Response types ---

/// Body of `GET /instance/connect/{name}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub pairing_code: Option<String>,
    /// PNG as a data URL (`data:image/png;base64,...`).
    #[serde(default)]
    pub base64: Option<String>,
}

/// Body of `GET /instance/connectionState/{name}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionStateResponse {
    #[serde(default)]
    pub instance: ConnectionStateInstance,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionStateInstance {
    #[serde(default)]
    pub state: Option<String>,
}

/// One element of the `POST /chat/whatsappNumbers/{name}` result list.
#[derive(Debug, Clone, Deserialize)]
pub struct NumberCheck {
    #[serde(default)]
    pub exists: bool,
}

/// Maps a raw connection status onto [`SessionState`].
///
/// This is the only place gateway status strings are interpreted.
pub fn parse_session_state(raw: &str) -> SessionState {
    match raw.trim().to_ascii_lowercase().as_str() {
        "open" => SessionState::Connected,
        "connecting" => SessionState::PairingPending,
        "close" | "closed" => SessionState::Disconnected,
        _ => SessionState::Created,
    }
}

/// Parses the instance listing. Accepts both the flat `[{"name": ..}]`
/// shape and the nested `[{"instance": {"instanceName": ..}}]` shape.
pub fn parse_session_list(value: &Value) -> Result<Vec<SessionInfo>, GatewayError> {
    let items = value
        .as_array()
        .ok_or_else(|| GatewayError::malformed(format!("expected a session list, got {value}")))?;

    Ok(items
        .iter()
        .filter_map(|item| {
            let nested = item.get("instance");
            let name = item
                .get("name")
                .or_else(|| item.get("instanceName"))
                .or_else(|| nested.and_then(|i| i.get("instanceName")))
                .and_then(Value::as_str)?;
            let state = item
                .get("connectionStatus")
                .or_else(|| nested.and_then(|i| i.get("status")))
                .and_then(Value::as_str)
                .map(parse_session_state);
            Some(SessionInfo {
                name: name.to_string(),
                state,
            })
        })
        .collect())
}

/// Extracts a readable message from an error body.
///
/// The gateway nests messages as `{"response": {"message": [..]}}`; older
/// versions use a top-level `message` or `error` string.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let candidate = value
        .pointer("/response/message")
        .or_else(|| value.get("message"))
        .or_else(|| value.get("error"))?;

    match candidate {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => {
            let joined = parts
                .iter()
                .map(|p| match p {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; ");
            (!joined.is_empty()).then_some(joined)
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Classifies a non-2xx response.
///
/// The gateway has no structured duplicate-name code, so 409 is trusted
/// outright and 400/403 are promoted to `AlreadyExists` only when the
/// message says so.
pub fn classify_failure(status: u16, body: &str) -> GatewayError {
    let detail = error_message(body).unwrap_or_else(|| {
        if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body.to_string()
        }
    });

    match status {
        409 => GatewayError::already_exists(detail),
        400 | 403 if mentions_duplicate(&detail) => GatewayError::already_exists(detail),
        404 => GatewayError::not_found(detail),
        _ => GatewayError::status(status, detail),
    }
}

fn mentions_duplicate(detail: &str) -> bool {
    let lower = detail.to_ascii_lowercase();
    lower.contains("already in use") || lower.contains("already exists")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn state_strings_map_to_enum() {
        assert_eq!(parse_session_state("open"), SessionState::Connected);
        assert_eq!(parse_session_state("OPEN"), SessionState::Connected);
        assert_eq!(parse_session_state("connecting"), SessionState::PairingPending);
        assert_eq!(parse_session_state("close"), SessionState::Disconnected);
        assert_eq!(parse_session_state("refused"), SessionState::Created);
    }

    #[test]
    fn flat_session_list_parses() {
        let value = json!([
            {"name": "business_sender", "connectionStatus": "open"},
            {"name": "other"}
        ]);
        let sessions = parse_session_list(&value).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].name, "business_sender");
        assert_eq!(sessions[0].state, Some(SessionState::Connected));
        assert_eq!(sessions[1].state, None);
    }

    #[test]
    fn nested_session_list_parses() {
        let value = json!([{"instance": {"instanceName": "legacy", "status": "close"}}]);
        let sessions = parse_session_list(&value).unwrap();
        assert_eq!(sessions[0].name, "legacy");
        assert_eq!(sessions[0].state, Some(SessionState::Disconnected));
    }

    #[test]
    fn non_array_listing_is_malformed() {
        let err = parse_session_list(&json!({"error": true})).unwrap_err();
        assert!(matches!(err, GatewayError::Malformed { .. }));
    }

    #[test]
    fn nested_message_list_is_joined() {
        let body = r#"{"status":403,"error":"Forbidden","response":{"message":["This name \"x\" is already in use."]}}"#;
        assert_eq!(
            error_message(body).as_deref(),
            Some("This name \"x\" is already in use.")
        );
    }

    #[test]
    fn duplicate_name_is_already_exists() {
        let body = r#"{"response":{"message":["This name \"x\" is already in use."]}}"#;
        assert!(classify_failure(403, body).is_already_exists());
        assert!(classify_failure(409, "").is_already_exists());
    }

    #[test]
    fn other_forbidden_is_status() {
        let err = classify_failure(403, r#"{"response":{"message":["Missing global api key"]}}"#);
        assert_eq!(err, GatewayError::status(403, "Missing global api key"));
    }

    #[test]
    fn not_found_and_plain_bodies() {
        assert!(matches!(classify_failure(404, "nope"), GatewayError::NotFound { .. }));
        assert_eq!(
            classify_failure(502, ""),
            GatewayError::status(502, "HTTP 502")
        );
        assert_eq!(
            classify_failure(500, "upstream exploded"),
            GatewayError::status(500, "upstream exploded")
        );
    }
}
