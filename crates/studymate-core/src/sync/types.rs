//! Wire types and error taxonomy for the events backend.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// An event as stored by the backend.
///
/// The backend persists only the fields it knows about; anything it drops
/// comes back absent (or null) and deserializes to a default, so cached
/// lists survive schema drift between client and server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEvent {
    /// Server-assigned id; absent until an event has round-tripped.
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(with = "event_date")]
    pub event_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub description: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    /// Minutes.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub priority: Option<u8>,
}

/// Input for creating or updating a backend event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub name: String,
    pub event_date: DateTime<Utc>,
    pub description: String,
    pub subject: String,
    pub event_type: String,
    /// Minutes.
    pub duration: u32,
    pub priority: u8,
}

impl Default for EventPayload {
    /// Payload with the standard defaults for every unspecified field.
    fn default() -> Self {
        Self {
            name: "Untitled Event".to_string(),
            event_date: Utc::now(),
            description: String::new(),
            subject: "General".to_string(),
            event_type: "STUDY".to_string(),
            duration: 60,
            priority: 3,
        }
    }
}

/// Result of a connectivity probe. Failures are reported in-band so
/// screens can render them; the probe itself never errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub connected: bool,
    /// Probe response body, on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
    /// Human-readable failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a best-effort session upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub success: bool,
    /// Sessions that reached the backend.
    pub synced: usize,
}

/// Outcome of a full bidirectional sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullSyncOutcome {
    pub success: bool,
    pub sessions_synced: usize,
    pub events_received: usize,
    pub timestamp: DateTime<Utc>,
}

/// Remote API error types, each carrying the message shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request timeout. Please check your connection.")]
    Timeout,

    #[error("Network error. Please check your internet connection.")]
    Network(#[source] reqwest::Error),

    #[error("Server error. Please try again later.")]
    Server { status: u16 },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid data sent to server.")]
    BadRequest,

    #[error("Request failed with status {status}.")]
    Status { status: u16 },

    #[error("Unexpected response from server: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Classify a transport-level failure.
    pub(crate) fn from_request(err: reqwest::Error) -> Self {
        tracing::error!("request error: {err}");
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err)
        } else {
            ApiError::Network(err)
        }
    }
}

/// Parse the backend's ISO-8601 timestamps.
///
/// The server serializes `LocalDateTime` without an offset
/// ("2025-03-01T09:30:00"); values written by this client carry one.
/// Offset-less timestamps are taken as UTC.
pub(crate) fn parse_event_date(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|naive| naive.and_utc())
        })
}

/// Serde adapter over [`parse_event_date`], serializing RFC 3339.
mod event_date {
    use super::*;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_event_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// Deserialize an explicit JSON `null` as the type's default.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_date_accepts_offsets_and_naive() {
        let with_offset = parse_event_date("2025-03-01T09:30:00Z").unwrap();
        let naive = parse_event_date("2025-03-01T09:30:00").unwrap();
        assert_eq!(with_offset, naive);

        let fractional = parse_event_date("2025-03-01T09:30:00.250").unwrap();
        assert!(fractional > naive);

        assert!(parse_event_date("March 1st").is_err());
    }

    #[test]
    fn test_remote_event_tolerates_sparse_server_response() {
        // The backend stores only name/eventDate/description.
        let event: RemoteEvent = serde_json::from_str(
            r#"{"id":3,"name":"Study: Math","eventDate":"2025-03-01T09:30:00","description":null,"createdAt":"2025-03-01T09:00:00"}"#,
        )
        .unwrap();
        assert_eq!(event.id, Some(3));
        assert_eq!(event.description, "");
        assert_eq!(event.subject, None);
        assert_eq!(event.duration, None);
    }

    #[test]
    fn test_remote_event_cache_roundtrip() {
        let event: RemoteEvent = serde_json::from_str(
            r#"{"id":3,"name":"Study: Math","eventDate":"2025-03-01T09:30:00","description":"notes"}"#,
        )
        .unwrap();
        let cached = serde_json::to_string(&event).unwrap();
        let reread: RemoteEvent = serde_json::from_str(&cached).unwrap();
        assert_eq!(reread, event);
    }

    #[test]
    fn test_event_payload_defaults() {
        let payload = EventPayload::default();
        assert_eq!(payload.name, "Untitled Event");
        assert_eq!(payload.subject, "General");
        assert_eq!(payload.event_type, "STUDY");
        assert_eq!(payload.duration, 60);
        assert_eq!(payload.priority, 3);
    }

    #[test]
    fn test_event_payload_wire_format() {
        let json = serde_json::to_value(EventPayload::default()).unwrap();
        assert!(json.get("eventDate").is_some());
        assert!(json.get("eventType").is_some());
        assert!(json.get("event_date").is_none());
    }

    #[test]
    fn test_api_error_messages() {
        assert_eq!(
            ApiError::Timeout.to_string(),
            "Request timeout. Please check your connection."
        );
        assert_eq!(
            ApiError::Server { status: 503 }.to_string(),
            "Server error. Please try again later."
        );
        assert_eq!(
            ApiError::Validation {
                message: "Event name is required".to_string()
            }
            .to_string(),
            "Validation error: Event name is required"
        );
        assert_eq!(
            ApiError::BadRequest.to_string(),
            "Invalid data sent to server."
        );
    }
}
