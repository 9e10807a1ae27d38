use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ============ Inbound ============

/// Body of `POST /api/email-finder`.
#[derive(Clone, Default, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Company domain or name, normalized before forwarding.
    #[serde(default)]
    pub company: Option<String>,
    /// Caller credential for the upstream service.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Optional caller-chosen identifier, echoed back in `_meta`.
    #[serde(default)]
    pub request_id: Option<String>,
}

// Never print the credential.
impl fmt::Debug for LookupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("company", &self.company)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("request_id", &self.request_id)
            .finish()
    }
}

// ============ Outbound ============

/// Normalized body forwarded to the lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupPayload {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
}

/// Identifier pair issued to every accepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub request_id: String,
    /// Counter value right after this request incremented it.
    pub request_number: u64,
}

/// Metadata object injected as `_meta` into successful responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub request_id: String,
    pub request_number: u64,
    pub response_time: u64,
    pub timestamp: DateTime<Utc>,
}

// ============ Ledger ============

/// One record in the verification ledger.
///
/// Created once per accepted request and never modified after it is appended.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub input: LookupPayload,
    /// First eight characters of the credential followed by `...`.
    pub api_key: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_body: Option<String>,
    /// Upstream latency in milliseconds.
    pub response_time: u64,
}

impl LogEntry {
    /// Starts an entry for a request about to be sent upstream.
    ///
    /// The entry is not complete until one of the `succeeded`/`failed`
    /// builders is applied.
    pub fn begin(ticket: &RequestTicket, input: LookupPayload, api_key: &str) -> Self {
        Self {
            request_id: ticket.request_id.clone(),
            timestamp: Utc::now(),
            input,
            api_key: truncate_api_key(api_key),
            success: false,
            response: None,
            error: None,
            parse_error: None,
            upstream_status: None,
            upstream_body: None,
            response_time: 0,
        }
    }

    pub fn succeeded(mut self, response: Value, response_time: u64) -> Self {
        self.success = true;
        self.response = Some(response);
        self.response_time = response_time;
        self
    }

    pub fn failed(mut self, error: impl Into<String>, response_time: u64) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self.response_time = response_time;
        self
    }
}

/// Keeps only a short prefix of a credential for logging.
pub fn truncate_api_key(api_key: &str) -> String {
    let prefix: String = api_key.chars().take(8).collect();
    format!("{}...", prefix)
}

/// Aggregate view returned by `GET /api/verification-report`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub total_api_calls: u64,
    pub total_logged_calls: usize,
    pub successful_calls: usize,
    pub failed_calls: usize,
    /// Mean latency of all logged calls, rounded to the nearest millisecond.
    pub average_response_time: u64,
    pub recent_calls: Vec<LogEntry>,
    pub timestamp: DateTime<Utc>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub total_api_calls: u64,
}
