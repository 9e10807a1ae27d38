use crate::errors::AppError;
use crate::ledger::VerificationLedger;
use crate::models::{LogEntry, LookupPayload, LookupRequest, ResponseMeta};
use crate::normalize::normalize_company;
use crate::prospeo_client::{ProspeoClient, UpstreamError};
use chrono::Utc;
use serde_json::{Map, Value};

/// Forwards lookup requests to the email-finder service and records each
/// accepted request in the verification ledger.
pub struct RelayService<'a> {
    client: &'a ProspeoClient,
    ledger: &'a VerificationLedger,
}

impl<'a> RelayService<'a> {
    pub fn new(client: &'a ProspeoClient, ledger: &'a VerificationLedger) -> Self {
        Self { client, ledger }
    }

    /// Validates, forwards and reshapes one lookup.
    ///
    /// Rejected requests (missing key or company) touch neither the counter
    /// nor the ledger. Every accepted request appends exactly one entry,
    /// whatever the outcome.
    ///
    /// # Returns
    ///
    /// * `Result<Value, AppError>` - The upstream JSON object with `_meta` injected.
    pub async fn lookup(&self, request: LookupRequest) -> Result<Value, AppError> {
        let api_key = request
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(AppError::MissingCredential)?;
        let company = request
            .company
            .as_deref()
            .filter(|company| !company.is_empty())
            .ok_or(AppError::MissingField("company"))?;

        let ticket = self.ledger.issue_ticket(request.request_id.as_deref());
        let request_id = ticket.request_id.clone();

        let payload = LookupPayload {
            first_name: request.first_name.unwrap_or_default(),
            last_name: request.last_name.unwrap_or_default(),
            company: normalize_company(company),
        };
        let entry = LogEntry::begin(&ticket, payload.clone(), api_key);

        tracing::info!(
            "[{}] Processing API request #{}",
            request_id,
            ticket.request_number
        );
        tracing::debug!("[{}] Input data: {:?}", request_id, payload);
        tracing::info!("[{}] Making request to {}", request_id, self.client.endpoint());

        let reply = match self.client.find_email(api_key, &payload).await {
            Ok(reply) => reply,
            Err(err) => {
                if let UpstreamError::Status { status, body, .. } = &err {
                    tracing::error!(
                        "[{}] HTTP error! status: {}, response: {}",
                        request_id,
                        status,
                        body
                    );
                }
                self.ledger.append(failure_entry(entry, &err));
                return Err(AppError::Upstream {
                    message: err.to_string(),
                    request_id,
                });
            }
        };

        tracing::info!(
            "[{}] API response received in {}ms (status {})",
            request_id,
            reply.elapsed_ms,
            reply.status
        );
        tracing::debug!("[{}] Response: {}", request_id, reply.body);

        let mut body = match parse_object(&reply.body) {
            Ok(body) => body,
            Err(parse_error) => {
                tracing::error!("[{}] Error parsing response: {}", request_id, parse_error);
                let mut entry = entry.failed(
                    format!("Invalid JSON response: {}", parse_error),
                    reply.elapsed_ms,
                );
                entry.parse_error = Some(parse_error.clone());
                self.ledger.append(entry);
                return Err(AppError::Upstream {
                    message: format!("Invalid JSON response: {}", parse_error),
                    request_id,
                });
            }
        };

        log_lookup_outcome(&request_id, &body);
        self.ledger
            .append(entry.succeeded(Value::Object(body.clone()), reply.elapsed_ms));

        let meta = ResponseMeta {
            request_id,
            request_number: ticket.request_number,
            response_time: reply.elapsed_ms,
            timestamp: Utc::now(),
        };
        let meta = serde_json::to_value(meta)
            .map_err(|e| AppError::InternalError(format!("Failed to encode _meta: {}", e)))?;
        body.insert("_meta".to_string(), meta);

        Ok(Value::Object(body))
    }
}

fn failure_entry(entry: LogEntry, err: &UpstreamError) -> LogEntry {
    let mut entry = entry.failed(err.to_string(), err.elapsed_ms());
    if let UpstreamError::Status { status, body, .. } = err {
        entry.upstream_status = Some(*status);
        entry.upstream_body = Some(body.clone());
    }
    entry
}

/// Parses an upstream body that must be a JSON object.
fn parse_object(body: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, got {}", json_kind(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn log_lookup_outcome(request_id: &str, body: &Map<String, Value>) {
    let response = body.get("response");
    match response.and_then(|r| r.get("email")).and_then(Value::as_str) {
        Some(email) => tracing::info!("[{}] ✅ Email found: {}", request_id, email),
        None => {
            let status = response
                .and_then(|r| r.get("email_status"))
                .and_then(Value::as_str)
                .unwrap_or("UNKNOWN");
            tracing::info!("[{}] ❌ No email found, status: {}", request_id, status);
        }
    }
}
