use crate::errors::AppError;
use crate::models::LookupPayload;
use std::fmt;
use std::time::{Duration, Instant};

/// Header the lookup service reads the caller's credential from.
pub const API_KEY_HEADER: &str = "X-KEY";

/// Client for the Prospeo email-finder endpoint.
///
/// Every call is a single attempt bounded by the configured timeout.
#[derive(Clone)]
pub struct ProspeoClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

/// A 2xx reply whose body has been fully read.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
    /// Milliseconds from just before sending until the body was read.
    pub elapsed_ms: u64,
}

/// Failure of the upstream call. Every variant records how long the call ran.
#[derive(Debug, Clone)]
pub enum UpstreamError {
    /// The service answered with a non-success status.
    Status {
        status: u16,
        body: String,
        elapsed_ms: u64,
    },
    /// The deadline passed before the body was read.
    Timeout { limit_ms: u64, elapsed_ms: u64 },
    /// Connection, TLS or body-read failure.
    Transport { message: String, elapsed_ms: u64 },
}

impl UpstreamError {
    pub fn elapsed_ms(&self) -> u64 {
        match self {
            UpstreamError::Status { elapsed_ms, .. }
            | UpstreamError::Timeout { elapsed_ms, .. }
            | UpstreamError::Transport { elapsed_ms, .. } => *elapsed_ms,
        }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Status { status, .. } => write!(f, "HTTP error! status: {}", status),
            UpstreamError::Timeout { limit_ms, .. } => {
                write!(f, "request timed out after {}ms", limit_ms)
            }
            UpstreamError::Transport { message, .. } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for UpstreamError {}

impl ProspeoClient {
    /// Creates a new `ProspeoClient`.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Full URL of the email-finder endpoint.
    /// * `timeout` - Deadline for one call, body read included.
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create Prospeo client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one lookup to the email-finder endpoint.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Caller credential, sent verbatim in the `X-KEY` header.
    /// * `payload` - Normalized lookup body.
    ///
    /// # Returns
    ///
    /// * `Result<UpstreamReply, UpstreamError>` - The raw 2xx body, or the failure.
    pub async fn find_email(
        &self,
        api_key: &str,
        payload: &LookupPayload,
    ) -> Result<UpstreamReply, UpstreamError> {
        let started = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e, started))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e, started))?;
        let elapsed_ms = elapsed_ms(started);

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
                elapsed_ms,
            });
        }

        Ok(UpstreamReply {
            status: status.as_u16(),
            body,
            elapsed_ms,
        })
    }

    fn transport_error(&self, err: reqwest::Error, started: Instant) -> UpstreamError {
        let elapsed_ms = elapsed_ms(started);
        if err.is_timeout() {
            UpstreamError::Timeout {
                limit_ms: self.timeout.as_millis() as u64,
                elapsed_ms,
            }
        } else {
            UpstreamError::Transport {
                message: err.to_string(),
                elapsed_ms,
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
