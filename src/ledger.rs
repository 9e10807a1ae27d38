//! In-memory verification ledger.
//!
//! Holds the process-wide request counter and the append-only list of
//! [`LogEntry`] records. Both live for the lifetime of the process and are
//! never persisted.

use crate::models::{HealthStatus, LogEntry, RequestTicket, VerificationReport};
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Number of entries included in `recentCalls`.
pub const RECENT_CALLS_LIMIT: usize = 10;

#[derive(Debug, Default)]
pub struct VerificationLedger {
    requests: AtomicU64,
    entries: RwLock<Vec<LogEntry>>,
}

impl VerificationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts an accepted request and assigns its identifier.
    ///
    /// A non-empty caller-supplied id is kept as is; otherwise the id is
    /// `req_{counter}_{unix_millis}`, unique within this process.
    pub fn issue_ticket(&self, supplied_id: Option<&str>) -> RequestTicket {
        let request_number = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        let request_id = match supplied_id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => format!("req_{}_{}", request_number, Utc::now().timestamp_millis()),
        };

        RequestTicket {
            request_id,
            request_number,
        }
    }

    pub fn append(&self, entry: LogEntry) {
        // Entries are only ever pushed, so a poisoned lock still guards valid data.
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    pub fn total_requests(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds the verification report from the current ledger contents.
    pub fn report(&self) -> VerificationReport {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);

        let successful_calls = entries.iter().filter(|e| e.success).count();
        let total_latency: u64 = entries.iter().map(|e| e.response_time).sum();
        let average_response_time = if entries.is_empty() {
            0
        } else {
            (total_latency as f64 / entries.len() as f64).round() as u64
        };
        let recent_start = entries.len().saturating_sub(RECENT_CALLS_LIMIT);

        VerificationReport {
            total_api_calls: self.total_requests(),
            total_logged_calls: entries.len(),
            successful_calls,
            failed_calls: entries.len() - successful_calls,
            average_response_time,
            recent_calls: entries[recent_start..].to_vec(),
            timestamp: Utc::now(),
        }
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "Server is running".to_string(),
            timestamp: Utc::now(),
            total_api_calls: self.total_requests(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LookupPayload;
    use serde_json::json;
    use std::sync::Arc;

    fn entry(ledger: &VerificationLedger, success: bool, response_time: u64) -> LogEntry {
        let ticket = ledger.issue_ticket(None);
        let input = LookupPayload {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            company: "acme.io".to_string(),
        };
        let entry = LogEntry::begin(&ticket, input, "k1234567890");
        if success {
            entry.succeeded(json!({"response": {"email": "jane@acme.io"}}), response_time)
        } else {
            entry.failed("HTTP error! status: 429", response_time)
        }
    }

    #[test]
    fn test_empty_report() {
        let ledger = VerificationLedger::new();
        let report = ledger.report();

        assert_eq!(report.total_api_calls, 0);
        assert_eq!(report.total_logged_calls, 0);
        assert_eq!(report.successful_calls, 0);
        assert_eq!(report.failed_calls, 0);
        assert_eq!(report.average_response_time, 0);
        assert!(report.recent_calls.is_empty());
    }

    #[test]
    fn test_ticket_synthesizes_id_from_counter() {
        let ledger = VerificationLedger::new();

        let first = ledger.issue_ticket(None);
        let second = ledger.issue_ticket(Some(""));

        assert_eq!(first.request_number, 1);
        assert!(first.request_id.starts_with("req_1_"));
        assert_eq!(second.request_number, 2);
        assert!(second.request_id.starts_with("req_2_"));
        assert_ne!(first.request_id, second.request_id);
        assert_eq!(ledger.total_requests(), 2);
    }

    #[test]
    fn test_ticket_keeps_supplied_id() {
        let ledger = VerificationLedger::new();
        let ticket = ledger.issue_ticket(Some("batch-7-row-3"));

        assert_eq!(ticket.request_id, "batch-7-row-3");
        assert_eq!(ticket.request_number, 1);
    }

    #[test]
    fn test_report_counts_and_average() {
        let ledger = VerificationLedger::new();
        for (success, latency) in [(true, 100), (true, 200), (true, 301), (false, 50)] {
            let e = entry(&ledger, success, latency);
            ledger.append(e);
        }

        let report = ledger.report();
        assert_eq!(report.total_api_calls, 4);
        assert_eq!(report.total_logged_calls, 4);
        assert_eq!(report.successful_calls, 3);
        assert_eq!(report.failed_calls, 1);
        // 651 / 4 = 162.75
        assert_eq!(report.average_response_time, 163);
    }

    #[test]
    fn test_recent_calls_keeps_last_ten_in_order() {
        let ledger = VerificationLedger::new();
        for latency in 0..15 {
            let e = entry(&ledger, true, latency);
            ledger.append(e);
        }

        let report = ledger.report();
        assert_eq!(report.total_logged_calls, 15);
        assert_eq!(report.recent_calls.len(), RECENT_CALLS_LIMIT);
        let latencies: Vec<u64> = report.recent_calls.iter().map(|e| e.response_time).collect();
        assert_eq!(latencies, (5..15).collect::<Vec<u64>>());
    }

    #[test]
    fn test_health_does_not_mutate() {
        let ledger = VerificationLedger::new();
        let e = entry(&ledger, true, 10);
        ledger.append(e);

        for _ in 0..5 {
            let health = ledger.health();
            assert_eq!(health.status, "Server is running");
            assert_eq!(health.total_api_calls, 1);
        }
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.total_requests(), 1);
    }

    #[test]
    fn test_concurrent_tickets_are_unique() {
        let ledger = Arc::new(VerificationLedger::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    (0..100)
                        .map(|_| ledger.issue_ticket(None).request_number)
                        .collect::<Vec<u64>>()
                })
            })
            .collect();

        let mut numbers: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        numbers.sort_unstable();
        numbers.dedup();

        assert_eq!(numbers.len(), 800);
        assert_eq!(ledger.total_requests(), 800);
    }
}
