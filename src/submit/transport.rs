use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::SubmitError;
use crate::submit::report_model::FeedbackReport;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// A ready-to-send POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub endpoint: String,
    pub api_key: String,
    /// JSON-encoded `FeedbackReport`
    pub body: String,
}

impl SubmissionRequest {
    pub fn new(endpoint: &str, api_key: &str, report: &FeedbackReport) -> Result<Self, SubmitError> {
        Ok(Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            body: serde_json::to_string(report)?,
        })
    }
}

pub trait Transport: Send + Sync {
    /// One delivery attempt. No retries.
    fn send(&self, request: &SubmissionRequest) -> Result<(), SubmitError>;
}

// ============================================================================
// HTTP transport
// ============================================================================

pub struct HttpTransport {
    timeout: Duration,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
        }
    }
}

impl HttpTransport {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &SubmissionRequest) -> Result<(), SubmitError> {
        let transport_error = |e| SubmitError::Transport {
            endpoint: request.endpoint.clone(),
            source: e,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(transport_error)?;

        let response = client
            .post(&request.endpoint)
            .header(API_KEY_HEADER, &request.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(request.body.clone())
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Status {
                endpoint: request.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        debug!(endpoint = %request.endpoint, status = status.as_u16(), "feedback delivered");
        Ok(())
    }
}

// ============================================================================
// Mock transport (for testing without a collection endpoint)
// ============================================================================

/// Records every request and answers with a fixed outcome.
#[derive(Default)]
pub struct MockTransport {
    fail_with_status: Option<u16>,
    sent: Mutex<Vec<SubmissionRequest>>,
}

impl MockTransport {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            sent: Mutex::new(vec![]),
        }
    }

    pub fn sent(&self) -> Vec<SubmissionRequest> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &SubmissionRequest) -> Result<(), SubmitError> {
        match self.sent.lock() {
            Ok(mut sent) => sent.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }

        match self.fail_with_status {
            Some(status) => Err(SubmitError::Status {
                endpoint: request.endpoint.clone(),
                status,
            }),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Background delivery
// ============================================================================

/// A send running on a worker thread. The UI loop polls it.
pub struct PendingSubmission {
    receiver: Receiver<Result<(), SubmitError>>,
}

impl PendingSubmission {
    /// Start delivering `request` without blocking the caller.
    pub fn spawn(transport: Arc<dyn Transport>, request: SubmissionRequest) -> Self {
        let (tx, receiver) = mpsc::channel();

        thread::spawn(move || {
            let result = transport.send(&request);
            if let Err(e) = &result {
                warn!(endpoint = %request.endpoint, error = %e, "feedback delivery failed");
            }
            // The UI may have been torn down; nobody is listening then.
            let _ = tx.send(result);
        });

        Self { receiver }
    }

    /// `None` while the send is still in flight.
    pub fn try_result(&self) -> Option<Result<(), SubmitError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(SubmitError::WorkerLost)),
        }
    }

    pub fn wait(self) -> Result<(), SubmitError> {
        self.receiver.recv().unwrap_or(Err(SubmitError::WorkerLost))
    }
}
