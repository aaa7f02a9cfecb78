// ── Operation outcome ──

use serde::Serialize;

/// Outcome of a mutating operation that reached the device.
///
/// A device-side rejection is a failed result rather than an error, so the
/// caller can show the vendor message and carry on with the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
    /// Undecoded response body, for diagnostics.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub raw_body: String,
    /// Deploy/commit job identifier, when the device reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

impl OperationResult {
    pub fn success(message: impl Into<String>, raw_body: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            raw_body: raw_body.into(),
            job_id: None,
        }
    }

    pub fn failure(message: impl Into<String>, raw_body: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            raw_body: raw_body.into(),
            job_id: None,
        }
    }

    pub fn with_job(mut self, job_id: Option<String>) -> Self {
        self.job_id = job_id;
        self
    }
}
