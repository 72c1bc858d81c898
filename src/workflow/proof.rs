use crate::error::RejectionReason;

use super::record::JobOrderRecord;

/// Holds the proof photo for the job being completed.
///
/// A photo already stored on the record counts, so reopening a job that was
/// photographed earlier does not force a second upload.
#[derive(Debug, Clone, Default)]
pub struct ProofOfCompletionGate {
    captured: Option<String>,
}

impl ProofOfCompletionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the gate from a fetched record.
    pub fn from_record(record: &JobOrderRecord) -> Self {
        Self {
            captured: record
                .proof_of_completion_url
                .clone()
                .filter(|url| !url.trim().is_empty()),
        }
    }

    /// Record a captured photo URL. Blank or non-http(s) URLs are refused.
    pub fn attach(&mut self, url: &str) -> Result<(), RejectionReason> {
        let url = validate_proof_url(url)?;
        self.captured = Some(url.to_string());
        Ok(())
    }

    /// Forget the captured photo (retake).
    pub fn clear(&mut self) {
        self.captured = None;
    }

    pub fn is_satisfied(&self) -> bool {
        self.captured.as_deref().is_some_and(|u| !u.trim().is_empty())
    }

    pub fn url(&self) -> Option<&str> {
        self.captured.as_deref()
    }
}

/// Trim and check a proof URL.
pub fn validate_proof_url(url: &str) -> Result<&str, RejectionReason> {
    let url = url.trim();
    let host_and_path = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match host_and_path {
        Some(rest) if !rest.is_empty() => Ok(url),
        _ => Err(RejectionReason::ProofUrlInvalid),
    }
}
