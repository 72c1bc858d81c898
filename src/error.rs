use std::fmt;

use thiserror::Error;

use crate::api::ApiError;
use crate::workflow::{Action, JobStatus};

/// Errors that stop a user action outright.
///
/// Policy rejections and degraded updates are not errors: they come back to
/// the caller as an [`Outcome`](crate::controller::Outcome).
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Not logged in: no auth token found. Log in again and retry.")]
    AuthMissing,

    #[error("No driver id configured for this session. Log in again and retry.")]
    DriverIdMissing,

    #[error("Server rejected the status update (status {status}): {message}")]
    ServerRejected { status: u16, message: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Why a requested transition was refused locally, before any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// The job is completed or cancelled.
    TerminalState(JobStatus),
    /// Completion attempted without a proof photo.
    MissingProof,
    /// Cancel attempted once the pickup is under way.
    ActiveJobLocked,
    /// Any other pair outside the transition table.
    NotAllowed { from: JobStatus, action: Action },
    /// The driver already holds another active job.
    ActiveJobConflict { job_id: String },
    /// Arrival reported for a job that is not accepted.
    ArrivalNotExpected(JobStatus),
    /// Proof URL blank or not http(s).
    ProofUrlInvalid,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::TerminalState(status) => {
                write!(f, "This job is already {status}; no further changes are possible.")
            }
            RejectionReason::MissingProof => {
                write!(f, "Upload a proof photo before completing the job.")
            }
            RejectionReason::ActiveJobLocked => {
                write!(f, "You cannot go back during an active job.")
            }
            RejectionReason::NotAllowed { from, action } => {
                write!(f, "Cannot {action} a job that is {from}.")
            }
            RejectionReason::ActiveJobConflict { job_id } => write!(
                f,
                "You already have an active job ({job_id}). Finish it before accepting another."
            ),
            RejectionReason::ArrivalNotExpected(status) => {
                write!(f, "Arrival can only be reported for an accepted job (job is {status}).")
            }
            RejectionReason::ProofUrlInvalid => {
                write!(f, "Proof photo URL must be a non-empty http(s) URL.")
            }
        }
    }
}

/// Non-blocking warning attached to an action that still went ahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncWarning {
    /// The server did not confirm the update; the local copy was patched.
    DegradedLocalUpdate { cause: String },
    /// The server took the update but its reply was unreadable; the local
    /// copy was patched.
    UnreadableConfirmation { cause: String },
    /// The active-job check could not run; the accept went ahead anyway.
    ActiveJobCheckSkipped { cause: String },
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncWarning::DegradedLocalUpdate { cause } => {
                write!(f, "Server error, proceeding with local update ({cause})")
            }
            SyncWarning::UnreadableConfirmation { cause } => {
                write!(f, "Server reply could not be read, showing local update ({cause})")
            }
            SyncWarning::ActiveJobCheckSkipped { cause } => {
                write!(f, "Could not verify your other jobs, proceeding anyway ({cause})")
            }
        }
    }
}
