//! Pushes decided status changes to the server.
//!
//! The server's answer is authoritative. When it cannot be had, the caller
//! gets a locally patched copy of the last known record so the flow can
//! continue, together with the reason it is unconfirmed.

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiError, JobOrderApi};
use crate::error::WorkflowError;
use crate::session::SessionContext;
use crate::workflow::{JobOrderRecord, JobStatus};

/// Why [`RemoteSync::apply`] did not return a server-confirmed record.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The update was not confirmed. `record` is the local patch to continue with.
    #[error("update not confirmed by server, using local copy: {cause}")]
    DegradedLocalUpdate {
        record: Box<JobOrderRecord>,
        cause: ApiError,
    },

    /// The server answered 2xx but its record could not be read. The update
    /// most likely landed; `record` is the local patch to continue with.
    #[error("server reply could not be read, using local copy: {cause}")]
    UnreadableConfirmation {
        record: Box<JobOrderRecord>,
        cause: ApiError,
    },

    /// Non-2xx answer while degrading on server rejections is switched off.
    #[error("server rejected the update: {0}")]
    ServerRejected(ApiError),

    #[error(transparent)]
    Session(#[from] WorkflowError),
}

/// The single I/O path for status transitions.
pub struct RemoteSync<'a, A> {
    api: &'a A,
    degrade_on_server_rejection: bool,
}

impl<'a, A: JobOrderApi> RemoteSync<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            degrade_on_server_rejection: true,
        }
    }

    /// Whether a non-2xx answer degrades to a local patch (the default) or
    /// is returned as [`SyncError::ServerRejected`].
    pub fn degrade_on_server_rejection(mut self, enabled: bool) -> Self {
        self.degrade_on_server_rejection = enabled;
        self
    }

    /// Send `new_status` for `last_known` once. No retries.
    pub async fn apply(
        &self,
        session: &SessionContext,
        last_known: &JobOrderRecord,
        new_status: JobStatus,
    ) -> Result<JobOrderRecord, SyncError> {
        let token = session.token()?;

        match self.api.update_status(token, &last_known.id, new_status).await {
            Ok(record) => {
                info!(job_id = %record.id, status = %record.status, "status update confirmed");
                Ok(record)
            }
            Err(cause @ ApiError::Decode(_)) => {
                warn!(
                    job_id = %last_known.id,
                    status = %new_status,
                    error = %cause,
                    "status update reply unreadable, continuing with local copy"
                );
                Err(SyncError::UnreadableConfirmation {
                    record: Box::new(last_known.patched(new_status, Utc::now())),
                    cause,
                })
            }
            Err(cause) if cause.is_server_rejection() && !self.degrade_on_server_rejection => {
                warn!(job_id = %last_known.id, error = %cause, "status update rejected");
                Err(SyncError::ServerRejected(cause))
            }
            Err(cause) => {
                warn!(
                    job_id = %last_known.id,
                    status = %new_status,
                    error = %cause,
                    "status update failed, continuing with local copy"
                );
                Err(SyncError::DegradedLocalUpdate {
                    record: Box::new(last_known.patched(new_status, Utc::now())),
                    cause,
                })
            }
        }
    }
}
