use tracing::{debug, warn};

use crate::api::JobOrderApi;
use crate::error::{RejectionReason, SyncWarning, WorkflowError};
use crate::session::SessionContext;

use super::record::JobOrderRecord;

/// What the active-job check concluded for an accept request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardVerdict {
    Allowed,
    /// The job list could not be fetched; the accept may go ahead.
    AllowedWithWarning(SyncWarning),
    Blocked(RejectionReason),
}

impl GuardVerdict {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, GuardVerdict::Blocked(_))
    }
}

/// Client-side pre-check that a driver holds no other active job.
///
/// Advisory only: the server must still enforce exclusivity.
pub struct ActiveJobGuard;

impl ActiveJobGuard {
    /// First job other than `target_id` that is accepted or in progress.
    pub fn find_conflict<'a>(
        jobs: &'a [JobOrderRecord],
        target_id: &str,
    ) -> Option<&'a JobOrderRecord> {
        jobs.iter()
            .find(|job| job.id != target_id && job.status.is_active())
    }

    /// Fetch the driver's jobs and decide whether accepting `target_id` is
    /// allowed. A failed fetch allows the accept with a warning.
    pub async fn check(
        api: &impl JobOrderApi,
        session: &SessionContext,
        target_id: &str,
    ) -> Result<GuardVerdict, WorkflowError> {
        let token = session.token()?;
        let driver_id = session.driver_id()?;

        let jobs = match api.list_by_driver(token, driver_id).await {
            Ok(jobs) => jobs,
            Err(e) => {
                warn!(driver_id, error = %e, "active job check skipped");
                return Ok(GuardVerdict::AllowedWithWarning(
                    SyncWarning::ActiveJobCheckSkipped {
                        cause: e.to_string(),
                    },
                ));
            }
        };

        match Self::find_conflict(&jobs, target_id) {
            Some(active) => {
                debug!(driver_id, target_id, active = %active.id, "accept blocked by active job");
                Ok(GuardVerdict::Blocked(RejectionReason::ActiveJobConflict {
                    job_id: active.id.clone(),
                }))
            }
            None => Ok(GuardVerdict::Allowed),
        }
    }
}
