//! Per-job controller: turns driver actions into outcomes.
//!
//! A [`JobOrderSession`] owns the record of the job on screen. Every action
//! takes `&mut self`, so a session can have at most one request in flight.

use tracing::debug;

use crate::api::JobOrderApi;
use crate::error::{RejectionReason, SyncWarning, WorkflowError};
use crate::session::SessionContext;
use crate::sync::{RemoteSync, SyncError};
use crate::workflow::{
    Action, ActiveJobGuard, GeoPoint, GuardVerdict, JobOrderRecord, JobStatus,
    ProofOfCompletionGate, StatusTransitionEngine, Transition, validate_proof_url,
};

/// What the caller should show after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Re-render from `record`; show any warnings as transient messages.
    Updated {
        record: JobOrderRecord,
        warnings: Vec<SyncWarning>,
    },
    /// Status unchanged; open the location screen.
    Navigate {
        record: JobOrderRecord,
        destination: Option<GeoPoint>,
    },
    /// Refused before any request was made.
    Rejected(RejectionReason),
}

impl Outcome {
    /// The record to render, if the action produced one.
    pub fn record(&self) -> Option<&JobOrderRecord> {
        match self {
            Outcome::Updated { record, .. } | Outcome::Navigate { record, .. } => Some(record),
            Outcome::Rejected(_) => None,
        }
    }
}

/// The job currently being worked on, plus what it needs to talk to the API.
pub struct JobOrderSession<'a, A> {
    api: &'a A,
    session: &'a SessionContext,
    degrade_on_server_rejection: bool,
    record: JobOrderRecord,
    proof: ProofOfCompletionGate,
}

impl<'a, A: JobOrderApi> JobOrderSession<'a, A> {
    /// Load the job from the server.
    pub async fn open(
        api: &'a A,
        session: &'a SessionContext,
        job_id: &str,
    ) -> Result<Self, WorkflowError> {
        let token = session.token()?;
        let record = api.get_job_order(token, job_id).await?;
        Ok(Self::from_record(api, session, record))
    }

    pub fn from_record(api: &'a A, session: &'a SessionContext, record: JobOrderRecord) -> Self {
        let proof = ProofOfCompletionGate::from_record(&record);
        Self {
            api,
            session,
            degrade_on_server_rejection: true,
            record,
            proof,
        }
    }

    pub fn degrade_on_server_rejection(mut self, enabled: bool) -> Self {
        self.degrade_on_server_rejection = enabled;
        self
    }

    pub fn record(&self) -> &JobOrderRecord {
        &self.record
    }

    pub fn proof(&self) -> &ProofOfCompletionGate {
        &self.proof
    }

    /// Accept an available job, after checking the driver has no other
    /// active one.
    pub async fn accept(&mut self) -> Result<Outcome, WorkflowError> {
        self.session.token()?;
        let next = match self.decide(Action::Accept) {
            Ok(t) => t.status(),
            Err(reason) => return Ok(Outcome::Rejected(reason)),
        };

        let mut warnings = Vec::new();
        match ActiveJobGuard::check(self.api, self.session, &self.record.id).await? {
            GuardVerdict::Allowed => {}
            GuardVerdict::AllowedWithWarning(w) => warnings.push(w),
            GuardVerdict::Blocked(reason) => return Ok(Outcome::Rejected(reason)),
        }

        self.push(next, warnings).await
    }

    /// Resume an active job. No request is made.
    pub fn continue_job(&self) -> Outcome {
        match self.decide(Action::Continue) {
            // Continue only ever navigates.
            Ok(_) => Outcome::Navigate {
                record: self.record.clone(),
                destination: self.record.location,
            },
            Err(reason) => Outcome::Rejected(reason),
        }
    }

    /// The driver reached the pickup location.
    pub async fn arrive(&mut self) -> Result<Outcome, WorkflowError> {
        self.session.token()?;
        if self.record.status != JobStatus::Accepted {
            let reason = if self.record.status.is_terminal() {
                RejectionReason::TerminalState(self.record.status)
            } else {
                RejectionReason::ArrivalNotExpected(self.record.status)
            };
            debug!(job_id = %self.record.id, %reason, "arrival rejected");
            return Ok(Outcome::Rejected(reason));
        }
        self.push(JobStatus::InProgress, Vec::new()).await
    }

    /// Upload a proof photo URL and arm the completion gate.
    ///
    /// Upload failures are returned as errors; there is no local fallback.
    pub async fn attach_proof(&mut self, url: &str) -> Result<Outcome, WorkflowError> {
        let session = self.session;
        let token = session.token()?;
        let url = match validate_proof_url(url) {
            Ok(url) => url,
            Err(reason) => return Ok(Outcome::Rejected(reason)),
        };
        match self.record.status {
            JobStatus::InProgress => {}
            status if status.is_terminal() => {
                return Ok(Outcome::Rejected(RejectionReason::TerminalState(status)));
            }
            status => {
                return Ok(Outcome::Rejected(RejectionReason::NotAllowed {
                    from: status,
                    action: Action::Complete,
                }));
            }
        }

        self.api
            .upload_confirmation_image(token, &self.record.id, url)
            .await?;
        if let Err(reason) = self.proof.attach(url) {
            return Ok(Outcome::Rejected(reason));
        }
        self.record.proof_of_completion_url = Some(url.to_string());
        debug!(job_id = %self.record.id, "proof photo attached");

        Ok(Outcome::Updated {
            record: self.record.clone(),
            warnings: Vec::new(),
        })
    }

    /// Drop the captured photo; completion is blocked until a new one is attached.
    pub fn retake_proof(&mut self) {
        self.proof.clear();
    }

    pub async fn complete(&mut self) -> Result<Outcome, WorkflowError> {
        self.transition(Action::Complete).await
    }

    pub async fn cancel(&mut self) -> Result<Outcome, WorkflowError> {
        self.transition(Action::Cancel).await
    }

    async fn transition(&mut self, action: Action) -> Result<Outcome, WorkflowError> {
        self.session.token()?;
        match self.decide(action) {
            Ok(Transition::Advance(next)) => self.push(next, Vec::new()).await,
            Ok(Transition::Navigate(_)) => Ok(self.continue_job()),
            Err(reason) => Ok(Outcome::Rejected(reason)),
        }
    }

    fn decide(&self, action: Action) -> Result<Transition, RejectionReason> {
        let decision =
            StatusTransitionEngine::decide(self.record.status, action, self.proof.is_satisfied());
        if let Err(reason) = &decision {
            debug!(
                job_id = %self.record.id,
                status = %self.record.status,
                %action,
                %reason,
                "transition rejected"
            );
        }
        decision
    }

    async fn push(
        &mut self,
        next: JobStatus,
        mut warnings: Vec<SyncWarning>,
    ) -> Result<Outcome, WorkflowError> {
        let sync = RemoteSync::new(self.api)
            .degrade_on_server_rejection(self.degrade_on_server_rejection);
        match sync.apply(self.session, &self.record, next).await {
            Ok(record) => self.record = record,
            Err(SyncError::DegradedLocalUpdate { record, cause }) => {
                self.record = *record;
                warnings.push(SyncWarning::DegradedLocalUpdate {
                    cause: cause.to_string(),
                });
            }
            Err(SyncError::UnreadableConfirmation { record, cause }) => {
                self.record = *record;
                warnings.push(SyncWarning::UnreadableConfirmation {
                    cause: cause.to_string(),
                });
            }
            Err(SyncError::ServerRejected(cause)) => {
                return Err(WorkflowError::ServerRejected {
                    status: cause.status().unwrap_or_default(),
                    message: cause.to_string(),
                });
            }
            Err(SyncError::Session(e)) => return Err(e),
        }

        if !self.proof.is_satisfied() {
            self.proof = ProofOfCompletionGate::from_record(&self.record);
        }

        Ok(Outcome::Updated {
            record: self.record.clone(),
            warnings,
        })
    }
}

/// Every job assigned to the session's driver, in server order.
pub async fn driver_jobs(
    api: &impl JobOrderApi,
    session: &SessionContext,
) -> Result<Vec<JobOrderRecord>, WorkflowError> {
    let token = session.token()?;
    let driver_id = session.driver_id()?;
    Ok(api.list_by_driver(token, driver_id).await?)
}

/// Orders nobody has accepted yet.
pub async fn available_jobs(
    api: &impl JobOrderApi,
    session: &SessionContext,
) -> Result<Vec<JobOrderRecord>, WorkflowError> {
    let token = session.token()?;
    Ok(api.list_available(token).await?)
}
