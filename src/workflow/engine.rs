use crate::error::RejectionReason;

use super::status::{Action, Actor, JobStatus};

/// The result of an allowed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Move to a new status; must be synced with the server.
    Advance(JobStatus),
    /// Status stays as is; the driver is sent to the pickup location.
    Navigate(JobStatus),
}

impl Transition {
    /// The status the job has after this transition.
    pub fn status(&self) -> JobStatus {
        match self {
            Transition::Advance(s) | Transition::Navigate(s) => *s,
        }
    }
}

/// Pure decision table for job-order transitions.
pub struct StatusTransitionEngine;

impl StatusTransitionEngine {
    /// Decide what a driver's action does to a job in `current` status.
    ///
    /// | current    | action   | result                    |
    /// |------------|----------|---------------------------|
    /// | Available  | Accept   | Advance(Accepted)         |
    /// | Accepted   | Continue | Navigate(Accepted)        |
    /// | Accepted   | Cancel   | Advance(Cancelled)        |
    /// | InProgress | Continue | Navigate(InProgress)      |
    /// | InProgress | Complete | Advance(Completed) w/ proof |
    ///
    /// Everything else is rejected. Completed and Cancelled reject every
    /// action with `TerminalState`.
    pub fn decide(
        current: JobStatus,
        action: Action,
        has_proof: bool,
    ) -> Result<Transition, RejectionReason> {
        Self::decide_as(Actor::Driver, current, action, has_proof)
    }

    /// Same as [`decide`](Self::decide) but for an explicit actor. A customer
    /// may only withdraw an order nobody has accepted yet.
    pub fn decide_as(
        actor: Actor,
        current: JobStatus,
        action: Action,
        has_proof: bool,
    ) -> Result<Transition, RejectionReason> {
        if current.is_terminal() {
            return Err(RejectionReason::TerminalState(current));
        }

        let not_allowed = RejectionReason::NotAllowed {
            from: current,
            action,
        };

        match actor {
            Actor::Customer => match (current, action) {
                (JobStatus::Available, Action::Cancel) => {
                    Ok(Transition::Advance(JobStatus::Cancelled))
                }
                _ => Err(not_allowed),
            },
            Actor::Driver => match (current, action) {
                (JobStatus::Available, Action::Accept) => {
                    Ok(Transition::Advance(JobStatus::Accepted))
                }
                (JobStatus::Accepted, Action::Continue) => {
                    Ok(Transition::Navigate(JobStatus::Accepted))
                }
                (JobStatus::Accepted, Action::Cancel) => {
                    Ok(Transition::Advance(JobStatus::Cancelled))
                }
                (JobStatus::InProgress, Action::Continue) => {
                    Ok(Transition::Navigate(JobStatus::InProgress))
                }
                (JobStatus::InProgress, Action::Complete) if has_proof => {
                    Ok(Transition::Advance(JobStatus::Completed))
                }
                (JobStatus::InProgress, Action::Complete) => Err(RejectionReason::MissingProof),
                (JobStatus::InProgress, Action::Cancel) => Err(RejectionReason::ActiveJobLocked),
                _ => Err(not_allowed),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [JobStatus; 5] = [
        JobStatus::Available,
        JobStatus::Accepted,
        JobStatus::InProgress,
        JobStatus::Completed,
        JobStatus::Cancelled,
    ];
    const ALL_ACTIONS: [Action; 4] = [
        Action::Accept,
        Action::Continue,
        Action::Complete,
        Action::Cancel,
    ];

    #[test]
    fn table_allows_exactly_the_listed_pairs() {
        let mut allowed = Vec::new();
        for status in ALL_STATUSES {
            for action in ALL_ACTIONS {
                if let Ok(t) = StatusTransitionEngine::decide(status, action, true) {
                    allowed.push((status, action, t));
                }
            }
        }
        assert_eq!(
            allowed,
            vec![
                (
                    JobStatus::Available,
                    Action::Accept,
                    Transition::Advance(JobStatus::Accepted),
                ),
                (
                    JobStatus::Accepted,
                    Action::Continue,
                    Transition::Navigate(JobStatus::Accepted),
                ),
                (
                    JobStatus::Accepted,
                    Action::Cancel,
                    Transition::Advance(JobStatus::Cancelled),
                ),
                (
                    JobStatus::InProgress,
                    Action::Continue,
                    Transition::Navigate(JobStatus::InProgress),
                ),
                (
                    JobStatus::InProgress,
                    Action::Complete,
                    Transition::Advance(JobStatus::Completed),
                ),
            ]
        );
    }

    #[test]
    fn complete_requires_proof() {
        assert_eq!(
            StatusTransitionEngine::decide(JobStatus::InProgress, Action::Complete, false),
            Err(RejectionReason::MissingProof)
        );
        assert_eq!(
            StatusTransitionEngine::decide(JobStatus::InProgress, Action::Complete, true),
            Ok(Transition::Advance(JobStatus::Completed))
        );
    }

    #[test]
    fn cancel_mid_job_is_locked() {
        assert_eq!(
            StatusTransitionEngine::decide(JobStatus::InProgress, Action::Cancel, true),
            Err(RejectionReason::ActiveJobLocked)
        );
    }

    #[test]
    fn continue_is_idempotent() {
        for _ in 0..5 {
            let t = StatusTransitionEngine::decide(JobStatus::Accepted, Action::Continue, false)
                .unwrap();
            assert_eq!(t, Transition::Navigate(JobStatus::Accepted));
            assert_eq!(t.status(), JobStatus::Accepted);
        }
    }

    #[test]
    fn terminal_states_reject_everything() {
        for status in [JobStatus::Completed, JobStatus::Cancelled] {
            for action in ALL_ACTIONS {
                for has_proof in [false, true] {
                    assert_eq!(
                        StatusTransitionEngine::decide(status, action, has_proof),
                        Err(RejectionReason::TerminalState(status))
                    );
                }
            }
        }
    }

    #[test]
    fn complete_from_accepted_is_not_allowed_even_with_proof() {
        assert_eq!(
            StatusTransitionEngine::decide(JobStatus::Accepted, Action::Complete, true),
            Err(RejectionReason::NotAllowed {
                from: JobStatus::Accepted,
                action: Action::Complete
            })
        );
    }

    #[test]
    fn driver_cannot_cancel_an_unaccepted_order() {
        assert!(matches!(
            StatusTransitionEngine::decide(JobStatus::Available, Action::Cancel, false),
            Err(RejectionReason::NotAllowed { .. })
        ));
    }

    #[test]
    fn customer_may_only_withdraw_available_orders() {
        assert_eq!(
            StatusTransitionEngine::decide_as(
                Actor::Customer,
                JobStatus::Available,
                Action::Cancel,
                false
            ),
            Ok(Transition::Advance(JobStatus::Cancelled))
        );
        for status in [JobStatus::Accepted, JobStatus::InProgress] {
            assert!(
                StatusTransitionEngine::decide_as(Actor::Customer, status, Action::Cancel, false)
                    .is_err()
            );
        }
        assert!(
            StatusTransitionEngine::decide_as(
                Actor::Customer,
                JobStatus::Available,
                Action::Accept,
                false
            )
            .is_err()
        );
    }
}
