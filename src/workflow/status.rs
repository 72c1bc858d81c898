use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a pickup job order.
///
/// The wire form is the string the marketplace API speaks, so `InProgress`
/// travels as `"In-Progress"`. Some API responses spell it `"InProgress"`;
/// both are accepted when reading, only the hyphenated form is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    Available,
    Accepted,
    #[serde(rename = "In-Progress", alias = "InProgress")]
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    /// The string sent in a status update request body.
    pub fn as_wire(&self) -> &'static str {
        match self {
            JobStatus::Available => "Available",
            JobStatus::Accepted => "Accepted",
            JobStatus::InProgress => "In-Progress",
            JobStatus::Completed => "Completed",
            JobStatus::Cancelled => "Cancelled",
        }
    }

    /// Accepted or in progress: counts against the one-job-per-driver limit.
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Accepted | JobStatus::InProgress)
    }

    /// No further transitions are permitted from here.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }

    /// The driver may not leave the job screen while the job is active.
    pub fn blocks_back_navigation(&self) -> bool {
        self.is_active()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// A user-initiated request against a job order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Accept,
    /// Resume an active job; opens the location screen.
    Continue,
    Complete,
    Cancel,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Accept => write!(f, "accept"),
            Action::Continue => write!(f, "continue"),
            Action::Complete => write!(f, "complete"),
            Action::Cancel => write!(f, "cancel"),
        }
    }
}

/// Who is asking for the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Actor {
    #[default]
    Driver,
    Customer,
}
