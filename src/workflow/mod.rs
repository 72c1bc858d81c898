mod engine;
mod guard;
mod proof;
mod record;
mod status;

pub use engine::{StatusTransitionEngine, Transition};
pub use guard::{ActiveJobGuard, GuardVerdict};
pub use proof::{ProofOfCompletionGate, validate_proof_url};
pub use record::{GeoPoint, JobOrderRecord, ServiceRating};
pub use status::{Action, Actor, JobStatus};
