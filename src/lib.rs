//! Driver-side job-order workflow for a waste-collection marketplace.
//!
//! [`workflow`] holds the pure rules (status table, active-job guard, proof
//! gate), [`sync`] is the only place that pushes status changes to the
//! server, and [`controller`] ties both together per job on screen.

pub mod api;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod session;
pub mod sync;
pub mod ui;
pub mod workflow;

pub use controller::{JobOrderSession, Outcome};
pub use error::{RejectionReason, SyncWarning, WorkflowError};
pub use session::SessionContext;
