//! Request and response bodies for the payments endpoints.
//!
//! A job order is a "payment" on the server side, so paths and some field
//! names use that word.

use serde::{Deserialize, Serialize};

use crate::workflow::JobStatus;

/// Body of `PUT payments/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: JobStatus,
}

/// Body of `POST payments/{id}/confirmation-image`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationImageRequest {
    pub image_url: String,
}

/// Acknowledgement returned by endpoints that do not echo a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}
