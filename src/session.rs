//! Authenticated session for the acting driver.
//!
//! Built once at startup from configuration and handed by reference to
//! whatever needs to call the API.

use crate::error::WorkflowError;

/// Bearer token and driver identity for the current user.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    auth_token: Option<String>,
    driver_id: Option<String>,
}

impl SessionContext {
    pub fn new(auth_token: Option<String>, driver_id: Option<String>) -> Self {
        Self {
            auth_token: auth_token.filter(|t| !t.trim().is_empty()),
            driver_id: driver_id.filter(|d| !d.trim().is_empty()),
        }
    }

    /// The bearer token, or `AuthMissing` when the user is not logged in.
    pub fn token(&self) -> Result<&str, WorkflowError> {
        self.auth_token.as_deref().ok_or(WorkflowError::AuthMissing)
    }

    pub fn driver_id(&self) -> Result<&str, WorkflowError> {
        self.driver_id.as_deref().ok_or(WorkflowError::DriverIdMissing)
    }
}
