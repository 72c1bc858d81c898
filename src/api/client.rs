use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::ApiError;
use super::types::{Ack, ConfirmationImageRequest, UpdateStatusRequest};
use crate::workflow::{JobOrderRecord, JobStatus};

/// The marketplace endpoints the job workflow relies on.
///
/// Every call takes the bearer token explicitly; nothing here keeps session
/// state.
#[allow(async_fn_in_trait)]
pub trait JobOrderApi {
    /// `GET payments/{id}`
    async fn get_job_order(&self, token: &str, job_id: &str) -> Result<JobOrderRecord, ApiError>;

    /// `GET payments/available`
    async fn list_available(&self, token: &str) -> Result<Vec<JobOrderRecord>, ApiError>;

    /// `GET payments/driver/{driver_id}`
    async fn list_by_driver(
        &self,
        token: &str,
        driver_id: &str,
    ) -> Result<Vec<JobOrderRecord>, ApiError>;

    /// `PUT payments/{id}/status`; the response is the full updated record.
    async fn update_status(
        &self,
        token: &str,
        job_id: &str,
        status: JobStatus,
    ) -> Result<JobOrderRecord, ApiError>;

    /// `POST payments/{id}/confirmation-image`
    async fn upload_confirmation_image(
        &self,
        token: &str,
        job_id: &str,
        image_url: &str,
    ) -> Result<Ack, ApiError>;
}

/// reqwest-backed [`JobOrderApi`].
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Client with default timeouts (useful for testing).
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Self::new(base_url, Duration::from_secs(10), Duration::from_secs(30))
    }

    /// Append path segments to the base URL, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = Self::check_status(response).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "api response");
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl JobOrderApi for ApiClient {
    async fn get_job_order(&self, token: &str, job_id: &str) -> Result<JobOrderRecord, ApiError> {
        let url = self.endpoint(&["payments", job_id])?;
        let response = self.client.get(url).bearer_auth(token).send().await?;
        Self::read_json(response).await
    }

    async fn list_available(&self, token: &str) -> Result<Vec<JobOrderRecord>, ApiError> {
        let url = self.endpoint(&["payments", "available"])?;
        let response = self.client.get(url).bearer_auth(token).send().await?;
        Self::read_json(response).await
    }

    async fn list_by_driver(
        &self,
        token: &str,
        driver_id: &str,
    ) -> Result<Vec<JobOrderRecord>, ApiError> {
        let url = self.endpoint(&["payments", "driver", driver_id])?;
        let response = self.client.get(url).bearer_auth(token).send().await?;
        Self::read_json(response).await
    }

    async fn update_status(
        &self,
        token: &str,
        job_id: &str,
        status: JobStatus,
    ) -> Result<JobOrderRecord, ApiError> {
        let url = self.endpoint(&["payments", job_id, "status"])?;
        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(&UpdateStatusRequest { status })
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn upload_confirmation_image(
        &self,
        token: &str,
        job_id: &str,
        image_url: &str,
    ) -> Result<Ack, ApiError> {
        let url = self.endpoint(&["payments", job_id, "confirmation-image"])?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&ConfirmationImageRequest {
                image_url: image_url.to_string(),
            })
            .send()
            .await?;
        let body = Self::check_status(response).await?.text().await?;
        if body.trim().is_empty() {
            return Ok(Ack::default());
        }
        match serde_json::from_str(&body) {
            Ok(ack) => Ok(ack),
            Err(e) => {
                // The upload itself succeeded; only the acknowledgement is unreadable.
                warn!(job_id, error = %e, "ignoring malformed confirmation-image ack");
                Ok(Ack::default())
            }
        }
    }
}
