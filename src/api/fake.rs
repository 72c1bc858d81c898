//! In-memory [`JobOrderApi`] for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use super::client::JobOrderApi;
use super::error::ApiError;
use super::types::Ack;
use crate::workflow::{JobOrderRecord, JobStatus};

/// How the fake should fail the next calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailMode {
    Network,
    Status(u16),
    /// 2xx with a body that does not parse.
    Decode,
}

/// Builds a real `reqwest::Error` without touching the network.
pub fn network_error() -> ApiError {
    let err = reqwest::Client::new()
        .get("not a url")
        .build()
        .expect_err("invalid url must fail to build");
    ApiError::Network(err)
}

impl FailMode {
    fn to_error(self) -> ApiError {
        match self {
            FailMode::Network => network_error(),
            FailMode::Status(status) => ApiError::Status {
                status,
                message: "simulated failure".into(),
            },
            FailMode::Decode => ApiError::Decode("expected value at line 1 column 1".into()),
        }
    }
}

/// Records keyed by id; the driver id is what the bearer token resolves to.
pub struct FakeApi {
    pub driver_id: String,
    pub jobs: Mutex<HashMap<String, JobOrderRecord>>,
    pub fail_updates: Mutex<Option<FailMode>>,
    pub fail_lists: Mutex<Option<FailMode>>,
    pub update_calls: Mutex<u32>,
}

impl FakeApi {
    pub fn new(driver_id: &str, jobs: Vec<JobOrderRecord>) -> Self {
        Self {
            driver_id: driver_id.to_string(),
            jobs: Mutex::new(jobs.into_iter().map(|j| (j.id.clone(), j)).collect()),
            fail_updates: Mutex::new(None),
            fail_lists: Mutex::new(None),
            update_calls: Mutex::new(0),
        }
    }

    pub fn fail_updates(&self, mode: Option<FailMode>) {
        *self.fail_updates.lock().unwrap() = mode;
    }

    pub fn fail_lists(&self, mode: Option<FailMode>) {
        *self.fail_lists.lock().unwrap() = mode;
    }

    pub fn update_calls(&self) -> u32 {
        *self.update_calls.lock().unwrap()
    }

    pub fn job(&self, id: &str) -> JobOrderRecord {
        self.jobs.lock().unwrap()[id].clone()
    }

    fn not_found(id: &str) -> ApiError {
        ApiError::Status {
            status: 404,
            message: format!("payment {id} not found"),
        }
    }
}

impl JobOrderApi for FakeApi {
    async fn get_job_order(&self, _token: &str, job_id: &str) -> Result<JobOrderRecord, ApiError> {
        self.jobs
            .lock()
            .unwrap()
            .get(job_id)
            .cloned()
            .ok_or_else(|| Self::not_found(job_id))
    }

    async fn list_available(&self, _token: &str) -> Result<Vec<JobOrderRecord>, ApiError> {
        if let Some(mode) = *self.fail_lists.lock().unwrap() {
            return Err(mode.to_error());
        }
        let mut jobs: Vec<_> = self
            .jobs
            .lock()
            .unwrap()
            .values()
            .filter(|j| j.status == JobStatus::Available)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(jobs)
    }

    async fn list_by_driver(
        &self,
        _token: &str,
        driver_id: &str,
    ) -> Result<Vec<JobOrderRecord>, ApiError> {
        if let Some(mode) = *self.fail_lists.lock().unwrap() {
            return Err(mode.to_error());
        }
        let mut jobs: Vec<_> = self
            .jobs
            .lock()
            .unwrap()
            .values()
            .filter(|j| j.driver_id.as_deref() == Some(driver_id))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(jobs)
    }

    async fn update_status(
        &self,
        _token: &str,
        job_id: &str,
        status: JobStatus,
    ) -> Result<JobOrderRecord, ApiError> {
        *self.update_calls.lock().unwrap() += 1;
        if let Some(mode) = *self.fail_updates.lock().unwrap() {
            return Err(mode.to_error());
        }
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(job_id).ok_or_else(|| Self::not_found(job_id))?;
        job.status = status;
        if status == JobStatus::Accepted {
            job.driver_id = Some(self.driver_id.clone());
        }
        job.updated_at = Some(Utc::now());
        Ok(job.clone())
    }

    async fn upload_confirmation_image(
        &self,
        _token: &str,
        job_id: &str,
        image_url: &str,
    ) -> Result<Ack, ApiError> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(job_id).ok_or_else(|| Self::not_found(job_id))?;
        job.proof_of_completion_url = Some(image_url.to_string());
        Ok(Ack::default())
    }
}
