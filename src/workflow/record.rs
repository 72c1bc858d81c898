use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::status::JobStatus;

/// A latitude/longitude pair for the pickup location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// Customer rating of a finished pickup, always in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ServiceRating(u8);

impl ServiceRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Filled and empty stars, e.g. `★★★☆☆`.
    pub fn stars(&self) -> String {
        let filled = self.0 as usize;
        let empty = (Self::MAX - self.0) as usize;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}

impl TryFrom<u8> for ServiceRating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "service rating must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            ))
        }
    }
}

impl From<ServiceRating> for u8 {
    fn from(rating: ServiceRating) -> Self {
        rating.0
    }
}

/// The client's snapshot of a pickup job as last reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOrderRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_of_completion_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_rating",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_rating: Option<ServiceRating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub waste_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tax: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `null` reads as the field's default, same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The rating is display-only: anything outside `1..=5` (or not a number)
/// reads as "not rated" rather than failing the whole record.
fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<ServiceRating>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    let rating = raw
        .as_u64()
        .and_then(|v| u8::try_from(v).ok())
        .and_then(|v| ServiceRating::try_from(v).ok());
    if rating.is_none() {
        warn!(value = %raw, "ignoring invalid service rating");
    }
    Ok(rating)
}

impl JobOrderRecord {
    /// A fresh order as the server creates it when a customer books a pickup.
    pub fn available(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            driver_id: None,
            status: JobStatus::Available,
            proof_of_completion_url: None,
            service_rating: None,
            location: None,
            address: String::new(),
            waste_type: String::new(),
            amount: 0.0,
            tax: 0.0,
            total_amount: 0.0,
            created_at: None,
            updated_at: None,
        }
    }

    /// True when the record already carries a usable proof photo URL.
    pub fn has_proof(&self) -> bool {
        self.proof_of_completion_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    /// Copy of this record with only the status (and, for completions, the
    /// update timestamp) replaced. Used when the server could not confirm.
    pub fn patched(&self, status: JobStatus, now: DateTime<Utc>) -> Self {
        let mut patched = self.clone();
        patched.status = status;
        if status == JobStatus::Completed {
            patched.updated_at = Some(now);
        }
        patched
    }
}
