//! Status-code classification shared by every remote call.
//!
//! # Design
//! The backend only ever answers with a status in `200..600`. Inside that
//! range each response maps to exactly one outcome. A status outside it
//! means the backend contract itself is broken, which is a bug rather than a
//! failure the caller can handle, so `classify` panics.

use log::warn;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Coarse class of an in-contract HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    ClientError,
    ServerError,
}

impl StatusClass {
    /// Returns `None` for statuses the backend contract never produces.
    pub fn of(status: u16) -> Option<StatusClass> {
        match status {
            200..=299 => Some(StatusClass::Success),
            400..=499 => Some(StatusClass::ClientError),
            500..=599 => Some(StatusClass::ServerError),
            _ => None,
        }
    }
}

/// Classify `response` and decode a success body into `T`.
///
/// # Panics
/// If the status is outside `200..300`, `400..500` and `500..600`.
pub fn classify<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    match StatusClass::of(response.status) {
        Some(StatusClass::Success) => decode(&response.body),
        Some(StatusClass::ClientError) => {
            warn!("backend rejected request with HTTP {}", response.status);
            Err(ApiError::Client(response.status))
        }
        Some(StatusClass::ServerError) => {
            warn!("backend failed with HTTP {}", response.status);
            Err(ApiError::Server(response.status))
        }
        None => panic!(
            "HTTP status {} is outside the backend contract",
            response.status
        ),
    }
}

/// Decode a success body, reporting malformed payloads as `Unexpected`.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body)
        .map_err(|e| ApiError::Unexpected(format!("malformed response body: {e}")))
}
