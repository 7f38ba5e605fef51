use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use kernel::KernelError;

pub mod message {
    pub static RENTAL_LISTED: &str = "rental.listed";
    pub static RENTAL_FOUND: &str = "rental.found";
    pub static RENTAL_ADDED: &str = "rental.added";
    pub static RENTAL_UPDATED: &str = "rental.updated";
    pub static RENTAL_DELETED: &str = "rental.deleted";
    pub static RENTAL_CLOSED: &str = "rental.closed";
    pub static VEHICLE_HISTORY: &str = "vehicle.history";
    pub static VEHICLE_AVAILABILITY: &str = "vehicle.availability";

    pub static VEHICLE_BUSY: &str = "error.vehicle_busy";
    pub static INVALID_RECORD: &str = "error.invalid_record";
    pub static ALREADY_CLOSED: &str = "error.already_closed";
    pub static NOT_FOUND: &str = "error.not_found";
    pub static CONFLICT: &str = "error.conflict";
    pub static FORBIDDEN: &str = "error.forbidden";
    pub static VALIDATION: &str = "error.validation";
    pub static TIMEOUT: &str = "error.timeout";
    pub static INTERNAL: &str = "error.internal";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReasonCode {
    VehicleBusy,
    InvalidRecord,
    AlreadyClosed,
    NotFound,
    Conflict,
    Forbidden,
    Validation,
    Timeout,
    Internal,
}

impl ReasonCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ReasonCode::VehicleBusy | ReasonCode::AlreadyClosed | ReasonCode::Conflict => {
                StatusCode::CONFLICT
            }
            ReasonCode::InvalidRecord | ReasonCode::NotFound => StatusCode::NOT_FOUND,
            ReasonCode::Forbidden => StatusCode::FORBIDDEN,
            ReasonCode::Validation => StatusCode::BAD_REQUEST,
            ReasonCode::Timeout => StatusCode::REQUEST_TIMEOUT,
            ReasonCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ReasonCode::VehicleBusy => message::VEHICLE_BUSY,
            ReasonCode::InvalidRecord => message::INVALID_RECORD,
            ReasonCode::AlreadyClosed => message::ALREADY_CLOSED,
            ReasonCode::NotFound => message::NOT_FOUND,
            ReasonCode::Conflict => message::CONFLICT,
            ReasonCode::Forbidden => message::FORBIDDEN,
            ReasonCode::Validation => message::VALIDATION,
            ReasonCode::Timeout => message::TIMEOUT,
            ReasonCode::Internal => message::INTERNAL,
        }
    }
}

impl From<&KernelError> for ReasonCode {
    fn from(value: &KernelError) -> Self {
        match value {
            KernelError::VehicleBusy => ReasonCode::VehicleBusy,
            KernelError::InvalidRecord => ReasonCode::InvalidRecord,
            KernelError::AlreadyClosed => ReasonCode::AlreadyClosed,
            KernelError::NotFound => ReasonCode::NotFound,
            KernelError::Concurrency => ReasonCode::Conflict,
            KernelError::Forbidden => ReasonCode::Forbidden,
            KernelError::Validation => ReasonCode::Validation,
            KernelError::Timeout => ReasonCode::Timeout,
            KernelError::Internal => ReasonCode::Internal,
        }
    }
}

/// Body shared by every response of the service.
#[derive(Debug, Serialize)]
pub struct UniformResult<T> {
    success: bool,
    reason_code: Option<ReasonCode>,
    message: Option<&'static str>,
    payload: Option<T>,
}

impl<T: Serialize> UniformResult<T> {
    pub fn success(message: &'static str, payload: T) -> Self {
        Self {
            success: true,
            reason_code: None,
            message: Some(message),
            payload: Some(payload),
        }
    }
}

impl UniformResult<()> {
    pub fn done(message: &'static str) -> Self {
        Self {
            success: true,
            reason_code: None,
            message: Some(message),
            payload: None,
        }
    }

    pub fn failure(reason: ReasonCode) -> Self {
        Self {
            success: false,
            reason_code: Some(reason),
            message: Some(reason.message()),
            payload: None,
        }
    }
}

/// A uniform body sent with a status code.
pub struct Replied<T>(pub StatusCode, pub UniformResult<T>);

impl<T: Serialize> IntoResponse for Replied<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}
