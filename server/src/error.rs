use std::process::{ExitCode, Termination};

use axum::response::IntoResponse;
use error_stack::Report;
use tracing::{debug, error};

use kernel::KernelError;

use crate::result::{ReasonCode, Replied, UniformResult};

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let context = self.0.current_context();
        if context.is_rejection() {
            debug!("{:?}", self.0);
        } else {
            error!("{:?}", self.0);
        }
        let reason = ReasonCode::from(context);
        Replied(reason.status(), UniformResult::failure(reason)).into_response()
    }
}

#[cfg(test)]
mod test {
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use error_stack::Report;
    use serde_json::Value;

    use kernel::KernelError;

    use crate::error::ErrorStatus;

    async fn respond(error: KernelError) -> (StatusCode, Value) {
        let response = ErrorStatus::from(Report::new(error)).into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn rule_rejections_map_to_client_errors() {
        let (status, body) = respond(KernelError::VehicleBusy).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert_eq!(body["reason_code"], "VehicleBusy");
        assert_eq!(body["message"], "error.vehicle_busy");
        assert!(body["payload"].is_null());

        let (status, body) = respond(KernelError::Concurrency).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["reason_code"], "Conflict");

        let (status, _) = respond(KernelError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = respond(KernelError::InvalidRecord).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = respond(KernelError::Forbidden).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = respond(KernelError::Validation).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn storage_failures_map_to_server_errors() {
        let (status, body) = respond(KernelError::Timeout).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body["reason_code"], "Timeout");

        let (status, body) = respond(KernelError::Internal).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "error.internal");
    }
}
