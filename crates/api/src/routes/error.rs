//! JSON error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rallypoint_domain::{Remediation, SyncError};
use serde::{Deserialize, Serialize};

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable label, e.g. `no_credential`.
    pub error: String,
    pub remediation: Remediation,
    pub message: String,
}

/// Route-level failure wrapping the sync taxonomy.
#[derive(Debug)]
pub struct ApiError(pub SyncError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SyncError::NoCredential | SyncError::NoRefreshToken | SyncError::RefreshFailed(_) => {
                StatusCode::UNAUTHORIZED
            }
            SyncError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SyncError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            SyncError::ProviderFetch(_) => StatusCode::BAD_GATEWAY,
            SyncError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn label(&self) -> &'static str {
        self.0.label()
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.label().to_string(),
            remediation: self.0.remediation(),
            message: self.0.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
