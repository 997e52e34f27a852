use axum::{
    Json,
    extract::rejection::{FormRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::WeatherBoardError;
use crate::error::ErrorKind;

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

/// Handler error, rendered as a status code and an [`ErrorBody`]
#[derive(Debug)]
pub struct ApiError(pub WeatherBoardError);

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::BadInput => StatusCode::BAD_REQUEST,
            ErrorKind::ResolutionFailed => StatusCode::NOT_FOUND,
            ErrorKind::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }

        let body = ErrorBody {
            kind: self.0.kind(),
            message: self.0.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<WeatherBoardError> for ApiError {
    fn from(err: WeatherBoardError) -> Self {
        Self(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(WeatherBoardError::validation(rejection.body_text()))
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self(WeatherBoardError::validation(rejection.body_text()))
    }
}

/// Give bodiless timeout responses from the request timeout layer an
/// [`ErrorBody`]. Handlers never answer 504 themselves.
pub async fn timeout_as_error(response: Response) -> Response {
    if response.status() != StatusCode::GATEWAY_TIMEOUT {
        return response;
    }
    ApiError(WeatherBoardError::upstream(
        "providers",
        "request did not complete in time",
    ))
    .into_response()
}
