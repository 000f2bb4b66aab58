use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use sched_core::ValidationError;
use sessions::SessionError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub errors: Vec<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            errors: vec![msg.into()],
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            errors: e.messages(),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Invalid(v) => v.into(),
            SessionError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, e.to_string()),
            SessionError::Grid(_) => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
            SessionError::Generate(_) | SessionError::Save(_) => {
                Self::new(StatusCode::BAD_GATEWAY, e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "ok": false, "errors": self.errors })),
        )
            .into_response()
    }
}
