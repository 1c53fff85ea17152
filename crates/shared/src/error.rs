use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generic message used when the backend did not supply a detail string.
pub const GENERIC_ERROR_MESSAGE: &str = "internal-error";

/// Uniform failure half of every gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} (status {status})")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn internal() -> Self {
        Self::new(GENERIC_ERROR_MESSAGE, 500)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    pub fn is_generic(&self) -> bool {
        self.message == GENERIC_ERROR_MESSAGE
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Error body the backend puts on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<String>,
    pub status: Option<u16>,
}

impl ErrorBody {
    pub fn into_api_error(self, http_status: u16) -> ApiError {
        ApiError {
            message: self
                .detail
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            status: http_status,
        }
    }
}
