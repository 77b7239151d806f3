use super::super::LOG_TARGET;
use crate::{
    errors::{GatewayError, RemoteRegistryError},
    types::errors::TypeError,
};
use actix_web::{error::BlockingError, error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("Type error: {0}")]
    TypeError(#[from] TypeError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub struct ResponseData {
    pub status_code: StatusCode,
    pub error_response: HttpResponse,
}

impl ApiError {
    pub fn bad_request<S: Into<String>>(reason: S) -> Self {
        Self::BadRequest(reason.into())
    }

    /// Status of every error kind, one status per kind
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Gateway(err) => match err {
                GatewayError::NotFound { .. } => StatusCode::NOT_FOUND,
                GatewayError::NameConflict { .. } => StatusCode::CONFLICT,
                GatewayError::InvalidAddress(_) |
                GatewayError::InvalidId(_) |
                GatewayError::InvalidInterface(_) |
                GatewayError::MissingInterface |
                GatewayError::Compile { .. } => StatusCode::BAD_REQUEST,
                GatewayError::StoreWrite(_) | GatewayError::StoreCorrupt(_) => StatusCode::INTERNAL_SERVER_ERROR,
                GatewayError::RemoteRegistry(RemoteRegistryError::NotFound(_)) => StatusCode::NOT_FOUND,
                GatewayError::RemoteRegistry(RemoteRegistryError::Transport(_)) => StatusCode::BAD_GATEWAY,
                GatewayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                GatewayError::EventSupportMissing => StatusCode::METHOD_NOT_ALLOWED,
                GatewayError::EventStream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::TypeError(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn load_response_data(&self) -> ResponseData {
        let status_code = self.status();
        let body = match self {
            ApiError::Gateway(GatewayError::Compile { message, diagnostics }) => {
                json!({"error": format!("Compilation failed: {}", message), "diagnostics": diagnostics})
            },
            // internals of storage failures stay in the logs
            ApiError::Gateway(GatewayError::StoreWrite(_)) | ApiError::Gateway(GatewayError::StoreCorrupt(_)) => {
                json!({"error": "Failed to access the contract store"})
            },
            ApiError::Internal(_) => json!({"error": "An internal error has occurred."}),
            err => json!({ "error": err.to_string() }),
        };
        ResponseData {
            status_code,
            error_response: HttpResponse::build(status_code).json(body),
        }
    }
}

impl From<BlockingError> for ApiError {
    fn from(err: BlockingError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let response_data = self.load_response_data();
        if response_data.status_code.is_server_error() {
            log::error!(target: LOG_TARGET, "Server error: {}", self);
        } else if response_data.status_code.is_client_error() {
            log::info!(target: LOG_TARGET, "Client error: {}", self);
        }

        response_data.error_response
    }
}
