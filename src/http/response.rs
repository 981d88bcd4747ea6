//! Mapping of gateway errors onto HTTP responses.
//!
//! Callers only ever see a status code and a short plain-text body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::protocol::AdvertisementError;
use crate::resolve::ResolveError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("unsupported service `{0}`")]
    UnsupportedService(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Advertisement(#[from] AdvertisementError),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::NotFound
            | GatewayError::UnsupportedService(_)
            | GatewayError::Resolve(_) => StatusCode::NOT_FOUND,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::Advertisement(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = match status {
            StatusCode::NOT_FOUND => "404 page not found".to_string(),
            _ => self.to_string(),
        };
        (status, body).into_response()
    }
}
