//! Mapping from core errors to HTTP responses.
//!
//! Every failure is rendered as `{"error": "<message>"}`. Validation and
//! not-found errors carry their own message; anything else is a store failure,
//! which is logged in full and answered with the operation's generic message.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable description of the failure
    pub error: String,
}

/// A core error paired with the message shown if it turns out to be a 500.
#[derive(Debug)]
pub struct ApiError {
    source: Error,
    context: &'static str,
}

impl ApiError {
    /// Wraps `source`; `context` is the generic message for store failures.
    #[must_use]
    pub const fn new(source: Error, context: &'static str) -> Self {
        Self { source, context }
    }

    /// Adapter for `map_err`: `.map_err(ApiError::context("Error al crear ticket"))`.
    pub fn context(context: &'static str) -> impl FnOnce(Error) -> Self {
        move |source| Self::new(source, context)
    }

    /// Status code this error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.source {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::TicketNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self.source {
            Error::Validation { message } => message,
            not_found @ Error::TicketNotFound { .. } => not_found.to_string(),
            other => {
                error!(error = %other, "{}", self.context);
                self.context.to_string()
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
