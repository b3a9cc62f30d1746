//! Command error to HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::commands::CommandError;
use crate::matching::MatchError;
use crate::render::ResultsView;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    /// What the results panel should show.
    pub view: ResultsView,
}

impl CommandError {
    /// HTTP status and stable error code.
    pub fn status_code(&self) -> (StatusCode, &'static str) {
        match self {
            CommandError::PatientsUnavailable { .. } => {
                (StatusCode::BAD_GATEWAY, "PATIENTS_UNAVAILABLE")
            }
            CommandError::UnknownPatient(_) | CommandError::Match(MatchError::PatientNotFound(_)) => {
                (StatusCode::NOT_FOUND, "PATIENT_NOT_FOUND")
            }
            CommandError::SearchInProgress => (StatusCode::CONFLICT, "SEARCH_IN_PROGRESS"),
            CommandError::NoDonors { .. } | CommandError::Match(MatchError::EmptyMatch { .. }) => {
                (StatusCode::NOT_FOUND, "NO_DONORS")
            }
            CommandError::Match(MatchError::Api(_)) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            CommandError::UnknownDonor(_) => (StatusCode::NOT_FOUND, "DONOR_NOT_FOUND"),
            CommandError::NoActiveChat => (StatusCode::CONFLICT, "NO_ACTIVE_CHAT"),
            CommandError::Session(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }
}

impl IntoResponse for CommandError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_code();
        let message = match &self {
            CommandError::Session(e) => {
                tracing::error!(error = %e, "UI internal error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                view: self.view(),
            },
        };
        (status, Json(body)).into_response()
    }
}
